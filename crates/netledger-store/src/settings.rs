use rusqlite::{Connection, params};

use crate::database::optional;
use crate::error::Result;

/// Stored retention horizon in days, `None` when the settings row is missing.
pub fn retention_days(conn: &Connection) -> Result<Option<u32>> {
    optional(conn.query_row(
        "SELECT retention_days FROM settings WHERE id = 1",
        [],
        |row| row.get(0),
    ))
}

/// Store a new retention horizon, creating the settings row if needed.
pub fn set_retention_days(conn: &Connection, days: u32) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (id, retention_days) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET retention_days = excluded.retention_days",
        params![days],
    )?;
    Ok(())
}
