//! Append-only audit log.
//!
//! Rows are only ever inserted here and deleted by retention pruning; there
//! is deliberately no update helper.

use rusqlite::{Connection, params};

use crate::error::{Result, StoreError};
use crate::models::{AuditLogEntry, NewAuditEntry, optional_uuid_column, timestamp_column};

/// Append one entry and return its row id.
pub fn append(conn: &Connection, entry: &NewAuditEntry) -> Result<i64> {
    conn.execute(
        "INSERT INTO audit_logs (message, client_id, access_point_id) VALUES (?1, ?2, ?3)",
        params![
            entry.message,
            entry.client_id.map(|id| id.to_string()),
            entry.access_point_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent entries first.
pub fn recent(conn: &Connection, limit: u32) -> Result<Vec<AuditLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, message, client_id, access_point_id, created_at
         FROM audit_logs
         ORDER BY created_at DESC, id DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], row_to_entry)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// Delete every entry created strictly before `cutoff` (`YYYY-MM-DD HH:MM:SS`).
pub fn delete_before(conn: &Connection, cutoff: &str) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM audit_logs WHERE created_at < ?1",
        params![cutoff],
    )?)
}

pub fn count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM audit_logs", [], |row| row.get(0))?)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditLogEntry> {
    Ok(AuditLogEntry {
        id: row.get(0)?,
        message: row.get(1)?,
        client_id: optional_uuid_column(row, 2)?,
        access_point_id: optional_uuid_column(row, 3)?,
        created_at: timestamp_column(row, 4)?,
    })
}
