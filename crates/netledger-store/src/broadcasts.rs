use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::database::optional;
use crate::error::{Result, StoreError};
use crate::models::{Upserted, WifiBroadcast, uuid_column};

const SELECT_COLUMNS: &str = "SELECT id, ssid, active, hide_name FROM wifi_broadcasts";

/// Insert the broadcast, or overwrite every attribute of the existing row.
pub fn upsert(conn: &Connection, broadcast: &WifiBroadcast) -> Result<Upserted> {
    let id = broadcast.id.to_string();
    let existed: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM wifi_broadcasts WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO wifi_broadcasts (id, ssid, active, hide_name)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             ssid       = excluded.ssid,
             active     = excluded.active,
             hide_name  = excluded.hide_name,
             updated_at = datetime('now')",
        params![id, broadcast.ssid, broadcast.active, broadcast.hide_name],
    )?;

    Ok(if existed {
        Upserted::Updated
    } else {
        Upserted::Inserted
    })
}

pub fn get(conn: &Connection, id: &Uuid) -> Result<Option<WifiBroadcast>> {
    optional(conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id.to_string()],
        row_to_broadcast,
    ))
}

/// Overwrite the `hide_name` flag. Fails with `NotFound` for unknown ids.
pub fn set_hide_name(conn: &Connection, id: &Uuid, hide_name: bool) -> Result<()> {
    let affected = conn.execute(
        "UPDATE wifi_broadcasts SET hide_name = ?2, updated_at = datetime('now') WHERE id = ?1",
        params![id.to_string(), hide_name],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn list(conn: &Connection) -> Result<Vec<WifiBroadcast>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY ssid ASC"))?;
    let rows = stmt.query_map([], row_to_broadcast)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_broadcast(row: &rusqlite::Row<'_>) -> rusqlite::Result<WifiBroadcast> {
    Ok(WifiBroadcast {
        id: uuid_column(row, 0)?,
        ssid: row.get(1)?,
        active: row.get(2)?,
        hide_name: row.get(3)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Database;

    fn office() -> WifiBroadcast {
        WifiBroadcast {
            id: Uuid::new_v4(),
            ssid: "Office".into(),
            active: true,
            hide_name: false,
        }
    }

    #[test]
    fn upsert_then_toggle() {
        let db = Database::open_in_memory().unwrap();
        let wifi = office();

        assert_eq!(upsert(db.conn(), &wifi).unwrap(), Upserted::Inserted);
        assert_eq!(upsert(db.conn(), &wifi).unwrap(), Upserted::Updated);

        set_hide_name(db.conn(), &wifi.id, true).unwrap();
        let stored = get(db.conn(), &wifi.id).unwrap().unwrap();
        assert!(stored.hide_name);
        assert_eq!(list(db.conn()).unwrap(), vec![stored]);
    }

    #[test]
    fn toggle_unknown_broadcast() {
        let db = Database::open_in_memory().unwrap();

        let result = set_hide_name(db.conn(), &Uuid::new_v4(), true);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
