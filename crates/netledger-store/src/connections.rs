use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::database::optional;
use crate::error::{Result, StoreError};
use crate::models::{ClientConnection, timestamp_column, uuid_column};

/// The device a client is currently recorded as attached through.
pub fn uplink(conn: &Connection, client_id: &Uuid) -> Result<Option<Uuid>> {
    optional(conn.query_row(
        "SELECT access_point_id FROM connections WHERE client_id = ?1",
        params![client_id.to_string()],
        |row| uuid_column(row, 0),
    ))
}

/// Point the client's single edge at `access_point_id`, creating it if needed.
pub fn set_uplink(conn: &Connection, client_id: &Uuid, access_point_id: &Uuid) -> Result<()> {
    conn.execute(
        "INSERT INTO connections (client_id, access_point_id)
         VALUES (?1, ?2)
         ON CONFLICT(client_id) DO UPDATE SET
             access_point_id = excluded.access_point_id,
             updated_at      = datetime('now')",
        params![client_id.to_string(), access_point_id.to_string()],
    )?;
    Ok(())
}

pub fn list(conn: &Connection) -> Result<Vec<ClientConnection>> {
    let mut stmt = conn.prepare(
        "SELECT client_id, access_point_id, updated_at FROM connections ORDER BY updated_at DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ClientConnection {
            client_id: uuid_column(row, 0)?,
            access_point_id: uuid_column(row, 1)?,
            updated_at: timestamp_column(row, 2)?,
        })
    })?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Database;

    #[test]
    fn one_edge_per_client() {
        let db = Database::open_in_memory().unwrap();
        let client = Uuid::new_v4();
        let ap1 = Uuid::new_v4();
        let ap2 = Uuid::new_v4();

        assert!(uplink(db.conn(), &client).unwrap().is_none());

        set_uplink(db.conn(), &client, &ap1).unwrap();
        set_uplink(db.conn(), &client, &ap2).unwrap();

        assert_eq!(uplink(db.conn(), &client).unwrap(), Some(ap2));
        let edges = list(db.conn()).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].access_point_id, ap2);
    }
}
