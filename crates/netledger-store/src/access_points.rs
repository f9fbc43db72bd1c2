use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::database::optional;
use crate::error::{Result, StoreError};
use crate::models::{AccessPoint, Upserted, attributes_columns};

const SELECT_COLUMNS: &str = "SELECT id, hostname, ip_address, mac_address, state FROM access_points";

/// Insert the access point, or overwrite every attribute of the existing row.
pub fn upsert(conn: &Connection, ap: &AccessPoint) -> Result<Upserted> {
    let id = ap.attributes.id.to_string();
    let existed = exists(conn, &id)?;

    conn.execute(
        "INSERT INTO access_points (id, hostname, ip_address, mac_address, state)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             hostname    = excluded.hostname,
             ip_address  = excluded.ip_address,
             mac_address = excluded.mac_address,
             state       = excluded.state,
             updated_at  = datetime('now')",
        params![
            id,
            ap.attributes.hostname,
            ap.attributes.ip_address,
            ap.attributes.mac_address,
            ap.state,
        ],
    )?;

    Ok(if existed {
        Upserted::Updated
    } else {
        Upserted::Inserted
    })
}

fn exists(conn: &Connection, id: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM access_points WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?)
}

/// Hostname of an access point, if it is known locally.
pub fn hostname(conn: &Connection, id: &Uuid) -> Result<Option<String>> {
    optional(conn.query_row(
        "SELECT hostname FROM access_points WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    ))
}

pub fn get(conn: &Connection, id: &Uuid) -> Result<AccessPoint> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id.to_string()],
        row_to_access_point,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

pub fn list(conn: &Connection) -> Result<Vec<AccessPoint>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY hostname ASC"))?;
    let rows = stmt.query_map([], row_to_access_point)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_access_point(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccessPoint> {
    Ok(AccessPoint {
        attributes: attributes_columns(row)?,
        state: row.get(4)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Database;
    use crate::models::DeviceAttributes;

    fn ap(id: Uuid, hostname: &str, state: &str) -> AccessPoint {
        AccessPoint {
            attributes: DeviceAttributes {
                id,
                hostname: hostname.into(),
                ip_address: Some("10.0.0.7".into()),
                mac_address: Some("aa:bb:cc:dd:ee:07".into()),
            },
            state: state.into(),
        }
    }

    #[test]
    fn upsert_reports_insert_then_update() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4();

        assert_eq!(upsert(db.conn(), &ap(id, "ap-east", "ONLINE")).unwrap(), Upserted::Inserted);
        assert_eq!(upsert(db.conn(), &ap(id, "ap-east", "ONLINE")).unwrap(), Upserted::Updated);
        assert_eq!(list(db.conn()).unwrap().len(), 1);
    }

    #[test]
    fn upsert_overwrites_attributes() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4();

        upsert(db.conn(), &ap(id, "ap-east", "ONLINE")).unwrap();
        upsert(db.conn(), &ap(id, "ap-east-2", "OFFLINE")).unwrap();

        let stored = get(db.conn(), &id).unwrap();
        assert_eq!(stored.attributes.hostname, "ap-east-2");
        assert_eq!(stored.state, "OFFLINE");
        assert_eq!(hostname(db.conn(), &id).unwrap().as_deref(), Some("ap-east-2"));
    }

    #[test]
    fn unknown_access_point() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4();

        assert!(hostname(db.conn(), &id).unwrap().is_none());
        assert!(matches!(get(db.conn(), &id), Err(StoreError::NotFound)));
    }
}
