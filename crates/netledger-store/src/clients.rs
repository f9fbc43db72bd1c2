use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::database::optional;
use crate::error::{Result, StoreError};
use crate::models::{Client, DeviceAttributes, attributes_columns, uuid_column};

const SELECT_COLUMNS: &str = "SELECT id, hostname, ip_address, mac_address, active FROM clients";

pub fn get(conn: &Connection, id: &Uuid) -> Result<Option<Client>> {
    optional(conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id.to_string()],
        row_to_client,
    ))
}

/// Insert a first-seen client, marked active.
pub fn insert(conn: &Connection, attributes: &DeviceAttributes) -> Result<()> {
    conn.execute(
        "INSERT INTO clients (id, hostname, ip_address, mac_address, active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        params![
            attributes.id.to_string(),
            attributes.hostname,
            attributes.ip_address,
            attributes.mac_address,
        ],
    )?;
    Ok(())
}

/// Refresh a known client's attributes and set its active flag.
pub fn update(conn: &Connection, attributes: &DeviceAttributes, active: bool) -> Result<()> {
    let affected = conn.execute(
        "UPDATE clients
         SET hostname = ?2, ip_address = ?3, mac_address = ?4, active = ?5,
             updated_at = datetime('now')
         WHERE id = ?1",
        params![
            attributes.id.to_string(),
            attributes.hostname,
            attributes.ip_address,
            attributes.mac_address,
            active,
        ],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Ids of every client currently marked active.
pub fn active_ids(conn: &Connection) -> Result<Vec<Uuid>> {
    let mut stmt = conn.prepare("SELECT id FROM clients WHERE active = 1 ORDER BY hostname ASC")?;
    let rows = stmt.query_map([], |row| uuid_column(row, 0))?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

pub fn mark_inactive(conn: &Connection, id: &Uuid) -> Result<()> {
    conn.execute(
        "UPDATE clients SET active = 0, updated_at = datetime('now') WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

/// Hostname of a client, if it is known locally.
pub fn hostname(conn: &Connection, id: &Uuid) -> Result<Option<String>> {
    optional(conn.query_row(
        "SELECT hostname FROM clients WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    ))
}

/// All clients, active first.
pub fn list(conn: &Connection) -> Result<Vec<Client>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} ORDER BY active DESC, hostname ASC"
    ))?;
    let rows = stmt.query_map([], row_to_client)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_client(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        attributes: attributes_columns(row)?,
        active: row.get(4)?,
    })
}
