use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{NewTrafficSample, TrafficSample, timestamp_column, uuid_column};

/// Insert a fresh sample. Samples are never updated.
pub fn insert(conn: &Connection, sample: &NewTrafficSample) -> Result<i64> {
    conn.execute(
        "INSERT INTO traffic_samples
             (access_point_id, uptime_sec, tx_retries_pct, tx_rate_bps, rx_rate_bps)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            sample.access_point_id.to_string(),
            sample.uptime_sec,
            sample.tx_retries_pct,
            sample.tx_rate_bps,
            sample.rx_rate_bps,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Latest samples for one access point, newest first.
pub fn for_access_point(
    conn: &Connection,
    access_point_id: &Uuid,
    limit: u32,
) -> Result<Vec<TrafficSample>> {
    let mut stmt = conn.prepare(
        "SELECT id, access_point_id, uptime_sec, tx_retries_pct, tx_rate_bps, rx_rate_bps, created_at
         FROM traffic_samples
         WHERE access_point_id = ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![access_point_id.to_string(), limit], |row| {
        Ok(TrafficSample {
            id: row.get(0)?,
            sample: NewTrafficSample {
                access_point_id: uuid_column(row, 1)?,
                uptime_sec: row.get(2)?,
                tx_retries_pct: row.get(3)?,
                tx_rate_bps: row.get(4)?,
                rx_rate_bps: row.get(5)?,
            },
            created_at: timestamp_column(row, 6)?,
        })
    })?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// Delete every sample created strictly before `cutoff` (`YYYY-MM-DD HH:MM:SS`).
pub fn delete_before(conn: &Connection, cutoff: &str) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM traffic_samples WHERE created_at < ?1",
        params![cutoff],
    )?)
}

pub fn count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM traffic_samples", [], |row| row.get(0))?)
}
