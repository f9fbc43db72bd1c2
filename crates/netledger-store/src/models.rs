//! Row types persisted in the netledger database.
//!
//! Every struct derives `Serialize` so the CLI can hand it straight to its
//! JSON/YAML renderers.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TIMESTAMP_FORMAT;

// ── Shared attributes ───────────────────────────────────────────────

/// Attributes common to every network device netledger tracks.
///
/// Access points and clients both carry this record; what differs is the
/// state wrapped around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    /// Controller-assigned identity. Never changes.
    pub id: Uuid,
    pub hostname: String,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
}

// ── Access points ───────────────────────────────────────────────────

/// An adopted access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    #[serde(flatten)]
    pub attributes: DeviceAttributes,
    /// Operational state as reported by the controller (`ONLINE`, `OFFLINE`, ...).
    pub state: String,
}

// ── Clients ─────────────────────────────────────────────────────────

/// A client device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(flatten)]
    pub attributes: DeviceAttributes,
    /// `false` once the client is missing from a non-empty snapshot.
    pub active: bool,
}

// ── Connections ─────────────────────────────────────────────────────

/// The uplink edge between a client and the device it is associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConnection {
    pub client_id: Uuid,
    pub access_point_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

// ── WiFi broadcasts ─────────────────────────────────────────────────

/// A WiFi broadcast (SSID).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiBroadcast {
    pub id: Uuid,
    pub ssid: String,
    pub active: bool,
    /// `true` when the SSID is not advertised in beacons.
    pub hide_name: bool,
}

// ── Traffic samples ─────────────────────────────────────────────────

/// Counters captured for one access point during one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrafficSample {
    pub access_point_id: Uuid,
    pub uptime_sec: i64,
    pub tx_retries_pct: f64,
    pub tx_rate_bps: i64,
    pub rx_rate_bps: i64,
}

impl NewTrafficSample {
    /// All-zero sample recorded for devices that are not online.
    pub fn zeroed(access_point_id: Uuid) -> Self {
        Self {
            access_point_id,
            uptime_sec: 0,
            tx_retries_pct: 0.0,
            tx_rate_bps: 0,
            rx_rate_bps: 0,
        }
    }
}

/// A stored traffic sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSample {
    pub id: i64,
    #[serde(flatten)]
    pub sample: NewTrafficSample,
    pub created_at: DateTime<Utc>,
}

// ── Audit log ───────────────────────────────────────────────────────

/// An audit entry about to be appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub message: String,
    pub client_id: Option<Uuid>,
    pub access_point_id: Option<Uuid>,
}

impl NewAuditEntry {
    /// An entry that references neither a client nor an access point.
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            client_id: None,
            access_point_id: None,
        }
    }

    pub fn for_client(message: impl Into<String>, client_id: Uuid) -> Self {
        Self {
            client_id: Some(client_id),
            ..Self::plain(message)
        }
    }

    pub fn for_access_point(message: impl Into<String>, access_point_id: Uuid) -> Self {
        Self {
            access_point_id: Some(access_point_id),
            ..Self::plain(message)
        }
    }
}

/// A stored audit entry. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub message: String,
    pub client_id: Option<Uuid>,
    pub access_point_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ── Upsert outcome ──────────────────────────────────────────────────

/// Whether an upsert created the row or overwrote an existing one.
///
/// An overwrite with identical values still reports `Updated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upserted {
    Inserted,
    Updated,
}

// ── Column conversions ──────────────────────────────────────────────

pub(crate) fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn optional_uuid_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        Uuid::parse_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

pub(crate) fn timestamp_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn attributes_columns(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<DeviceAttributes> {
    Ok(DeviceAttributes {
        id: uuid_column(row, 0)?,
        hostname: row.get(1)?,
        ip_address: row.get(2)?,
        mac_address: row.get(3)?,
    })
}
