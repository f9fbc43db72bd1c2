//! # netledger-store
//!
//! SQLite-backed entity store for netledger.
//!
//! Holds the current-state tables (access points, clients, connections,
//! WiFi broadcasts, settings) next to the append-only audit log and the
//! historical traffic-sample table. The crate exposes a synchronous
//! [`Database`] handle plus typed row helpers grouped per table.
//!
//! Every helper takes a plain `&rusqlite::Connection`, so the same function
//! works on a bare connection and inside an open [`rusqlite::Transaction`]
//! (which derefs to a connection). Callers that need several writes to land
//! atomically open a transaction with [`Database::with_transaction`].

pub mod access_points;
pub mod audit_log;
pub mod broadcasts;
pub mod clients;
pub mod connections;
pub mod database;
pub mod migrations;
pub mod models;
pub mod settings;
pub mod traffic_samples;

mod error;

pub use database::Database;
pub use rusqlite;
pub use error::{Result, StoreError};
pub use models::*;

/// Storage format for every timestamp column (`YYYY-MM-DD HH:MM:SS`, UTC).
///
/// Matches SQLite's `datetime('now')`, so values written by column defaults
/// and values computed in Rust compare lexicographically.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a UTC instant in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
