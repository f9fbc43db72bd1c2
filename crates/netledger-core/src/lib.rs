//! Reconciliation engine between `netledger-api` and `netledger-store`.
//!
//! - **[`Ledger`]**: facade owning the API client, the resolved site and the
//!   database path. [`reconcile()`](Ledger::reconcile) runs one pass,
//!   [`sync_all()`](Ledger::sync_all) runs every pass in dependency order and
//!   [`run()`](Ledger::run) keeps doing so on a timer until cancelled.
//!
//! - **Reconcilers** ([`reconcile`]): one `apply` function per
//!   [`EntityKind`], each turning a [`Snapshot`] into upserts plus audit
//!   entries inside a single transaction.
//!
//! - **[`LedgerDb`]**: database-only handle for retention, pruning and the
//!   read side; works without a controller.
//!
//! - **Retention** ([`retention`]): deletes audit entries and traffic samples
//!   older than the stored horizon.
//!
//! - **Admin actions**: [`Ledger::restart_access_point`] and
//!   [`Ledger::toggle_broadcast`] change controller state first and record it
//!   locally only once the controller has confirmed.

mod admin;
pub mod config;
pub mod convert;
pub mod db;
pub mod error;
mod fetch;
pub mod ledger;
pub mod messages;
pub mod model;
pub mod reconcile;
pub mod result;
pub mod retention;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    DEFAULT_FETCH_INTERVAL_SECS, DEFAULT_PRUNE_INTERVAL_SECS, DEFAULT_RETENTION_DAYS,
    LedgerConfig, MAX_RETENTION_DAYS, TlsVerification,
};
pub use db::LedgerDb;
pub use error::CoreError;
pub use ledger::{Ledger, PassOutcome};
pub use model::{EntityKind, ObservedAccessPoint, ObservedUplink, Snapshot};
pub use reconcile::PassReport;
pub use result::OperationResult;
pub use retention::PruneReport;

pub use netledger_api::ControllerPlatform;
