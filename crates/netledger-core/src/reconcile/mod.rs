//! Reconciliation engine.
//!
//! Each entity kind has one `apply` function that diffs a complete
//! [`Snapshot`] against the stored current state and writes the row changes
//! together with their audit entries. Dispatch goes through the static
//! [`RECONCILERS`] table keyed by [`EntityKind`].
//!
//! `apply` functions run inside a transaction opened by the caller and never
//! commit themselves: returning `Err` leaves nothing behind once the caller
//! drops the transaction.

pub mod access_points;
pub mod broadcasts;
pub mod clients;
pub mod connections;

use std::fmt;

use serde::Serialize;

use netledger_store::rusqlite::Connection;
use netledger_store::Upserted;

use crate::error::CoreError;
use crate::model::{EntityKind, Snapshot};

// ── Pass report ─────────────────────────────────────────────────────

/// What one reconciliation pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub kind: EntityKind,
    /// Rows in the snapshot.
    pub observed: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Clients that came back after being marked inactive.
    pub reactivated: usize,
    /// Clients marked inactive because they left the snapshot.
    pub deactivated: usize,
    /// Connection edges created or re-pointed.
    pub roamed: usize,
    /// Traffic samples recorded.
    pub samples: usize,
    /// Audit entries appended.
    pub events: usize,
    /// Non-fatal problems (missing counters, unresolved hostnames).
    pub warnings: Vec<String>,
}

impl PassReport {
    pub fn new(kind: EntityKind, observed: usize) -> Self {
        Self {
            kind,
            observed,
            inserted: 0,
            updated: 0,
            reactivated: 0,
            deactivated: 0,
            roamed: 0,
            samples: 0,
            events: 0,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn record_upsert(&mut self, outcome: Upserted) {
        match outcome {
            Upserted::Inserted => self.inserted += 1,
            Upserted::Updated => self.updated += 1,
        }
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} observed, {} inserted, {} updated",
            self.kind, self.observed, self.inserted, self.updated
        )?;
        match self.kind {
            EntityKind::AccessPoints => write!(f, ", {} samples", self.samples)?,
            EntityKind::Clients => write!(
                f,
                ", {} reconnected, {} disconnected",
                self.reactivated, self.deactivated
            )?,
            EntityKind::Connections => write!(f, ", {} roamed", self.roamed)?,
            EntityKind::WifiBroadcasts => {}
        }
        write!(f, ", {} events", self.events)?;
        if !self.warnings.is_empty() {
            write!(f, ", {} warnings", self.warnings.len())?;
        }
        Ok(())
    }
}

// ── Dispatch table ──────────────────────────────────────────────────

/// Applies one snapshot of its kind inside an open transaction.
pub type ApplyFn = fn(&Connection, &Snapshot, &mut PassReport) -> Result<(), CoreError>;

/// One row of the dispatch table.
pub struct Reconciler {
    pub kind: EntityKind,
    pub apply: ApplyFn,
}

/// Reconciliation logic per entity kind.
pub static RECONCILERS: [Reconciler; 4] = [
    Reconciler {
        kind: EntityKind::AccessPoints,
        apply: access_points::apply,
    },
    Reconciler {
        kind: EntityKind::WifiBroadcasts,
        apply: broadcasts::apply,
    },
    Reconciler {
        kind: EntityKind::Clients,
        apply: clients::apply,
    },
    Reconciler {
        kind: EntityKind::Connections,
        apply: connections::apply,
    },
];

pub fn reconciler(kind: EntityKind) -> Result<&'static Reconciler, CoreError> {
    RECONCILERS
        .iter()
        .find(|r| r.kind == kind)
        .ok_or_else(|| CoreError::Internal(format!("no reconciler registered for {kind}")))
}

/// Apply `snapshot` through the reconciler registered for its kind.
pub fn apply_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<PassReport, CoreError> {
    let kind = snapshot.kind();
    let mut report = PassReport::new(kind, snapshot.len());
    (reconciler(kind)?.apply)(conn, snapshot, &mut report)?;
    Ok(report)
}

fn mismatch(expected: EntityKind, snapshot: &Snapshot) -> CoreError {
    CoreError::Internal(format!(
        "{expected} reconciler handed a {} snapshot",
        snapshot.kind()
    ))
}
