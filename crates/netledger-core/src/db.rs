// ── Local ledger handle ──
//
// Everything that only touches the database: retention, pruning and the
// read side. Usable without a controller, so the CLI can list and prune
// offline. Every call opens its own connection on a blocking thread and
// drops it on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use netledger_store::{
    AccessPoint, AuditLogEntry, Client, ClientConnection, Database, TrafficSample, WifiBroadcast,
    access_points, audit_log, broadcasts, clients, connections, traffic_samples,
};

use crate::error::CoreError;
use crate::messages;
use crate::result::OperationResult;
use crate::retention::{self, PruneReport};

#[derive(Debug, Clone)]
pub struct LedgerDb {
    path: Arc<PathBuf>,
}

impl LedgerDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the database on a blocking thread and run `f` against it.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T, CoreError> + Send + 'static,
    {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || {
            let mut db = Database::open_at(&path)?;
            f(&mut db)
        })
        .await?
    }

    /// Open once so migrations run and path problems surface early.
    pub async fn ensure_ready(&self) -> Result<(), CoreError> {
        self.with_db(|_| Ok(())).await
    }

    // ── Retention ────────────────────────────────────────────────────

    pub async fn retention_days(&self) -> Result<u32, CoreError> {
        self.with_db(|db| retention::retention_days(db.conn())).await
    }

    pub async fn set_retention_days(&self, days: u32) -> OperationResult {
        match self
            .with_db(move |db| retention::set_retention_days(db.conn(), days))
            .await
        {
            Ok(()) => OperationResult::success(messages::retention_changed(days)),
            Err(e) => OperationResult::from_error(messages::RETENTION_UPDATE_FAILED, &e),
        }
    }

    /// Delete history older than the horizon, in one transaction.
    pub async fn prune_report(&self) -> Result<PruneReport, CoreError> {
        let now = Utc::now();
        self.with_db(move |db| db.with_transaction(|tx| retention::prune(tx, now)))
            .await
    }

    pub async fn prune(&self) -> OperationResult {
        match self.prune_report().await {
            Ok(report) => OperationResult::success(messages::pruned(report.total())),
            Err(e) => OperationResult::from_error(messages::PRUNE_FAILED, &e),
        }
    }

    // ── Read side ────────────────────────────────────────────────────

    pub async fn access_points(&self) -> Result<Vec<AccessPoint>, CoreError> {
        self.with_db(|db| Ok(access_points::list(db.conn())?)).await
    }

    pub async fn clients(&self) -> Result<Vec<Client>, CoreError> {
        self.with_db(|db| Ok(clients::list(db.conn())?)).await
    }

    pub async fn connections(&self) -> Result<Vec<ClientConnection>, CoreError> {
        self.with_db(|db| Ok(connections::list(db.conn())?)).await
    }

    pub async fn wifi_broadcasts(&self) -> Result<Vec<WifiBroadcast>, CoreError> {
        self.with_db(|db| Ok(broadcasts::list(db.conn())?)).await
    }

    /// Newest first.
    pub async fn audit_log(&self, limit: u32) -> Result<Vec<AuditLogEntry>, CoreError> {
        self.with_db(move |db| Ok(audit_log::recent(db.conn(), limit)?))
            .await
    }

    /// Newest first. Unknown access points yield an empty list.
    pub async fn traffic_samples(
        &self,
        access_point_id: Uuid,
        limit: u32,
    ) -> Result<Vec<TrafficSample>, CoreError> {
        self.with_db(move |db| {
            Ok(traffic_samples::for_access_point(
                db.conn(),
                &access_point_id,
                limit,
            )?)
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn works_without_a_controller() {
        let dir = tempfile::tempdir().unwrap();
        let db = LedgerDb::new(dir.path().join("sub").join("ledger.db"));

        db.ensure_ready().await.unwrap();
        assert_eq!(db.retention_days().await.unwrap(), 30);
        assert!(db.set_retention_days(14).await.successful);
        assert_eq!(db.retention_days().await.unwrap(), 14);

        let pruned = db.prune().await;
        assert!(pruned.successful);
        assert_eq!(
            pruned.message,
            "Deleted 0 old network audit logs and traffic samples."
        );
        assert!(db.access_points().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unopenable_path_fails_the_operation() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let db = LedgerDb::new(blocker.join("ledger.db"));

        let result = db.prune().await;

        assert!(!result.successful);
        assert_eq!(result.message, "Error while deleting old data from db.");
        assert_eq!(result.errors.len(), 1);
    }
}
