// ── Ledger ──
//
// Facade tying the controller client, the ledger database and the
// reconcilers together. Remote calls always finish before a transaction
// is opened.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use netledger_api::{IntegrationClient, TlsMode, TransportConfig};

use crate::config::{LedgerConfig, TlsVerification};
use crate::db::LedgerDb;
use crate::error::CoreError;
use crate::fetch;
use crate::model::EntityKind;
use crate::reconcile::{self, PassReport};
use crate::result::OperationResult;

/// Result of one pass as handed to presentation layers.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PassOutcome {
    pub kind: EntityKind,
    pub result: OperationResult,
    /// Present when the pass committed.
    pub report: Option<PassReport>,
}

/// One lock per entity kind; different kinds may reconcile concurrently.
#[derive(Default)]
struct PassLocks {
    access_points: Mutex<()>,
    wifi_broadcasts: Mutex<()>,
    clients: Mutex<()>,
    connections: Mutex<()>,
}

impl PassLocks {
    fn for_kind(&self, kind: EntityKind) -> &Mutex<()> {
        match kind {
            EntityKind::AccessPoints => &self.access_points,
            EntityKind::WifiBroadcasts => &self.wifi_broadcasts,
            EntityKind::Clients => &self.clients,
            EntityKind::Connections => &self.connections,
        }
    }
}

struct LedgerInner {
    config: LedgerConfig,
    client: IntegrationClient,
    site_id: Uuid,
    db: LedgerDb,
    locks: PassLocks,
}

/// Cheaply cloneable handle to a configured ledger.
#[derive(Clone)]
pub struct Ledger {
    inner: Arc<LedgerInner>,
}

impl Ledger {
    // ── Construction ─────────────────────────────────────────────────

    /// Build the API client, resolve the site, and make sure the database
    /// opens (running migrations).
    pub async fn connect(config: LedgerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = IntegrationClient::from_api_key(
            config.url.as_str(),
            &config.api_key,
            &transport,
            config.platform,
        )?;

        let site_id = client
            .resolve_site(&config.site)
            .await?
            .ok_or_else(|| CoreError::SiteNotFound {
                name: config.site.clone(),
            })?;
        debug!(site_id = %site_id, "resolved Integration API site UUID");

        Self::with_client(config, client, site_id).await
    }

    /// Wrap an already-built client for a known site.
    pub async fn with_client(
        config: LedgerConfig,
        client: IntegrationClient,
        site_id: Uuid,
    ) -> Result<Self, CoreError> {
        let db = LedgerDb::new(config.database_path.clone());
        db.ensure_ready().await?;
        let ledger = Self {
            inner: Arc::new(LedgerInner {
                config,
                client,
                site_id,
                db,
                locks: PassLocks::default(),
            }),
        };
        Ok(ledger)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.inner.config
    }

    pub fn site_id(&self) -> Uuid {
        self.inner.site_id
    }

    pub(crate) fn client(&self) -> &IntegrationClient {
        &self.inner.client
    }

    /// Database-only operations (retention, pruning, reads).
    pub fn db(&self) -> &LedgerDb {
        &self.inner.db
    }

    // ── Reconciliation ───────────────────────────────────────────────

    /// Run one reconciliation pass for `kind`.
    ///
    /// Overlapping calls for the same kind queue behind each other.
    pub async fn reconcile(&self, kind: EntityKind) -> Result<PassReport, CoreError> {
        let _guard = self.inner.locks.for_kind(kind).lock().await;

        let fetched = fetch::fetch(self.client(), &self.inner.site_id, kind).await?;
        let report = self
            .db()
            .with_db(move |db| {
                db.with_transaction(|tx| reconcile::apply_snapshot(tx, &fetched.snapshot))
                    .map(|mut report| {
                        report.warnings.splice(0..0, fetched.warnings);
                        report
                    })
            })
            .await?;

        info!(%report, "reconciliation pass committed");
        for warning in &report.warnings {
            warn!(kind = %kind, "{warning}");
        }
        Ok(report)
    }

    /// Run the given passes in order. A failing pass is reported and does
    /// not stop the ones after it.
    pub async fn sync(&self, kinds: &[EntityKind]) -> Vec<PassOutcome> {
        let mut outcomes = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let outcome = match self.reconcile(kind).await {
                Ok(report) => PassOutcome {
                    kind,
                    result: OperationResult::success(report.to_string()),
                    report: Some(report),
                },
                Err(e) => {
                    warn!(kind = %kind, error = %e, "reconciliation pass failed, rolled back");
                    PassOutcome {
                        kind,
                        result: OperationResult::from_error(format!("{kind} pass failed."), &e),
                        report: None,
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Every pass, in dependency order.
    pub async fn sync_all(&self) -> Vec<PassOutcome> {
        self.sync(&EntityKind::SYNC_ORDER).await
    }

    // ── Daemon ───────────────────────────────────────────────────────

    /// Reconcile on the fetch interval and prune on the prune interval
    /// until `cancel` fires. Both run once immediately.
    pub async fn run(&self, cancel: CancellationToken) {
        let config = &self.inner.config;
        let mut fetch_tick = ticker(config.fetch_interval);
        let mut prune_tick = ticker(config.prune_interval);

        info!(
            fetch_secs = config.fetch_interval.as_secs(),
            prune_secs = config.prune_interval.as_secs(),
            "ledger daemon started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = fetch_tick.tick() => {
                    let outcomes = self.sync_all().await;
                    let failed = outcomes.iter().filter(|o| !o.result.successful).count();
                    debug!(passes = outcomes.len(), failed, "sync cycle finished");
                }
                _ = prune_tick.tick() => {
                    let result = self.db().prune().await;
                    if result.successful {
                        info!(message = %result.message, "pruned old history");
                    } else {
                        warn!(message = %result.message, errors = ?result.errors, "pruning failed");
                    }
                }
            }
        }

        info!("ledger daemon stopped");
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

fn build_transport(config: &LedgerConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}
