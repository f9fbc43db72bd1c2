// ── Runtime ledger configuration ──
//
// These types describe *how* to reach a controller and where the ledger
// database lives. They carry credential data and tuning, but never touch
// disk. The CLI constructs a `LedgerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use netledger_api::ControllerPlatform;
use secrecy::SecretString;
use url::Url;

/// Fetch cadence of the daemon loop.
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 300;

/// Pruning cadence of the daemon loop.
pub const DEFAULT_PRUNE_INTERVAL_SECS: u64 = 3600;

/// Retention horizon used when the settings row is absent.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Longest accepted retention horizon (100 years).
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

/// Everything a [`Ledger`](crate::Ledger) needs, passed in explicitly.
///
/// Built by the CLI, passed to `Ledger::connect` -- core never reads config
/// files or environment variables.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Controller URL (e.g., `https://192.168.1.1`).
    pub url: Url,
    /// Integration API key.
    pub api_key: SecretString,
    /// Site name, internal reference, or UUID.
    pub site: String,
    /// Whether the controller is UniFi OS (proxied) or a standalone app.
    pub platform: ControllerPlatform,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// How often the daemon reconciles every entity kind.
    pub fetch_interval: Duration,
    /// How often the daemon prunes old audit rows and samples.
    pub prune_interval: Duration,
}

impl LedgerConfig {
    /// Config with default site, TLS mode, timeouts, and intervals.
    pub fn new(url: Url, api_key: SecretString, database_path: PathBuf) -> Self {
        Self {
            url,
            api_key,
            site: "default".into(),
            platform: ControllerPlatform::default(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            database_path,
            fetch_interval: Duration::from_secs(DEFAULT_FETCH_INTERVAL_SECS),
            prune_interval: Duration::from_secs(DEFAULT_PRUNE_INTERVAL_SECS),
        }
    }
}
