//! Shared configuration for netledger.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `netledger_core::LedgerConfig`. The CLI layers its
//! flag overrides on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netledger_core::{
    ControllerPlatform, DEFAULT_FETCH_INTERVAL_SECS, DEFAULT_PRUNE_INTERVAL_SECS, LedgerConfig,
    TlsVerification,
};

/// Keyring service name under which API keys are stored.
pub const KEYRING_SERVICE: &str = "netledger";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between reconciliation cycles in `netledger run`.
    #[serde(default = "default_fetch_interval")]
    pub fetch_interval: u64,

    /// Seconds between pruning runs in `netledger run`.
    #[serde(default = "default_prune_interval")]
    pub prune_interval: u64,

    /// Ledger database; falls back to the platform data dir.
    pub database: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            fetch_interval: default_fetch_interval(),
            prune_interval: default_prune_interval(),
            database: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_fetch_interval() -> u64 {
    DEFAULT_FETCH_INTERVAL_SECS
}
fn default_prune_interval() -> u64 {
    DEFAULT_PRUNE_INTERVAL_SECS
}

/// A named controller profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://192.168.1.1").
    pub controller: String,

    /// Site name, internal reference, or UUID.
    #[serde(default = "default_site")]
    pub site: String,

    /// "unifi-os" (console, proxied API) or "standalone".
    #[serde(default = "default_platform")]
    pub platform: String,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Per-profile ledger database.
    pub database: Option<PathBuf>,
}

impl Profile {
    /// Profile pointing at `controller` with every other field defaulted.
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            site: default_site(),
            platform: default_platform(),
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            database: None,
        }
    }
}

fn default_site() -> String {
    "default".into()
}
fn default_platform() -> String {
    "unifi-os".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "netledger", "netledger")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback(".config");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default ledger database location when neither profile nor defaults set one.
pub fn default_database_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback(".local/share");
            p.push("netledger.db");
            p
        },
        |dirs| dirs.data_dir().join("netledger.db"),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("netledger");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path`, then `NETLEDGER_` variables
/// (`__` separates nesting, e.g. `NETLEDGER_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETLEDGER_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
}

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API key for `profile_name` in the system keyring.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

pub fn parse_platform(value: &str) -> Result<ControllerPlatform, ConfigError> {
    match value {
        "unifi-os" | "unifios" | "console" => Ok(ControllerPlatform::UnifiOs),
        "standalone" | "self-hosted" => Ok(ControllerPlatform::Standalone),
        other => Err(ConfigError::Validation {
            field: "platform".into(),
            reason: format!("expected 'unifi-os' or 'standalone', got '{other}'"),
        }),
    }
}

pub fn parse_controller_url(value: &str) -> Result<url::Url, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {value}"),
    })
}

/// Build a `LedgerConfig` from a profile and an already-resolved key.
pub fn build_ledger_config(
    profile: &Profile,
    defaults: &Defaults,
    api_key: SecretString,
) -> Result<LedgerConfig, ConfigError> {
    let url = parse_controller_url(&profile.controller)?;
    let database_path = profile
        .database
        .clone()
        .or_else(|| defaults.database.clone())
        .unwrap_or_else(default_database_path);

    let mut config = LedgerConfig::new(url, api_key, database_path);
    config.site.clone_from(&profile.site);
    config.platform = parse_platform(&profile.platform)?;
    config.tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.fetch_interval = Duration::from_secs(defaults.fetch_interval);
    config.prune_interval = Duration::from_secs(defaults.prune_interval);
    Ok(config)
}

/// Build a `LedgerConfig` from a profile with no CLI flag overrides.
pub fn profile_to_ledger_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<LedgerConfig, ConfigError> {
    let api_key = resolve_api_key(profile, profile_name)?;
    build_ledger_config(profile, defaults, api_key)
}
