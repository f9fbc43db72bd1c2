//! CLI flag overrides on top of `netledger-config`.
//!
//! Core never sees these types -- it receives a pre-built `LedgerConfig`.

use std::path::PathBuf;

use secrecy::SecretString;

use netledger_config::{Config, Profile, config_path, default_database_path};
use netledger_core::LedgerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use netledger_config::{load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Database path: flag > profile > defaults > platform data dir.
pub fn resolve_database_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    if let Some(ref path) = global.database {
        return path.clone();
    }
    let profile_name = active_profile_name(global, config);
    config
        .profiles
        .get(&profile_name)
        .and_then(|p| p.database.clone())
        .or_else(|| config.defaults.database.clone())
        .unwrap_or_else(default_database_path)
}

/// Build a `LedgerConfig` from the config file, profile, and CLI overrides.
///
/// This is the single boundary where CLI config types cross into core types.
pub fn build_ledger_config(global: &GlobalOpts, config: &Config) -> Result<LedgerConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let (mut profile, api_key) = if let Some(profile) = config.profiles.get(&profile_name) {
        // 1. CLI flag, then the profile's own chain (env > keyring > plaintext)
        let key = match global.api_key {
            Some(ref key) => SecretString::from(key.clone()),
            None => netledger_config::resolve_api_key(profile, &profile_name)?,
        };
        (profile.clone(), key)
    } else {
        if global.profile.is_some() {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }

        // No profile -- build from CLI flags / env vars alone
        let controller = global.controller.clone().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let key = global
            .api_key
            .clone()
            .map(SecretString::from)
            .ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.clone(),
            })?;
        (Profile::new(controller), key)
    };

    // 2. Flag overrides
    if let Some(ref controller) = global.controller {
        profile.controller.clone_from(controller);
    }
    if let Some(ref site) = global.site {
        profile.site.clone_from(site);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if let Some(ref database) = global.database {
        profile.database = Some(database.clone());
    }

    Ok(netledger_config::build_ledger_config(
        &profile,
        &config.defaults,
        api_key,
    )?)
}
