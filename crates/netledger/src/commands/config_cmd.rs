//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Input, Select};

use netledger_config::{Config, Profile, config_path};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, value: &str, hint: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: hint.into(),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_value(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "controller" => {
            netledger_config::parse_controller_url(&value)?;
            profile.controller = value;
        }
        "site" => profile.site = value,
        "platform" => {
            netledger_config::parse_platform(&value)?;
            profile.platform = value;
        }
        "api_key" | "api-key" => profile.api_key = Some(value),
        "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
        "insecure" => {
            profile.insecure = Some(parse_field("insecure", &value, "must be 'true' or 'false'")?);
        }
        "timeout" => {
            profile.timeout = Some(parse_field("timeout", &value, "must be a number (seconds)")?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(PathBuf::from(value)),
        "database" => profile.database = Some(PathBuf::from(value)),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: controller, site, platform, \
                     api_key, api_key_env, insecure, timeout, ca_cert, database"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config_path();
            eprintln!("netledger configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let controller: String = Input::new()
                .with_prompt("Controller URL")
                .default("https://192.168.1.1".into())
                .validate_with(|v: &String| {
                    netledger_config::parse_controller_url(v)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let platforms = &["unifi-os", "standalone"];
            let platform = Select::new()
                .with_prompt("Controller platform")
                .items(platforms)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the API key?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let api_key = if store_selection == 0 {
                netledger_config::store_api_key(&profile_name, &key)?;
                eprintln!("   ✓ API key stored in system keyring");
                None
            } else {
                Some(key)
            };

            let site: String = Input::new()
                .with_prompt("Site name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile::new(controller);
            profile.site = site;
            profile.platform = platforms[platform].into();
            profile.api_key = api_key;

            // Keep other profiles when re-running the wizard
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let written = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: netledger sync");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            // Never print plaintext keys
            for profile in cfg.profiles.values_mut() {
                if profile.api_key.is_some() {
                    profile.api_key = Some("********".into());
                }
            }
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n({e})")),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(String::new()));
            set_profile_value(profile, &key, value)?;

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(&cfg, profile_name));
            }

            let secret = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            netledger_config::store_api_key(&profile_name, &secret)?;

            eprintln!("✓ API key stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut profile = Profile::new("https://192.168.1.1");

        assert!(set_profile_value(&mut profile, "username", "admin".into()).is_err());
        assert!(set_profile_value(&mut profile, "timeout", "soon".into()).is_err());
        assert!(set_profile_value(&mut profile, "platform", "cloud".into()).is_err());

        assert!(set_profile_value(&mut profile, "timeout", "10".into()).is_ok());
        assert_eq!(profile.timeout, Some(10));
        assert!(set_profile_value(&mut profile, "platform", "standalone".into()).is_ok());
        assert_eq!(profile.platform, "standalone");
    }
}
