//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use netledger_config::ConfigError;
use netledger_core::{CoreError, OperationResult};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const STORE: i32 = 5;
    pub const PARTIAL: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(netledger::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(netledger::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(netledger::auth_failed),
        help(
            "Verify your API key (Settings > Integrations on the controller).\n\
             Run: netledger config set-key"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(netledger::no_credentials),
        help(
            "Configure credentials with: netledger config init\n\
             Or set the NETLEDGER_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netledger::not_found),
        help("Run: netledger {list_command} to see what the ledger knows about")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(netledger::api_error))]
    ApiError {
        message: String,
        /// HTTP status and controller error code, when present.
        #[help]
        context: Option<String>,
    },

    // ── Operation results ────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(netledger::operation_failed))]
    OperationFailed {
        message: String,
        #[help]
        details: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(
        code(netledger::partial_success),
        help("The controller accepted the change; only the local record is missing.")
    )]
    PartialSuccess { message: String },

    // ── Local storage ────────────────────────────────────────────────
    #[error("Ledger database error: {message}")]
    #[diagnostic(
        code(netledger::store),
        help("Check the --database path and its permissions.")
    )]
    Store { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netledger::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(netledger::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: netledger config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(netledger::no_config),
        help(
            "Create one with: netledger config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(netledger::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netledger::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Store { .. } => exit_code::STORE,
            Self::PartialSuccess { .. } => exit_code::PARTIAL,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Turn an unsuccessful operation result into an error.
    pub fn from_result(result: &OperationResult) -> Self {
        let details = (!result.errors.is_empty()).then(|| result.errors.join("\n"));
        Self::OperationFailed {
            message: result.message.clone(),
            details,
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError ─────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::SiteNotFound { name } => CliError::NotFound {
                resource_type: "site".into(),
                identifier: name,
                list_command: "config show".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type.into(),
                list_command: format!("{entity_type} list"),
                identifier,
            },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                message,
                context: match (status, code) {
                    (Some(s), Some(c)) => Some(format!("HTTP {s}, code {c}")),
                    (Some(s), None) => Some(format!("HTTP {s}")),
                    (None, Some(c)) => Some(format!("code {c}")),
                    (None, None) => None,
                },
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Store(e) => CliError::Store {
                message: e.to_string(),
            },

            CoreError::PartialSuccess { message, .. } => CliError::PartialSuccess { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::OperationFailed {
                message,
                details: None,
            },
        }
    }
}
