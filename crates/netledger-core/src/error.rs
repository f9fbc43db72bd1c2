// ── Core error types ──
//
// Errors surfaced by netledger-core. Transport-layer details are translated
// into domain variants by the `From<netledger_api::Error>` impl; store
// failures are wrapped as-is so the rollback reason is visible.

use netledger_store::StoreError;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out")]
    Timeout,

    #[error("Site not found: {name}")]
    SiteNotFound { name: String },

    // ── Remote API errors ────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The API-specific error code, when the controller sent one.
        code: Option<String>,
        /// HTTP status code (if the request got a response).
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The remote action went through but the local record of it did not.
    #[error("{message}")]
    PartialSuccess { message: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Detail lines for the `errors` list of an operation result.
    ///
    /// Remote rejections expand into `Status code: …` / `Response: …`.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Api {
                message,
                status: Some(status),
                ..
            } => vec![format!("Status code: {status}"), format!("Response: {message}")],
            Self::Api {
                message,
                status: None,
                ..
            } => vec![format!("Response: {message}")],
            Self::PartialSuccess { reason, .. } => vec![reason.clone()],
            other => vec![other.to_string()],
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netledger_api::Error> for CoreError {
    fn from(err: netledger_api::Error) -> Self {
        match err {
            netledger_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            netledger_api::Error::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key".into(),
            },
            netledger_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            netledger_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            netledger_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            netledger_api::Error::Integration {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            netledger_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("Unexpected controller response: {message}"))
            }
        }
    }
}

impl From<tokio::task::JoinError> for CoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        CoreError::Internal(format!("database task failed: {err}"))
    }
}
