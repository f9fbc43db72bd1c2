use thiserror::Error;

/// Top-level error type for the `netledger-api` crate.
///
/// Every remote call returns one of these instead of panicking, so a
/// reconciliation pass can abort just itself. `netledger-core` maps them
/// into `CoreError`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The API key could not be turned into a header value.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Invalid API key (rejected by controller with 401).
    #[error("Invalid API key")]
    InvalidApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Integration API ─────────────────────────────────────────────
    /// Non-success status from the Integration API.
    ///
    /// `message` is the `message` field of the JSON error body when one
    /// was sent, otherwise the raw body (or the status line if empty).
    #[error("Integration API error (HTTP {status}): {message}")]
    Integration {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Integration { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Integration { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status code of the failed response, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Integration { status, .. } => Some(*status),
            Self::InvalidApiKey => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Integration { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
