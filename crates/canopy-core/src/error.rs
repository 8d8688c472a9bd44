// ── Core error types ──
//
// User-facing errors from canopy-core. Front-ends never match on raw HTTP
// statuses; the `From<canopy_api::Error>` impl folds transport failures
// into the categories the views report.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Network errors ───────────────────────────────────────────────
    #[error("Cannot reach the tracking service: {reason}")]
    Network { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Server errors ────────────────────────────────────────────────
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Rejected by server: {message}")]
    Validation { message: String },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("{message}")]
    ValidationFailed { message: String },

    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<canopy_api::Error> for CoreError {
    fn from(err: canopy_api::Error) -> Self {
        match err {
            canopy_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            canopy_api::Error::Transport(ref e) => match e.status() {
                Some(status) => CoreError::Server {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => CoreError::Network {
                    reason: e.to_string(),
                },
            },
            canopy_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            canopy_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            canopy_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "Record".into(),
                identifier: path,
            },
            canopy_api::Error::Validation { message, .. } => CoreError::Validation { message },
            err @ canopy_api::Error::Server { .. } => CoreError::Server {
                status: err.status().unwrap_or_default(),
                message: err.to_string(),
            },
            canopy_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
