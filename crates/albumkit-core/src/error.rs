// ── Core error types ──
//
// User-facing errors from albumkit-core. Callers never see reqwest or
// JSON parse failures directly; the `From<albumkit_api::Error>` impl
// translates gateway errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach file server at {url}: {reason}")]
    NetworkUnreachable { url: String, reason: String },

    #[error("File server request timed out")]
    Timeout,

    // ── Server errors ────────────────────────────────────────────────
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Favorite toggle failed for {id}: {message}")]
    FavoriteToggleFailed { id: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures where the server never answered.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkUnreachable { .. } | Self::Timeout)
    }
}

// ── Conversion from gateway errors ───────────────────────────────────

impl From<albumkit_api::Error> for CoreError {
    fn from(err: albumkit_api::Error) -> Self {
        match err {
            albumkit_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Server {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::NetworkUnreachable {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            albumkit_api::Error::Server { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            albumkit_api::Error::Server { status, message } => {
                CoreError::Server { status, message }
            }
            albumkit_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            albumkit_api::Error::Client(message) => CoreError::Config { message },
            albumkit_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            albumkit_api::Error::Io(e) => CoreError::Validation {
                message: format!("Cannot read upload file: {e}"),
            },
        }
    }
}
