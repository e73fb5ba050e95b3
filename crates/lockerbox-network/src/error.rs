//! Errors returned by the inventory and notification clients.
//!
//! Network errors are never fatal to the kiosk: the poller keeps its previous
//! snapshot and the sync worker drops the mutation.

use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the inventory or notification API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, TLS failure, reset mid-body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Server answered with a non-success status.
    #[error("{endpoint} returned {code}: {message}")]
    Status {
        endpoint: &'static str,
        code: u16,
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// HTTP client or request could not be constructed.
    #[error("Client build error: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// Classify a `reqwest` failure.
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if error.is_builder() {
            Self::ClientBuild(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }

    /// HTTP status code, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
