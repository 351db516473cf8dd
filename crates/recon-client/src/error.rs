//! Error types for backend API calls.

use thiserror::Error;

/// Result type alias for backend API calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors a backend API call can produce.
///
/// `Transport` means no usable HTTP response arrived at all; `Api` means
/// the backend answered with a non-success status. The poller treats both
/// the same way (one failed attempt), the CLI reports them differently.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Status code of an API-level error, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
