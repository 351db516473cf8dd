//! Error types for recon-core.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while loading or writing configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}
