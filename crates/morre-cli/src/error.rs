//! Error types for the MORRE CLI
//!
//! User-facing errors with clear, actionable messages. Failures coming from
//! the client library keep their tier so the CLI can report it.

use morre_client::{ErrorKind, MorreError};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Query failed in the client library
    #[error(transparent)]
    Morre(#[from] MorreError),

    /// Command-line argument could not be understood
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Vocabulary cache operation failed
    #[error("Cache error: {0}. Try running 'morre cache clear' to reset the cache.")]
    Cache(String),

    /// Vocabulary cache database failed
    #[error("Cache database error: {0}. Try running 'morre cache clear' to reset the cache.")]
    CacheDb(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables.")]
    Config(String),
}

impl CliError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Failure tier of a client library error
    pub fn morre_kind(&self) -> Option<ErrorKind> {
        match self {
            CliError::Morre(e) => Some(e.kind()),
            _ => None,
        }
    }
}
