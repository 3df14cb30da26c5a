//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
