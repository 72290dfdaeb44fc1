//! Storage error types
//!
//! Errors raised by key-value store implementations and the JSON helpers
//! layered on top of them.

use thiserror::Error;

/// Errors that can occur in the key-value storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing store rejected the operation or is not reachable
    /// (quota exceeded, storage disabled by the browser, poisoned lock)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
