// ABOUTME: Error taxonomy for the persistence gateway and its backends.
// ABOUTME: Load/save paths swallow these after logging; only backup import surfaces them.

use thiserror::Error;

/// Errors raised by backends and by backup import.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A backend call failed or rejected.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Stored or imported text is not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An imported backup is missing required fields or has the wrong shape.
    #[error("Invalid data structure")]
    Validation,

    /// A backup file could not be read.
    #[error("Error reading file: {0}")]
    Io(#[from] std::io::Error),

    /// A key-value key that cannot be mapped onto the store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl StoreError {
    /// Wrap any displayable backend failure as `StorageUnavailable`.
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}
