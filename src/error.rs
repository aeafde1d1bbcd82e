//! Error types for the dockyard state resolution engine.

use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("sled error: {}", err),
        ))
    }
}

/// Engine and registry surface errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}
