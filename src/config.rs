//! Configuration System
//!
//! Hierarchical configuration for the engine: storage location, write-buffer
//! TTL, and logging. Sources merge in override order (defaults, global XDG
//! file, workspace files) with runtime validation.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DockyardConfig {
    /// Storage paths
    #[serde(default)]
    pub storage: StorageConfig,

    /// Write-buffer tuning
    #[serde(default)]
    pub buffer: BufferConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage location configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Explicit database directory; when unset, the store lives under
    /// `$XDG_DATA_HOME/dockyard/workspaces/<hash>` for the workspace root.
    #[serde(default)]
    pub data_root: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the database directory for a workspace root.
    pub fn resolve_data_root(&self, workspace_root: &Path) -> PathBuf {
        match &self.data_root {
            Some(explicit) => explicit.clone(),
            None => paths::workspace_data_dir(workspace_root),
        }
    }
}

/// Write-buffer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Lifetime of a buffered value in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    30
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl BufferConfig {
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Storage(String),
    Buffer(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Buffer(msg) => write!(f, "Buffer: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl DockyardConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(root) = &self.storage.data_root {
            if root.as_os_str().is_empty() {
                errors.push(ValidationError::Storage(
                    "data_root cannot be empty".to_string(),
                ));
            }
        }

        if self.buffer.ttl_secs == 0 {
            errors.push(ValidationError::Buffer(
                "ttl_secs must be positive".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
