//! Configuration loading facade.
//!
//! Layers sources in override order: merge-policy defaults, then the
//! global XDG file, then workspace files. Missing files are not errors;
//! an unparseable file is.

use crate::config::merge::merge_policy;
use crate::config::sources::{global_file, workspace_file};
use crate::config::DockyardConfig;
use crate::error::EngineError;
use std::path::{Path, PathBuf};

/// Loads `DockyardConfig` from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace root.
    pub fn load(workspace_root: &Path) -> Result<DockyardConfig, EngineError> {
        let mut builder = merge_policy::builder_with_defaults()
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;

        builder = global_file::add_to_builder(builder)
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;
        builder = workspace_file::add_to_builder(builder, workspace_root)
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;

        builder
            .build()
            .and_then(|merged| merged.try_deserialize())
            .map_err(|e| EngineError::ConfigError(e.to_string()))
    }

    /// Load configuration from a single explicit file, skipping the layered
    /// sources entirely.
    pub fn load_from_file(path: &Path) -> Result<DockyardConfig, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            EngineError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Path of the global config file, when a config home exists.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
