//! Global config file source: ~/.config/dockyard/config.toml or $XDG_CONFIG_HOME/dockyard/config.toml

use crate::config::paths;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::PathBuf;
use tracing::warn;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    paths::config_home().map(|home| home.join("dockyard").join("config.toml"))
}

/// Add global config file source to builder if it exists.
/// Uses XDG_CONFIG_HOME when set, otherwise ~/.config/dockyard/config.toml.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            let canonical_path = global_path
                .canonicalize()
                .unwrap_or_else(|_| global_path.clone());
            builder = builder
                .add_source(File::with_name(canonical_path.to_str().unwrap()).required(false));
        } else {
            warn!(
                config_path = %global_path.display(),
                "Default configuration file not found at ~/.config/dockyard/config.toml. \
                 Consider creating it for user-level defaults."
            );
        }
    }
    Ok(builder)
}
