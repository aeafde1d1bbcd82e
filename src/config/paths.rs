//! XDG path helpers
//!
//! Resolves the config and data homes, and the per-workspace data directory
//! under `$XDG_DATA_HOME/dockyard/workspaces/<hash>`. The hash is a short
//! blake3 digest of the canonical workspace root, so two checkouts of the
//! same host never share a store.

use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Config home: `$XDG_CONFIG_HOME`, else the platform default.
pub fn config_home() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg));
        }
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Data home: `$XDG_DATA_HOME`, else the platform default.
pub fn data_home() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg));
        }
    }
    BaseDirs::new().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Short hex digest identifying a workspace root.
pub fn workspace_hash(workspace_root: &Path) -> String {
    let canonical = workspace_root
        .canonicalize()
        .unwrap_or_else(|_| workspace_root.to_path_buf());
    let digest = blake3::hash(canonical.to_string_lossy().as_bytes());
    hex::encode(&digest.as_bytes()[..6])
}

/// Data directory for one workspace root.
pub fn workspace_data_dir(workspace_root: &Path) -> PathBuf {
    let base = data_home().unwrap_or_else(|| workspace_root.join(".dockyard"));
    base.join("dockyard")
        .join("workspaces")
        .join(workspace_hash(workspace_root))
}
