//! CLI parse: clap types for Dockyard. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dockyard CLI - Context-scoped workspace state
#[derive(Parser)]
#[command(name = "dockyard")]
#[command(about = "Context-scoped state resolution for admin workspace docks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace_root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Database directory (overrides the configured data root)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Acting user id
    #[arg(long, default_value = "1")]
    pub user: u64,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hydrate a workspace manifest and show its widgets
    Status {
        /// Workspace id or display name
        #[arg(long, default_value = "default")]
        workspace: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve one key for a context
    Get {
        /// Logical key (layout, items, pins, telemetry, pref:*, or any state key)
        key: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Save a JSON value under one key for a context
    Set {
        /// Logical key
        key: String,
        /// JSON payload
        value: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Toggle a widget's pinned flag
    TogglePin {
        /// Widget id
        widget: String,
        /// Workspace id
        #[arg(long, default_value = "default")]
        workspace: String,
    },
    /// Delete every saved item row for a workspace
    Reset {
        /// Workspace id
        #[arg(long, default_value = "default")]
        workspace: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Context addressing flags shared by get/set.
#[derive(clap::Args)]
pub struct ContextArgs {
    /// Workspace id
    #[arg(long, default_value = "default")]
    pub workspace: String,

    /// Scope level (global, template, instance)
    #[arg(long, default_value = "global")]
    pub scope: String,

    /// Scope id (template name or template:instance)
    #[arg(long, default_value = "global")]
    pub scope_id: String,

    /// Viewport (desktop, mobile, all)
    #[arg(long, default_value = "all")]
    pub viewport: String,
}
