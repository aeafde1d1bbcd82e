//! Dockyard CLI Binary
//!
//! Command-line interface for the dockyard workspace state engine.

use clap::Parser;
use dockyard::cli::{map_error, Cli, RunContext};
use dockyard::config::ConfigLoader;
use dockyard::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Dockyard CLI starting");

    let context = match RunContext::new(
        cli.workspace_root.clone(),
        cli.config.clone(),
        cli.data_dir.clone(),
        cli.user,
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing run context: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace_root)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }

    config
}
