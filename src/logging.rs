//! Logging System
//!
//! Structured logging implementation using the `tracing` crate. Provides
//! configurable log levels, output formats, and destinations.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output is "file")
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stdout".to_string()
}

fn default_log_file() -> PathBuf {
    // Placeholder; callers resolve the real path against the workspace data
    // dir before initializing file output.
    PathBuf::from(".dockyard/dockyard.log")
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: default_log_file(),
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Check the format and output fields without initializing anything.
    pub fn validate(&self) -> Result<(), String> {
        if self.format != "json" && self.format != "text" {
            return Err(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                self.format
            ));
        }
        if !matches!(self.output.as_str(), "stdout" | "stderr" | "file") {
            return Err(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', or 'file')",
                self.output
            ));
        }
        Ok(())
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (DOCKYARD_LOG, DOCKYARD_LOG_FORMAT, etc.)
/// 2. Configuration file
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), EngineError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let base_subscriber = Registry::default().with(filter);
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let get_file_writer = || -> Result<std::fs::File, EngineError> {
        let log_file = config
            .map(|c| c.file.clone())
            .unwrap_or_else(default_log_file);

        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EngineError::ConfigError(format!("Failed to create log directory: {}", e))
            })?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| {
                EngineError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
            })
    };

    if format == "json" {
        if output == "file" {
            let file_writer = get_file_writer()?;
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(file_writer),
                )
                .init();
        } else {
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    } else if output == "file" {
        let file_writer = get_file_writer()?;
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(file_writer),
            )
            .init();
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(std::io::stdout),
            )
            .init();
    }

    Ok(())
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, EngineError> {
    // DOCKYARD_LOG takes precedence over everything in the config file
    if let Ok(filter) = EnvFilter::try_from_env("DOCKYARD_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");

    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);

    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(directive.parse().map_err(|e| {
                EngineError::ConfigError(format!("Invalid log directive: {}", e))
            })?);
        }
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, EngineError> {
    if let Ok(format) = std::env::var("DOCKYARD_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");

    if format != "json" && format != "text" {
        return Err(EngineError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Determine output destination from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<String, EngineError> {
    if let Ok(output) = std::env::var("DOCKYARD_LOG_OUTPUT") {
        if matches!(output.as_str(), "stdout" | "stderr" | "file") {
            return Ok(output);
        }
    }

    let output = config.map(|c| c.output.as_str()).unwrap_or("stdout");

    if !matches!(output, "stdout" | "stderr" | "file") {
        return Err(EngineError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', or 'file')",
            output
        )));
    }

    Ok(output.to_string())
}
