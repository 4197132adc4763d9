//! Logging System
//!
//! Structured logging using the `tracing` crate. Stdout carries composed
//! configuration output, so logs go to stderr unless configured otherwise.

use crate::error::ComposeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a full filter directive, e.g. `dualpack=debug`.
pub const LOG_FILTER_ENV: &str = "DUALPACK_LOG";
pub const LOG_FORMAT_ENV: &str = "DUALPACK_LOG_FORMAT";
pub const LOG_OUTPUT_ENV: &str = "DUALPACK_LOG_OUTPUT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, stdout, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (required when output is "file")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
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
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stderr,
    Stdout,
    File(PathBuf),
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. Environment variables (DUALPACK_LOG, DUALPACK_LOG_FORMAT, DUALPACK_LOG_OUTPUT)
/// 2. The given config (CLI flags already applied)
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), ComposeError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let destination = determine_destination(config)?;

    let use_color = config.color && !matches!(destination, Destination::File(_));
    let writer = make_writer(&destination)?;

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| ComposeError::Logging(format!("Failed to install subscriber: {}", e)))
}

fn make_writer(destination: &Destination) -> Result<BoxMakeWriter, ComposeError> {
    Ok(match destination {
        Destination::Stderr => BoxMakeWriter::new(std::io::stderr),
        Destination::Stdout => BoxMakeWriter::new(std::io::stdout),
        Destination::File(path) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
    })
}

fn open_log_file(path: &Path) -> Result<std::fs::File, ComposeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ComposeError::Logging(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ComposeError::Logging(format!("Failed to open log file {:?}: {}", path, e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ComposeError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ComposeError::Logging(format!("Invalid log level '{}': {}", config.level, e)))?;

    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ComposeError::Logging(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Determine output format from environment or config
fn determine_format(config: &LoggingConfig) -> Result<String, ComposeError> {
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    parse_format(&config.format)
}

fn parse_format(format: &str) -> Result<String, ComposeError> {
    match format {
        "json" | "text" => Ok(format.to_string()),
        other => Err(ComposeError::Logging(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Determine output destination from environment or config
fn determine_destination(config: &LoggingConfig) -> Result<Destination, ComposeError> {
    let output = std::env::var(LOG_OUTPUT_ENV).unwrap_or_else(|_| config.output.clone());
    parse_destination(&output, config.file.as_deref())
}

fn parse_destination(output: &str, file: Option<&Path>) -> Result<Destination, ComposeError> {
    match output {
        "stderr" => Ok(Destination::Stderr),
        "stdout" => Ok(Destination::Stdout),
        "file" => file
            .map(|p| Destination::File(p.to_path_buf()))
            .ok_or_else(|| {
                ComposeError::Logging("Log output 'file' requires a log file path".to_string())
            }),
        other => Err(ComposeError::Logging(format!(
            "Invalid log output: {} (must be 'stderr', 'stdout', or 'file')",
            other
        ))),
    }
}
