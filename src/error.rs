//! Error types for configuration composition.

use std::path::PathBuf;
use thiserror::Error;

/// Errors observable while loading settings and composing bundler configurations.
///
/// Misconfigured paths and entries are not represented here; the bundler reports
/// the unresolvable references they produce.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid browser list in {path}: {message}")]
    BrowserList { path: PathBuf, message: String },

    #[error("Invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Environment file error: {0}")]
    EnvFile(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ComposeError {
    fn from(err: config::ConfigError) -> Self {
        ComposeError::ConfigError(err.to_string())
    }
}

impl From<dotenvy::Error> for ComposeError {
    fn from(err: dotenvy::Error) -> Self {
        ComposeError::EnvFile(err.to_string())
    }
}
