//! Environment snapshot: the process environment plus an optional `.env` file.
//!
//! Settings never read the process environment directly; they are resolved from
//! a snapshot taken once at startup.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ComposeError;

pub const PUBLIC_PATH: &str = "PUBLIC_PATH";
pub const DEVSERVER_PUBLIC: &str = "DEVSERVER_PUBLIC";
pub const DEVSERVER_HOST: &str = "DEVSERVER_HOST";
pub const DEVSERVER_PORT: &str = "DEVSERVER_PORT";
pub const DEVSERVER_POLL: &str = "DEVSERVER_POLL";
pub const DEVSERVER_HTTPS: &str = "DEVSERVER_HTTPS";

/// Immutable view of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Capture the process environment, layered over `dotenv_path` when it exists.
    ///
    /// Process variables win over `.env` values. The process environment itself
    /// is not modified.
    pub fn capture(dotenv_path: Option<&Path>) -> Result<Self, ComposeError> {
        let mut vars = BTreeMap::new();

        if let Some(path) = dotenv_path.filter(|p| p.is_file()) {
            for item in dotenvy::from_path_iter(path)? {
                let (key, value) = item?;
                vars.insert(key, value);
            }
            debug!(path = %path.display(), count = vars.len(), "loaded .env file");
        }

        for (key, value) in std::env::vars_os() {
            if let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) {
                vars.insert(key, value);
            }
        }

        Ok(Self { vars })
    }

    /// Value of `key`; an empty value counts as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Boolean flag value of `key`.
    ///
    /// Unrecognized values resolve to `false` with a warning.
    pub fn flag(&self, key: &str) -> Option<bool> {
        let raw = self.get(key)?;
        match parse_flag(raw) {
            Some(value) => Some(value),
            None => {
                warn!(
                    variable = key,
                    value = raw,
                    "unrecognized boolean value, treating as false"
                );
                Some(false)
            }
        }
    }
}

/// Parse a boolean flag.
///
/// Accepts `true/false`, `yes/no`, `on/off` (any case) and integers, where any
/// nonzero integer is true. Returns `None` for anything else.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => return Some(true),
        "false" | "no" | "off" => return Some(false),
        _ => {}
    }
    trimmed.parse::<i64>().ok().map(|n| n != 0)
}
