//! Asset manifest name normalization.
//!
//! The manifest plugin maps logical asset names to emitted files. Names are
//! normalized by stripping a 32-hex-character content hash bracketed by dots,
//! so `app.3f2504e04f8911d39a0c0305a9a6eb4d.js` is listed as `app.js`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ComposeError;
use crate::fragment::Pattern;

/// Hash segment matcher; group 2 holds the extension that is kept.
pub const HASH_SEGMENT_PATTERN: &str = r"(\.[a-f0-9]{32})(\..*)$";

/// Substitution applied to a match of [`HASH_SEGMENT_PATTERN`].
pub const HASH_SEGMENT_REPLACEMENT: &str = "$2";

static HASH_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(HASH_SEGMENT_PATTERN).expect("hash segment pattern is valid"));

/// Strip the content-hash segment from an asset name. Identity when absent.
pub fn normalize_asset_name(name: &str) -> Cow<'_, str> {
    HASH_SEGMENT.replace(name, HASH_SEGMENT_REPLACEMENT)
}

/// Name-mapping descriptor carried in the manifest plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMapping {
    pub pattern: Pattern,
    pub replacement: String,
}

impl NameMapping {
    pub fn strip_content_hash() -> Self {
        Self {
            pattern: Pattern::new(HASH_SEGMENT_PATTERN),
            replacement: HASH_SEGMENT_REPLACEMENT.to_string(),
        }
    }
}

/// Rewrite every key of a manifest object through [`normalize_asset_name`].
///
/// Values (the emitted file names) are kept. When two keys normalize to the same
/// name the later one in key order wins.
pub fn normalize_manifest(entries: &Map<String, Value>) -> Map<String, Value> {
    let mut normalized = Map::new();
    for (name, file) in entries {
        let logical = normalize_asset_name(name).into_owned();
        if let Some(previous) = normalized.insert(logical.clone(), file.clone()) {
            warn!(
                name = %logical,
                previous = %previous,
                "manifest entries collide after hash stripping"
            );
        }
    }
    normalized
}

/// Load a manifest JSON file and return it with normalized names.
pub fn normalize_manifest_file(path: &Path) -> Result<Map<String, Value>, ComposeError> {
    let contents = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| ComposeError::Manifest {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    match value {
        Value::Object(entries) => {
            debug!(path = %path.display(), entries = entries.len(), "normalizing manifest");
            Ok(normalize_manifest(&entries))
        }
        other => Err(ComposeError::Manifest {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
