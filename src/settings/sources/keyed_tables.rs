//! Tables keyed by user-chosen names: `[entries]` and `[logging.modules]`.
//!
//! The layered builder folds key case, so these tables are re-read from the
//! same settings files with `toml` and replace what the builder produced.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::ComposeError;

/// Case-preserving tables merged across the settings files, lowest layer first.
/// `None` when no file declares the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedTables {
    pub entries: Option<BTreeMap<String, String>>,
    pub modules: Option<BTreeMap<String, String>>,
}

/// Read the keyed tables from `files`. Later files win per key.
pub fn read_keyed_tables(files: &[&Path]) -> Result<KeyedTables, ComposeError> {
    let mut tables = KeyedTables::default();
    for path in files {
        let contents = std::fs::read_to_string(path)?;
        let document: toml::Table = contents.parse().map_err(|e: toml::de::Error| {
            ComposeError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        merge_table(&mut tables.entries, document.get("entries"), path)?;
        let modules = document.get("logging").and_then(|l| l.get("modules"));
        merge_table(&mut tables.modules, modules, path)?;
    }
    Ok(tables)
}

fn merge_table(
    target: &mut Option<BTreeMap<String, String>>,
    value: Option<&toml::Value>,
    path: &Path,
) -> Result<(), ComposeError> {
    let Some(value) = value else {
        return Ok(());
    };
    let table: BTreeMap<String, String> = value.clone().try_into().map_err(|e| {
        ComposeError::ConfigError(format!("Invalid table in {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), keys = table.len(), "read keyed table");
    target.get_or_insert_with(BTreeMap::new).extend(table);
    Ok(())
}
