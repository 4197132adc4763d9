//! Fragment merge with a per-field array policy.
//!
//! Merge semantics:
//! - Objects: deep-merge by key (recursive)
//! - Scalars: override (overlay wins)
//! - Arrays: resolved through the [`MergeStrategy`] table by dotted key path,
//!   concatenated (base then overlay) when the path has no entry
//!
//! Inputs are never modified; every merge returns a new value.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::trace;

use crate::error::ComposeError;
use crate::fragment::ConfigFragment;

/// How two arrays found at the same key path are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayPolicy {
    /// Base entries, then overlay entries.
    Append,
    /// Overlay entries, then base entries.
    Prepend,
    /// Overlay array wins entirely.
    Replace,
}

/// Declarative policy table keyed by dotted path (`module.rules`, `plugins`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStrategy {
    default_arrays: ArrayPolicy,
    fields: BTreeMap<String, ArrayPolicy>,
}

impl Default for MergeStrategy {
    fn default() -> Self {
        Self {
            default_arrays: ArrayPolicy::Append,
            fields: BTreeMap::new(),
        }
    }
}

impl MergeStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for arrays found at `path`.
    pub fn with_field(mut self, path: impl Into<String>, policy: ArrayPolicy) -> Self {
        self.fields.insert(path.into(), policy);
        self
    }

    /// Policy used by every composition step: overlay rules and plugins run first.
    pub fn bundler() -> Self {
        Self::new()
            .with_field("module.rules", ArrayPolicy::Prepend)
            .with_field("plugins", ArrayPolicy::Prepend)
    }

    pub fn policy_for(&self, path: &str) -> ArrayPolicy {
        self.fields.get(path).copied().unwrap_or(self.default_arrays)
    }

    /// Merge `overlay` onto `base`, returning a new value.
    pub fn merge(&self, base: &Value, overlay: &Value) -> Value {
        self.merge_at("", base.clone(), overlay.clone())
    }

    fn merge_at(&self, path: &str, base: Value, overlay: Value) -> Value {
        match (base, overlay) {
            (Value::Object(mut base_map), Value::Object(overlay_map)) => {
                for (key, overlay_value) in overlay_map {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    let merged = match base_map.remove(&key) {
                        Some(base_value) => self.merge_at(&child_path, base_value, overlay_value),
                        None => overlay_value,
                    };
                    base_map.insert(key, merged);
                }
                Value::Object(base_map)
            }
            (Value::Array(base_items), Value::Array(overlay_items)) => {
                let policy = self.policy_for(path);
                trace!(path, ?policy, "merging arrays");
                match policy {
                    ArrayPolicy::Append => {
                        Value::Array(base_items.into_iter().chain(overlay_items).collect())
                    }
                    ArrayPolicy::Prepend => {
                        Value::Array(overlay_items.into_iter().chain(base_items).collect())
                    }
                    ArrayPolicy::Replace => Value::Array(overlay_items),
                }
            }
            (_, overlay) => overlay,
        }
    }
}

/// Merge two typed fragments under `strategy`.
pub fn merge_fragments(
    base: &ConfigFragment,
    overlay: &ConfigFragment,
    strategy: &MergeStrategy,
) -> Result<ConfigFragment, ComposeError> {
    let base = serde_json::to_value(base)?;
    let overlay = serde_json::to_value(overlay)?;
    let merged = strategy.merge(&base, &overlay);
    Ok(serde_json::from_value(merged)?)
}
