//! Browser target lists, read from the project's `package.json`.

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::ComposeError;
use crate::target::BuildTarget;

/// Browser queries per build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserLists {
    pub legacy: Vec<String>,
    pub modern: Vec<String>,
}

impl Default for BrowserLists {
    fn default() -> Self {
        Self {
            legacy: default_legacy(),
            modern: default_modern(),
        }
    }
}

fn default_legacy() -> Vec<String> {
    ["> 1%", "last 2 versions", "Firefox ESR"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_modern() -> Vec<String> {
    [
        "last 2 Chrome versions",
        "not Chrome < 60",
        "last 2 Safari versions",
        "not Safari < 10.1",
        "last 2 iOS versions",
        "not iOS < 10.3",
        "last 2 Firefox versions",
        "not Firefox < 54",
        "last 2 Edge versions",
        "not Edge < 15",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// A query list written either as an array or as an object whose values are queries.
///
/// Object values are taken in JavaScript `Object.values` order: array-index keys
/// ascending by number, then the remaining keys in document order.
#[derive(Debug)]
struct QueryList(Vec<String>);

impl QueryList {
    fn into_queries(self) -> Vec<String> {
        self.0
    }

    fn from_object(pairs: Vec<(String, String)>) -> Self {
        let (mut indexed, named): (Vec<_>, Vec<_>) = pairs
            .into_iter()
            .map(|(key, value)| (array_index(&key), value))
            .partition(|(index, _)| index.is_some());
        indexed.sort_by_key(|(index, _)| *index);
        Self(
            indexed
                .into_iter()
                .chain(named)
                .map(|(_, value)| value)
                .collect(),
        )
    }
}

/// Numeric value of a canonical array-index key (`"0"`, `"12"`, not `"01"`).
fn array_index(key: &str) -> Option<u32> {
    key.parse::<u32>()
        .ok()
        .filter(|n| *n != u32::MAX && n.to_string() == key)
}

impl<'de> Deserialize<'de> for QueryList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QueryListVisitor)
    }
}

struct QueryListVisitor;

impl<'de> Visitor<'de> for QueryListVisitor {
    type Value = QueryList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array or object of browser queries")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut queries = Vec::new();
        while let Some(query) = seq.next_element::<String>()? {
            queries.push(query);
        }
        Ok(QueryList(queries))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs: Vec<(String, String)> = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            // a repeated key keeps its first position and its last value
            match pairs.iter_mut().find(|(existing, _)| *existing == key) {
                Some(pair) => pair.1 = value,
                None => pairs.push((key, value)),
            }
        }
        Ok(QueryList::from_object(pairs))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowsersListSection {
    legacy_browsers: Option<QueryList>,
    modern_browsers: Option<QueryList>,
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    browserslist: Option<BrowsersListSection>,
}

impl BrowserLists {
    pub fn for_target(&self, target: BuildTarget) -> &[String] {
        match target {
            BuildTarget::Legacy => &self.legacy,
            BuildTarget::Modern => &self.modern,
        }
    }

    /// Read `browserslist.legacyBrowsers` / `browserslist.modernBrowsers` from
    /// `<project_root>/package.json`. Missing file or keys fall back to defaults.
    pub fn load(project_root: &Path) -> Result<Self, ComposeError> {
        let path = project_root.join("package.json");
        if !path.is_file() {
            debug!(path = %path.display(), "no package.json, using default browser lists");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let package: PackageJson =
            serde_json::from_str(&contents).map_err(|e| ComposeError::BrowserList {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let section = package.browserslist.unwrap_or_default();
        Ok(Self {
            legacy: section
                .legacy_browsers
                .map(QueryList::into_queries)
                .unwrap_or_else(default_legacy),
            modern: section
                .modern_browsers
                .map(QueryList::into_queries)
                .unwrap_or_else(default_modern),
        })
    }
}
