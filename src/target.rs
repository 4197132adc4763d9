//! Build target and build mode tags.
//!
//! Every per-target decision (file names, browser baseline, which branch emits
//! styles) is made by matching on [`BuildTarget`] in exactly one place per concern.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two parallel bundles built from the same source tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    /// Older browser baseline, wider transpilation.
    Legacy,
    /// Newer browser baseline.
    Modern,
}

impl BuildTarget {
    /// Emission order of the composed output: legacy first.
    pub const ALL: [BuildTarget; 2] = [BuildTarget::Legacy, BuildTarget::Modern];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildTarget::Legacy => "legacy",
            BuildTarget::Modern => "modern",
        }
    }

    /// Asset manifest written by the manifest plugin for this target.
    pub fn manifest_file_name(self) -> &'static str {
        match self {
            BuildTarget::Legacy => "manifest-legacy.json",
            BuildTarget::Modern => "manifest.json",
        }
    }

    /// Suffix appended to the `[name]` placeholder of emitted scripts.
    pub fn bundle_suffix(self) -> &'static str {
        match self {
            BuildTarget::Legacy => "-legacy",
            BuildTarget::Modern => "",
        }
    }

    /// Static bundle-analysis report file name.
    pub fn report_file_name(self) -> String {
        format!("report-{}.html", self.as_str())
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bundler mode the configuration is composed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }

    /// Content-hash placeholder used in emitted script names.
    pub fn hash_placeholder(self) -> &'static str {
        match self {
            BuildMode::Development => "[hash]",
            BuildMode::Production => "[chunkhash]",
        }
    }

    pub fn devtool(self) -> &'static str {
        match self {
            BuildMode::Development => "inline-source-map",
            BuildMode::Production => "source-map",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
