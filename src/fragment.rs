//! Typed bundler configuration fragments.
//!
//! A fragment is a partial bundler configuration. Fragments are combined with
//! [`crate::merge::merge_fragments`]; every field is optional so that an
//! environment fragment can carry only what it changes.
//!
//! Regular expressions cannot be expressed in JSON, so matchers are emitted as
//! `{"regex": <source>, "flags": <flags>}` objects for the bundler-side loader
//! to turn back into `RegExp` instances.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::target::BuildMode;

/// Regular-expression matcher carried as source text plus flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub regex: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flags: String,
}

impl Pattern {
    pub fn new(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            flags: String::new(),
        }
    }

    pub fn case_insensitive(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            flags: "i".to_string(),
        }
    }
}

/// One loader in a rule's loader chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderUse {
    pub loader: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl LoaderUse {
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: Value::Null,
        }
    }

    pub fn with_options(loader: impl Into<String>, options: Value) -> Self {
        Self {
            loader: loader.into(),
            options,
        }
    }
}

/// A module rule: a file matcher plus the loader chain applied to matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub test: Pattern,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Pattern>,
    #[serde(rename = "use", default)]
    pub uses: Vec<LoaderUse>,
}

impl Rule {
    pub fn new(test: Pattern, uses: Vec<LoaderUse>) -> Self {
        Self {
            test,
            exclude: Vec::new(),
            uses,
        }
    }

    /// Loader names in chain order.
    pub fn loaders(&self) -> Vec<&str> {
        self.uses.iter().map(|u| u.loader.as_str()).collect()
    }
}

/// A plugin invocation: the plugin's package name and its constructor options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Value::Null,
        }
    }

    pub fn with_options(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolve {
    #[serde(default)]
    pub alias: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchOptions {
    pub poll: bool,
    pub ignored: Pattern,
}

/// Development server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServer {
    pub public: String,
    pub content_base: String,
    pub host: String,
    /// Numeric when the configured port parses, otherwise the raw string.
    pub port: Value,
    pub https: bool,
    pub disable_host_check: bool,
    pub hot: bool,
    pub overlay: bool,
    pub watch_content_base: bool,
    pub compress: bool,
    pub watch_options: WatchOptions,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub split_chunks: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub minimizer: Vec<PluginSpec>,
}

/// A partial bundler configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<BuildMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Output>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve: Option<Resolve>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<Optimization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devtool: Option<String>,
}

impl ConfigFragment {
    /// Module rules in order, empty when the fragment carries no `module` key.
    pub fn rules(&self) -> &[Rule] {
        self.module.as_ref().map(|m| m.rules.as_slice()).unwrap_or(&[])
    }

    /// First rule whose matcher source equals `regex`.
    pub fn rule_matching(&self, regex: &str) -> Option<&Rule> {
        self.rules().iter().find(|r| r.test.regex == regex)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }
}
