//! Composition pipeline: Settings → Common → {Development, Production}.
//!
//! Each environment fragment is merged over a common fragment with
//! [`MergeStrategy::bundler`], so environment rules and plugins come first.
//! The result is one configuration per [`BuildTarget`], legacy first.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ComposeError;
use crate::fragment::{ConfigFragment, LoaderUse, Pattern, Rule};
use crate::merge::{merge_fragments, MergeStrategy};
use crate::settings::{BrowserLists, Settings, SettingsLoader};
use crate::target::{BuildMode, BuildTarget};

mod common;
pub mod dev;
mod paths;
pub mod prod;

pub use common::{CommonBuilder, CommonConfigs, FONT_TEST, TRANSPILE_TEST};
pub use paths::{absolute_root, resolve_path};

pub const STYLE_TEST: &str = r"\.(scss|css)$";
pub const IMAGE_TEST: &str = r"\.(png|jpe?g|gif|svg|webp)$";
pub const IGNORE_LOADER: &str = "ignore-loader";
pub const STYLE_INJECT_LOADER: &str = "style-loader";

/// Everything the builders read: project root, settings and browser lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Absolute project root; relative settings paths resolve against it
    pub root: PathBuf,
    pub settings: Settings,
    pub browsers: BrowserLists,
}

impl Project {
    pub fn new(root: PathBuf, settings: Settings, browsers: BrowserLists) -> Self {
        Self {
            root,
            settings,
            browsers,
        }
    }

    /// Resolve the root, load settings through `loader` and browser lists from
    /// the root's `package.json`.
    pub fn open(root: &Path, loader: &SettingsLoader) -> Result<Self, ComposeError> {
        let root = absolute_root(root)?;
        let settings = loader.load()?;
        let browsers = BrowserLists::load(&root)?;
        Ok(Self::new(root, settings, browsers))
    }
}

/// Emitted script name pattern, e.g. `js/[name]-legacy.[chunkhash].js`.
pub fn script_filename(mode: BuildMode, target: BuildTarget) -> String {
    format!(
        "js/[name]{}.{}.js",
        target.bundle_suffix(),
        mode.hash_placeholder()
    )
}

/// Image rule. Production modern builds add the optimizer chain.
pub fn image_rule(mode: BuildMode, target: BuildTarget) -> Rule {
    let mut uses = vec![LoaderUse::with_options(
        "file-loader",
        json!({ "name": "img/[name].[hash].[ext]" }),
    )];

    if mode == BuildMode::Production && target == BuildTarget::Modern {
        uses.push(LoaderUse::with_options(
            "img-loader",
            json!({
                "plugins": [
                    { "plugin": "imagemin-gifsicle", "options": { "interlaced": true } },
                    {
                        "plugin": "imagemin-mozjpeg",
                        "options": { "progressive": true, "arithmetic": false }
                    },
                    { "plugin": "imagemin-optipng", "options": { "optimizationLevel": 5 } },
                    {
                        "plugin": "imagemin-svgo",
                        "options": { "plugins": [{ "convertPathData": false }] }
                    },
                ]
            }),
        ));
    }

    Rule::new(Pattern::case_insensitive(IMAGE_TEST), uses)
}

/// Final configurations for one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedConfig {
    pub mode: BuildMode,
    pub legacy: ConfigFragment,
    pub modern: ConfigFragment,
}

impl ComposedConfig {
    pub fn get(&self, target: BuildTarget) -> &ConfigFragment {
        match target {
            BuildTarget::Legacy => &self.legacy,
            BuildTarget::Modern => &self.modern,
        }
    }

    /// JSON array handed to the bundler: both targets, or only `target`.
    pub fn to_value(&self, target: Option<BuildTarget>) -> Result<Value, ComposeError> {
        let selected = BuildTarget::ALL
            .into_iter()
            .filter(|t| target.map_or(true, |only| only == *t))
            .map(|t| serde_json::to_value(self.get(t)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(selected))
    }
}

/// Compose both target configurations for `mode`.
pub fn compose(project: &Project, mode: BuildMode) -> Result<ComposedConfig, ComposeError> {
    let common = CommonBuilder::new(project).assemble()?;
    let strategy = MergeStrategy::bundler();

    let environment = |target: BuildTarget| match mode {
        BuildMode::Development => dev::fragment(project, target),
        BuildMode::Production => prod::fragment(project, target),
    };

    let legacy = merge_fragments(
        common.get(BuildTarget::Legacy),
        &environment(BuildTarget::Legacy),
        &strategy,
    )?;
    let modern = merge_fragments(
        common.get(BuildTarget::Modern),
        &environment(BuildTarget::Modern),
        &strategy,
    )?;

    info!(
        %mode,
        legacy_rules = legacy.rules().len(),
        modern_rules = modern.rules().len(),
        "composed bundler configurations"
    );
    Ok(ComposedConfig {
        mode,
        legacy,
        modern,
    })
}

/// What a configuration does with stylesheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePipeline {
    /// No stylesheet rule at all
    Absent,
    /// Stylesheets are matched and discarded
    Ignored,
    /// Stylesheets are injected into the page at runtime
    Injected,
    /// Stylesheets are extracted to CSS files
    Extracted,
}

impl StylePipeline {
    pub fn is_active(self) -> bool {
        matches!(self, StylePipeline::Injected | StylePipeline::Extracted)
    }
}

/// Classify the first stylesheet rule of `fragment`.
pub fn style_pipeline(fragment: &ConfigFragment) -> StylePipeline {
    let Some(rule) = fragment.rule_matching(STYLE_TEST) else {
        return StylePipeline::Absent;
    };
    let loaders = rule.loaders();
    if loaders.contains(&prod::CSS_EXTRACT_LOADER) {
        StylePipeline::Extracted
    } else if loaders.contains(&STYLE_INJECT_LOADER) {
        StylePipeline::Injected
    } else {
        StylePipeline::Ignored
    }
}
