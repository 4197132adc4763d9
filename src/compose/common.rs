//! Common configuration shared by every mode: entries, output location,
//! transpilation per browser target and asset manifests.

use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

use super::paths::resolve_path_string;
use super::Project;
use crate::error::ComposeError;
use crate::fragment::{
    ConfigFragment, LoaderUse, ModuleConfig, Output, Pattern, PluginSpec, Resolve, Rule,
};
use crate::manifest::NameMapping;
use crate::merge::{merge_fragments, MergeStrategy};
use crate::target::BuildTarget;

pub const TRANSPILE_TEST: &str = r"\.js$";
pub const FONT_TEST: &str = r"\.(ttf|eot|woff2?)$";

/// The two common fragments, one per build target.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonConfigs {
    pub legacy: ConfigFragment,
    pub modern: ConfigFragment,
}

impl CommonConfigs {
    pub fn get(&self, target: BuildTarget) -> &ConfigFragment {
        match target {
            BuildTarget::Legacy => &self.legacy,
            BuildTarget::Modern => &self.modern,
        }
    }
}

/// Builds the common fragments for a project.
pub struct CommonBuilder<'a> {
    project: &'a Project,
}

impl<'a> CommonBuilder<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// Absolute source path per declared entry.
    pub fn build_entries(&self) -> BTreeMap<String, String> {
        let settings = &self.project.settings;
        settings
            .entries
            .iter()
            .map(|(name, file)| {
                let path = resolve_path_string(
                    &self.project.root,
                    &[settings.paths.src.js.as_str(), file.as_str()],
                );
                (name.clone(), path)
            })
            .collect()
    }

    /// Transpilation rule for `.js` sources targeting `browser_list`.
    pub fn build_transpile_rule(&self, browser_list: &[String]) -> Rule {
        let exclude = self
            .project
            .settings
            .transpile
            .exclude
            .iter()
            .map(|pattern| Pattern::new(pattern.as_str()))
            .collect();

        Rule {
            test: Pattern::new(TRANSPILE_TEST),
            exclude,
            uses: vec![LoaderUse::with_options(
                "babel-loader",
                json!({
                    "cacheDirectory": true,
                    "presets": [
                        [
                            "@babel/preset-env",
                            {
                                "modules": false,
                                "corejs": { "version": 3, "proposals": true },
                                "useBuiltIns": "usage",
                                "targets": { "browsers": browser_list },
                            }
                        ]
                    ],
                    "plugins": [
                        "@babel/plugin-syntax-dynamic-import",
                        "@babel/plugin-transform-runtime",
                    ],
                }),
            )],
        }
    }

    pub fn build_font_rule(&self) -> Rule {
        Rule::new(
            Pattern::case_insensitive(FONT_TEST),
            vec![LoaderUse::with_options(
                "file-loader",
                json!({ "name": "fonts/[name].[contenthash].[ext]" }),
            )],
        )
    }

    /// Manifest plugin writing `file_name` with hash-stripped logical names.
    pub fn build_manifest_plugin(&self, file_name: &str) -> PluginSpec {
        PluginSpec::with_options(
            "webpack-manifest-plugin",
            json!({
                "fileName": file_name,
                "basePath": self.project.settings.manifest.base_path,
                "map": NameMapping::strip_content_hash(),
            }),
        )
    }

    /// Fragment shared by both targets.
    pub fn base_fragment(&self) -> ConfigFragment {
        let settings = &self.project.settings;
        ConfigFragment {
            name: Some(settings.name.clone()),
            entry: Some(self.build_entries()),
            output: Some(Output {
                path: Some(resolve_path_string(
                    &self.project.root,
                    &[settings.paths.dist.base.as_str()],
                )),
                public_path: Some(settings.urls.public_path.clone()),
                filename: None,
            }),
            resolve: Some(Resolve::default()),
            module: Some(ModuleConfig {
                rules: vec![self.build_font_rule()],
            }),
            plugins: vec![PluginSpec::with_options(
                "webpack-notifier",
                json!({ "title": "Webpack", "excludeWarnings": true, "alwaysNotify": true }),
            )],
            ..Default::default()
        }
    }

    /// Fragment specific to one browser target.
    pub fn target_fragment(&self, target: BuildTarget) -> ConfigFragment {
        let browsers = self.project.browsers.for_target(target);
        ConfigFragment {
            module: Some(ModuleConfig {
                rules: vec![self.build_transpile_rule(browsers)],
            }),
            plugins: vec![self.build_manifest_plugin(target.manifest_file_name())],
            ..Default::default()
        }
    }

    /// Merge the base fragment with each target fragment.
    pub fn assemble(&self) -> Result<CommonConfigs, ComposeError> {
        let strategy = MergeStrategy::bundler();
        let base = self.base_fragment();
        let legacy = merge_fragments(&base, &self.target_fragment(BuildTarget::Legacy), &strategy)?;
        let modern = merge_fragments(&base, &self.target_fragment(BuildTarget::Modern), &strategy)?;
        debug!(
            entries = base.entry.as_ref().map(|e| e.len()).unwrap_or(0),
            "assembled common configurations"
        );
        Ok(CommonConfigs { legacy, modern })
    }
}
