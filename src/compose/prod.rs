//! Production fragments: minification, extracted styles for legacy only, analysis.

use serde_json::json;

use super::paths::resolve_path_string;
use super::{image_rule, script_filename, Project, IGNORE_LOADER, STYLE_TEST};
use crate::fragment::{
    ConfigFragment, LoaderUse, ModuleConfig, Optimization, Output, Pattern, PluginSpec, Rule,
};
use crate::settings::Settings;
use crate::target::{BuildMode, BuildTarget};

pub const CSS_EXTRACT_PLUGIN: &str = "mini-css-extract-plugin";
pub const CSS_EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";
pub const BUNDLE_ANALYZER: &str = "webpack-bundle-analyzer";
pub const CLEAN_PLUGIN: &str = "clean-webpack-plugin";
pub const WEBP_PLUGIN: &str = "imagemin-webp-webpack-plugin";
pub const TERSER_PLUGIN: &str = "terser-webpack-plugin";
pub const CSS_MINIMIZER: &str = "optimize-css-assets-webpack-plugin";

/// Styles are extracted by the legacy build only; modern ignores them.
pub fn style_rule(target: BuildTarget) -> Rule {
    match target {
        BuildTarget::Legacy => Rule::new(
            Pattern::new(STYLE_TEST),
            vec![
                LoaderUse::new(CSS_EXTRACT_LOADER),
                LoaderUse::with_options(
                    "css-loader",
                    json!({ "importLoaders": 2, "sourceMap": true }),
                ),
                LoaderUse::new("resolve-url-loader"),
                LoaderUse::with_options("sass-loader", json!({ "sourceMap": true })),
            ],
        ),
        BuildTarget::Modern => {
            Rule::new(Pattern::new(STYLE_TEST), vec![LoaderUse::new(IGNORE_LOADER)])
        }
    }
}

pub fn terser_options() -> serde_json::Value {
    json!({ "cache": true, "parallel": true, "sourceMap": true })
}

/// Code splitting and minimizers. The same for both targets.
pub fn optimization(settings: &Settings) -> Optimization {
    Optimization {
        split_chunks: json!({
            "cacheGroups": {
                "default": false,
                "common": false,
                "styles": {
                    "name": settings.vars.css_name,
                    "test": Pattern::new(STYLE_TEST),
                    "chunks": "all",
                    "enforce": true,
                }
            }
        }),
        minimizer: vec![
            PluginSpec::with_options(TERSER_PLUGIN, terser_options()),
            PluginSpec::with_options(
                CSS_MINIMIZER,
                json!({
                    "cssProcessorOptions": {
                        "map": { "inline": false, "annotation": true },
                        "safe": true,
                        "discardComments": true,
                    }
                }),
            ),
        ],
    }
}

pub fn bundle_analyzer(target: BuildTarget) -> PluginSpec {
    PluginSpec::with_options(
        BUNDLE_ANALYZER,
        json!({ "analyzerMode": "static", "reportFilename": target.report_file_name() }),
    )
}

pub fn clean_plugin(settings: &Settings) -> PluginSpec {
    PluginSpec::with_options(
        CLEAN_PLUGIN,
        json!({
            "cleanOnceBeforeBuildPatterns": settings.paths.dist.clean,
            "verbose": true,
            "dry": false,
        }),
    )
}

pub fn plugins(project: &Project, target: BuildTarget) -> Vec<PluginSpec> {
    let settings = &project.settings;
    match target {
        BuildTarget::Legacy => vec![
            PluginSpec::with_options(
                CSS_EXTRACT_PLUGIN,
                json!({
                    "path": resolve_path_string(&project.root, &[settings.paths.dist.base.as_str()]),
                    "filename": "css/[name].[chunkhash].css",
                }),
            ),
            bundle_analyzer(target),
        ],
        BuildTarget::Modern => vec![
            clean_plugin(settings),
            PluginSpec::new(WEBP_PLUGIN),
            bundle_analyzer(target),
        ],
    }
}

/// Production fragment for `target`, merged over the common fragment.
pub fn fragment(project: &Project, target: BuildTarget) -> ConfigFragment {
    let mode = BuildMode::Production;
    ConfigFragment {
        mode: Some(mode),
        devtool: Some(mode.devtool().to_string()),
        output: Some(Output {
            filename: Some(script_filename(mode, target)),
            ..Default::default()
        }),
        optimization: Some(optimization(&project.settings)),
        module: Some(ModuleConfig {
            rules: vec![style_rule(target), image_rule(mode, target)],
        }),
        plugins: plugins(project, target),
        ..Default::default()
    }
}
