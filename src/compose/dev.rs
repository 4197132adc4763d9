//! Development fragments: dev server, hot reload, injected styles for modern only.

use serde_json::json;
use std::collections::BTreeMap;

use super::paths::resolve_path_string;
use super::{image_rule, script_filename, Project, IGNORE_LOADER, STYLE_TEST};
use crate::fragment::{
    ConfigFragment, DevServer, LoaderUse, ModuleConfig, Output, Pattern, PluginSpec, Rule,
    WatchOptions,
};
use crate::target::{BuildMode, BuildTarget};

pub const HOT_MODULE_REPLACEMENT: &str = "webpack/HotModuleReplacementPlugin";
pub const DASHBOARD: &str = "webpack-dashboard/plugin";

/// Development server block. Identical for both targets.
pub fn dev_server(project: &Project) -> DevServer {
    let settings = &project.settings;
    DevServer {
        public: settings.dev_server.public.clone(),
        content_base: resolve_path_string(&project.root, &[settings.paths.templates.as_str()]),
        host: settings.dev_server.host.clone(),
        port: settings.dev_server.port_value(),
        https: settings.dev_server.https,
        disable_host_check: true,
        hot: true,
        overlay: true,
        watch_content_base: true,
        compress: true,
        watch_options: WatchOptions {
            poll: settings.dev_server.poll,
            ignored: Pattern::new("node_modules"),
        },
        headers: BTreeMap::from([(
            "Access-Control-Allow-Origin".to_string(),
            "*".to_string(),
        )]),
    }
}

/// Styles are emitted by the modern build only; legacy ignores them.
pub fn style_rule(target: BuildTarget) -> Rule {
    match target {
        BuildTarget::Legacy => {
            Rule::new(Pattern::new(STYLE_TEST), vec![LoaderUse::new(IGNORE_LOADER)])
        }
        BuildTarget::Modern => Rule::new(
            Pattern::new(STYLE_TEST),
            vec![
                LoaderUse::new("style-loader"),
                LoaderUse::with_options(
                    "css-loader",
                    json!({ "importLoaders": 2, "sourceMap": true }),
                ),
                LoaderUse::new("resolve-url-loader"),
                LoaderUse::with_options("sass-loader", json!({ "sourceMap": true })),
            ],
        ),
    }
}

pub fn plugins(target: BuildTarget) -> Vec<PluginSpec> {
    match target {
        BuildTarget::Legacy => vec![PluginSpec::new(HOT_MODULE_REPLACEMENT)],
        BuildTarget::Modern => vec![
            PluginSpec::new(HOT_MODULE_REPLACEMENT),
            PluginSpec::new(DASHBOARD),
        ],
    }
}

/// Development fragment for `target`, merged over the common fragment.
pub fn fragment(project: &Project, target: BuildTarget) -> ConfigFragment {
    let mode = BuildMode::Development;
    ConfigFragment {
        mode: Some(mode),
        devtool: Some(mode.devtool().to_string()),
        output: Some(Output {
            path: None,
            public_path: Some(format!("{}/", project.settings.dev_server.public)),
            filename: Some(script_filename(mode, target)),
        }),
        dev_server: Some(dev_server(project)),
        module: Some(ModuleConfig {
            rules: vec![style_rule(target), image_rule(mode, target)],
        }),
        plugins: plugins(target),
        ..Default::default()
    }
}
