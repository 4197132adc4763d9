//! Integration tests for composing both targets from a project on disk

use dualpack::compose::{
    compose, prod, style_pipeline, StylePipeline, FONT_TEST, IMAGE_TEST, STYLE_TEST,
    TRANSPILE_TEST,
};
use dualpack::settings::env;
use dualpack::target::{BuildMode, BuildTarget};
use serde_json::json;
use std::path::Path;

use crate::integration::test_utils::{open_project, project_dir};

const SETTINGS: &str = r#"
name = "Marketing_Site"

[paths.src]
js = "./assets/js/"

[entries]
app = "app.js"
checkout = "checkout/index.js"
"#;

#[test]
fn test_development_styles_only_in_modern() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[]);
    let composed = compose(&project, BuildMode::Development).unwrap();

    assert_eq!(style_pipeline(&composed.legacy), StylePipeline::Ignored);
    assert_eq!(style_pipeline(&composed.modern), StylePipeline::Injected);
}

#[test]
fn test_production_styles_only_in_legacy() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[]);
    let composed = compose(&project, BuildMode::Production).unwrap();

    assert_eq!(style_pipeline(&composed.legacy), StylePipeline::Extracted);
    assert_eq!(style_pipeline(&composed.modern), StylePipeline::Ignored);
    assert!(composed.legacy.has_plugin(prod::CSS_EXTRACT_PLUGIN));
    assert!(!composed.modern.has_plugin(prod::CSS_EXTRACT_PLUGIN));
}

#[test]
fn test_exactly_one_active_style_pipeline_per_mode() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[]);

    for mode in [BuildMode::Development, BuildMode::Production] {
        let composed = compose(&project, mode).unwrap();
        let active = BuildTarget::ALL
            .into_iter()
            .filter(|t| style_pipeline(composed.get(*t)).is_active())
            .count();
        assert_eq!(active, 1, "{} should emit styles from one build", mode);
    }
}

#[test]
fn test_environment_rules_and_plugins_come_first() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[]);

    for mode in [BuildMode::Development, BuildMode::Production] {
        let composed = compose(&project, mode).unwrap();
        for target in BuildTarget::ALL {
            let fragment = composed.get(target);
            let tests: Vec<&str> = fragment
                .rules()
                .iter()
                .map(|r| r.test.regex.as_str())
                .collect();
            assert_eq!(
                tests,
                vec![STYLE_TEST, IMAGE_TEST, TRANSPILE_TEST, FONT_TEST],
                "{} {}",
                mode,
                target
            );

            let names = fragment.plugin_names();
            let manifest = names
                .iter()
                .position(|n| *n == "webpack-manifest-plugin")
                .unwrap();
            assert_eq!(manifest, names.len() - 2, "common plugins trail: {:?}", names);
            assert_eq!(names.last(), Some(&"webpack-notifier"));
        }
    }
}

#[test]
fn test_entries_follow_settings() {
    let temp_dir = project_dir(Some(SETTINGS));
    let project = open_project(temp_dir.path(), &[]);
    let composed = compose(&project, BuildMode::Production).unwrap();

    for target in BuildTarget::ALL {
        let fragment = composed.get(target);
        assert_eq!(fragment.name.as_deref(), Some("Marketing_Site"));
        let entry = fragment.entry.as_ref().unwrap();
        assert_eq!(entry.len(), 2);
        assert!(entry.values().all(|p| Path::new(p).is_absolute()));
        assert_eq!(
            Path::new(&entry["checkout"]),
            project.root.join("assets/js/checkout/index.js")
        );
    }
}

#[test]
fn test_browser_lists_from_package_json() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[]);
    let composed = compose(&project, BuildMode::Development).unwrap();

    let browsers = |target: BuildTarget| {
        let rule = composed.get(target).rule_matching(TRANSPILE_TEST).unwrap();
        rule.uses[0].options["presets"][0][1]["targets"]["browsers"].clone()
    };
    assert_eq!(browsers(BuildTarget::Legacy), json!(["> 1%", "IE 11"]));
    assert_eq!(
        browsers(BuildTarget::Modern),
        json!(["last 2 Chrome versions", "last 2 Firefox versions"])
    );
}

#[test]
fn test_public_path_from_environment() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[(env::PUBLIC_PATH, "/static/")]);
    let composed = compose(&project, BuildMode::Production).unwrap();

    for target in BuildTarget::ALL {
        let output = composed.get(target).output.as_ref().unwrap();
        assert_eq!(output.public_path.as_deref(), Some("/static/"));
        assert_eq!(
            output.path.as_deref().map(Path::new),
            Some(project.root.join("dist").as_path())
        );
    }
}

#[test]
fn test_development_public_path_points_at_dev_server() {
    let temp_dir = project_dir(None);
    let project = open_project(
        temp_dir.path(),
        &[
            (env::PUBLIC_PATH, "/static/"),
            (env::DEVSERVER_PUBLIC, "http://site.test:3000"),
            (env::DEVSERVER_PORT, "3000"),
        ],
    );
    let composed = compose(&project, BuildMode::Development).unwrap();

    for target in BuildTarget::ALL {
        let fragment = composed.get(target);
        let output = fragment.output.as_ref().unwrap();
        assert_eq!(output.public_path.as_deref(), Some("http://site.test:3000/"));
        let server = fragment.dev_server.as_ref().unwrap();
        assert_eq!(server.port, json!(3000));
        assert!(server.hot);
    }
    assert_eq!(composed.legacy.dev_server, composed.modern.dev_server);
}

#[test]
fn test_output_filenames_and_manifests_per_target() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[]);
    let composed = compose(&project, BuildMode::Production).unwrap();
    let value = composed.to_value(None).unwrap();

    assert_eq!(value[0]["output"]["filename"], "js/[name]-legacy.[chunkhash].js");
    assert_eq!(value[1]["output"]["filename"], "js/[name].[chunkhash].js");

    let manifest_file = |config: &serde_json::Value| {
        config["plugins"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == "webpack-manifest-plugin")
            .map(|p| p["options"]["fileName"].clone())
            .unwrap()
    };
    assert_eq!(manifest_file(&value[0]), "manifest-legacy.json");
    assert_eq!(manifest_file(&value[1]), "manifest.json");
}

#[test]
fn test_serialized_shape() {
    let temp_dir = project_dir(None);
    let project = open_project(temp_dir.path(), &[]);
    let composed = compose(&project, BuildMode::Development).unwrap();
    let value = composed.to_value(Some(BuildTarget::Modern)).unwrap();
    let config = &value[0];

    assert_eq!(config["mode"], "development");
    assert_eq!(config["devtool"], "inline-source-map");
    assert_eq!(config["module"]["rules"][0]["test"], json!({ "regex": STYLE_TEST }));
    assert_eq!(config["module"]["rules"][0]["use"][0]["loader"], "style-loader");
    assert_eq!(config["module"]["rules"][1]["test"]["flags"], "i");
    assert_eq!(config["devServer"]["watchOptions"]["poll"], false);
    assert_eq!(config["devServer"]["disableHostCheck"], true);
}
