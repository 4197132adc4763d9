//! Integration tests for the dualpack binary.
//!
//! Each test runs the binary with a cleared environment so results depend only
//! on the temporary project and the variables passed explicitly.

use std::fs;

use crate::integration::test_utils::{project_dir, run_cli, stdout_json};

#[test]
fn test_build_emits_legacy_then_modern() {
    let temp_dir = project_dir(None);
    let project = temp_dir.path().to_string_lossy();
    let output = run_cli(
        temp_dir.path(),
        &[],
        &["--project", project.as_ref(), "build", "--mode", "development"],
    );

    let value = stdout_json(&output);
    let configs = value.as_array().unwrap();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0]["output"]["filename"], "js/[name]-legacy.[hash].js");
    assert_eq!(configs[1]["output"]["filename"], "js/[name].[hash].js");
    assert!(configs.iter().all(|c| c["mode"] == "development"));
}

#[test]
fn test_build_single_target() {
    let temp_dir = project_dir(None);
    let project = temp_dir.path().to_string_lossy();
    let output = run_cli(
        temp_dir.path(),
        &[],
        &[
            "--project",
            project.as_ref(),
            "build",
            "--mode",
            "production",
            "--target",
            "legacy",
            "--compact",
        ],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim().lines().count(), 1, "compact output is one line");
    let value = stdout_json(&output);
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["output"]["filename"], "js/[name]-legacy.[chunkhash].js");
}

#[test]
fn test_build_reads_public_path_from_environment() {
    let temp_dir = project_dir(None);
    let project = temp_dir.path().to_string_lossy();
    let output = run_cli(
        temp_dir.path(),
        &[("PUBLIC_PATH", "/static/")],
        &["--project", project.as_ref(), "build", "--mode", "production"],
    );

    let value = stdout_json(&output);
    assert_eq!(value[0]["output"]["publicPath"], "/static/");
    assert_eq!(value[1]["output"]["publicPath"], "/static/");
}

#[test]
fn test_build_reads_dotenv_file() {
    let temp_dir = project_dir(None);
    fs::write(temp_dir.path().join(".env"), "DEVSERVER_PORT=4000\n").unwrap();
    let project = temp_dir.path().to_string_lossy();

    let from_dotenv = run_cli(
        temp_dir.path(),
        &[],
        &["--project", project.as_ref(), "build", "--mode", "development"],
    );
    assert_eq!(stdout_json(&from_dotenv)[0]["devServer"]["port"], 4000);

    let process_wins = run_cli(
        temp_dir.path(),
        &[("DEVSERVER_PORT", "5000")],
        &["--project", project.as_ref(), "build", "--mode", "development"],
    );
    assert_eq!(stdout_json(&process_wins)[0]["devServer"]["port"], 5000);
}

#[test]
fn test_build_writes_output_file() {
    let temp_dir = project_dir(None);
    let project = temp_dir.path().to_string_lossy();
    let out = temp_dir.path().join("build").join("webpack.json");
    let out_arg = out.to_string_lossy();
    let output = run_cli(
        temp_dir.path(),
        &[],
        &[
            "--project",
            project.as_ref(),
            "build",
            "--mode",
            "production",
            "--out",
            out_arg.as_ref(),
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote 2 production configuration(s)"), "{}", stdout);
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 2);
}

#[test]
fn test_settings_command_formats() {
    let temp_dir = project_dir(Some("name = \"Docs\"\n"));
    let project = temp_dir.path().to_string_lossy();

    let json = run_cli(temp_dir.path(), &[], &["--project", project.as_ref(), "settings"]);
    let value = stdout_json(&json);
    assert_eq!(value["name"], "Docs");
    assert_eq!(value["dev_server"]["port"], "8080");

    let toml_output = run_cli(
        temp_dir.path(),
        &[],
        &["--project", project.as_ref(), "settings", "--format", "toml"],
    );
    assert!(toml_output.status.success());
    let parsed: toml::Value =
        toml::from_str(&String::from_utf8_lossy(&toml_output.stdout)).unwrap();
    assert_eq!(parsed["name"].as_str(), Some("Docs"));
}

#[test]
fn test_manifest_command_strips_hashes() {
    let temp_dir = project_dir(None);
    let manifest = temp_dir.path().join("manifest.json");
    fs::write(
        &manifest,
        r#"{
  "app.0123456789abcdef0123456789abcdef.js": "/dist/js/app.0123456789abcdef0123456789abcdef.js",
  "vendor.js": "/dist/js/vendor.js"
}"#,
    )
    .unwrap();
    let manifest_arg = manifest.to_string_lossy();

    let output = run_cli(temp_dir.path(), &[], &["manifest", manifest_arg.as_ref()]);
    let value = stdout_json(&output);
    assert_eq!(
        value["app.js"],
        "/dist/js/app.0123456789abcdef0123456789abcdef.js"
    );
    assert_eq!(value["vendor.js"], "/dist/js/vendor.js");
    assert_eq!(value.as_object().unwrap().len(), 2);
}

#[test]
fn test_manifest_command_ignores_broken_project() {
    let temp_dir = project_dir(None);
    fs::write(temp_dir.path().join("package.json"), "{ not json").unwrap();
    let manifest = temp_dir.path().join("manifest-legacy.json");
    fs::write(
        &manifest,
        r#"{ "app.0123456789abcdef0123456789abcdef.css": "/dist/css/app.css" }"#,
    )
    .unwrap();
    let project = temp_dir.path().to_string_lossy();
    let manifest_arg = manifest.to_string_lossy();

    let output = run_cli(
        temp_dir.path(),
        &[],
        &[
            "--project",
            project.as_ref(),
            "--settings",
            "does-not-exist.toml",
            "manifest",
            manifest_arg.as_ref(),
        ],
    );
    let value = stdout_json(&output);
    assert_eq!(value["app.css"], "/dist/css/app.css");
}

#[test]
fn test_missing_settings_file_exits_with_error() {
    let temp_dir = project_dir(None);
    let project = temp_dir.path().to_string_lossy();
    let output = run_cli(
        temp_dir.path(),
        &[],
        &[
            "--project",
            project.as_ref(),
            "--settings",
            "does-not-exist.toml",
            "build",
            "--mode",
            "production",
        ],
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dualpack:"), "stderr: {}", stderr);
}

#[test]
fn test_logs_stay_off_stdout() {
    let temp_dir = project_dir(None);
    let project = temp_dir.path().to_string_lossy();
    let output = run_cli(
        temp_dir.path(),
        &[],
        &[
            "--project",
            project.as_ref(),
            "--verbose",
            "build",
            "--mode",
            "development",
        ],
    );

    stdout_json(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.trim().is_empty(), "verbose mode should log to stderr");
}
