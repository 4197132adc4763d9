//! Shared test utilities for integration tests
//!
//! Provides project fixtures and an isolated CLI runner so tests never read
//! the developer's own settings or environment.

use dualpack::compose::Project;
use dualpack::settings::{EnvSnapshot, SettingsLoader};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

pub const PACKAGE_JSON: &str = r#"{
  "name": "site",
  "browserslist": {
    "legacyBrowsers": ["> 1%", "IE 11"],
    "modernBrowsers": ["last 2 Chrome versions", "last 2 Firefox versions"]
  }
}"#;

/// Temporary project with a `package.json` and, optionally, a `dualpack.toml`.
pub fn project_dir(settings: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("package.json"), PACKAGE_JSON).unwrap();
    if let Some(contents) = settings {
        fs::write(temp_dir.path().join("dualpack.toml"), contents).unwrap();
    }
    temp_dir
}

/// Open a project with the given environment variables and no user file.
pub fn open_project(root: &Path, env: &[(&str, &str)]) -> Project {
    let loader = SettingsLoader::new(EnvSnapshot::from_pairs(env.iter().copied()))
        .with_project_file(root.join("dualpack.toml"));
    Project::open(root, &loader).unwrap()
}

/// Run the dualpack binary with a cleared environment plus `env`.
///
/// HOME and XDG_CONFIG_HOME point inside `sandbox` so no user settings leak in.
pub fn run_cli(sandbox: &Path, env: &[(&str, &str)], args: &[&str]) -> Output {
    let home = sandbox.join("home");
    let config_home = sandbox.join("config");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&config_home).unwrap();

    let mut command = Command::new(env!("CARGO_BIN_EXE_dualpack"));
    command
        .env_clear()
        .env("HOME", home.as_os_str())
        .env("XDG_CONFIG_HOME", config_home.as_os_str());
    for (key, value) in env {
        command.env(key, value);
    }
    command.args(args).output().unwrap()
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "dualpack should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
