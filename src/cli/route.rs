//! CLI route: single route table and run context.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::parse::{Commands, SettingsFormat};
use crate::compose::{compose, Project};
use crate::error::ComposeError;
use crate::manifest::normalize_manifest_file;
use crate::settings::{project_settings_path, user_settings_path, EnvSnapshot, SettingsLoader};

/// Runtime context for CLI execution: the opened project.
pub struct RunContext {
    project: Project,
}

impl RunContext {
    /// Build the settings loader used for `project_root`.
    ///
    /// An explicit `settings_path` must exist; otherwise `<project>/dualpack.toml`
    /// is used when present. `user_file` is layered below either.
    pub fn settings_loader(
        project_root: &Path,
        settings_path: Option<PathBuf>,
        user_file: Option<PathBuf>,
        env: EnvSnapshot,
    ) -> SettingsLoader {
        let loader = SettingsLoader::new(env).with_user_file(user_file);
        match settings_path {
            Some(path) => loader.with_required_file(path),
            None => loader.with_project_file(project_settings_path(project_root)),
        }
    }

    /// Open the project at `project_root`, capturing the environment and its `.env` file.
    pub fn new(
        project_root: PathBuf,
        settings_path: Option<PathBuf>,
    ) -> Result<Self, ComposeError> {
        let env = EnvSnapshot::capture(Some(&project_root.join(".env")))?;
        Self::with_env(project_root, settings_path, env)
    }

    pub fn with_env(
        project_root: PathBuf,
        settings_path: Option<PathBuf>,
        env: EnvSnapshot,
    ) -> Result<Self, ComposeError> {
        let loader =
            Self::settings_loader(&project_root, settings_path, user_settings_path(), env);
        let project = Project::open(&project_root, &loader)?;
        debug!(root = %project.root.display(), "project opened");
        Ok(Self { project })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Execute a command, returning the text to print on stdout.
    pub fn execute(&self, command: &Commands) -> Result<String, ComposeError> {
        match command {
            Commands::Build {
                mode,
                target,
                out,
                compact,
            } => {
                let composed = compose(&self.project, *mode)?;
                let value = composed.to_value(*target)?;
                let rendered = render_json(&value, *compact)?;
                match out {
                    Some(path) => {
                        write_output(path, &rendered)?;
                        let count = value.as_array().map(Vec::len).unwrap_or(0);
                        info!(path = %path.display(), count, "configurations written");
                        Ok(format!(
                            "Wrote {} {} configuration(s) to {}",
                            count,
                            mode,
                            path.display()
                        ))
                    }
                    None => Ok(rendered),
                }
            }
            Commands::Settings { format } => match format {
                SettingsFormat::Json => {
                    render_json(&serde_json::to_value(&self.project.settings)?, false)
                }
                SettingsFormat::Toml => {
                    toml::to_string_pretty(&self.project.settings).map_err(|e| {
                        ComposeError::ConfigError(format!("Failed to render settings: {}", e))
                    })
                }
            },
            Commands::Manifest { file, out } => run_manifest(file, out.as_deref()),
        }
    }
}

/// Run a command that needs no project, or `None` when it does.
///
/// Manifest rewriting reads only the given file, so it runs without loading
/// settings or `package.json`.
pub fn run_standalone(command: &Commands) -> Option<Result<String, ComposeError>> {
    match command {
        Commands::Manifest { file, out } => Some(run_manifest(file, out.as_deref())),
        Commands::Build { .. } | Commands::Settings { .. } => None,
    }
}

fn run_manifest(file: &Path, out: Option<&Path>) -> Result<String, ComposeError> {
    let normalized = normalize_manifest_file(file)?;
    let rendered = render_json(&Value::Object(normalized), false)?;
    match out {
        Some(path) => {
            write_output(path, &rendered)?;
            Ok(format!("Wrote normalized manifest to {}", path.display()))
        }
        None => Ok(rendered),
    }
}

fn render_json(value: &Value, compact: bool) -> Result<String, ComposeError> {
    Ok(if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), ComposeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{}\n", contents))?;
    Ok(())
}
