//! Settings
//!
//! Project settings resolved once at startup from layered sources and passed by
//! reference to every builder. Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. User settings file (`<config dir>/dualpack/settings.toml`)
//! 3. Project settings file (`dualpack.toml`) or an explicit `--settings` file
//! 4. Environment overrides (`PUBLIC_PATH`, `DEVSERVER_*`)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ComposeError;
use crate::logging::LoggingConfig;

mod browsers;
mod defaults;
pub mod env;
mod sources;

pub use browsers::BrowserLists;
pub use env::EnvSnapshot;
pub use sources::project_file::{project_settings_path, PROJECT_SETTINGS_FILE};
pub use sources::user_file::user_settings_path;

/// Root settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Configuration name handed to the bundler
    pub name: String,

    pub paths: PathSettings,

    pub urls: UrlSettings,

    pub vars: VarSettings,

    /// Entry name to file name, relative to `paths.src.js`
    #[serde(default = "default_entries")]
    pub entries: BTreeMap<String, String>,

    #[serde(default)]
    pub transpile: TranspileSettings,

    pub dev_server: DevServerSettings,

    pub manifest: ManifestSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    pub src: SourcePaths,
    pub dist: DistPaths,
    pub templates: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub base: String,
    pub css: String,
    pub js: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistPaths {
    pub base: String,
    /// Glob patterns removed from the output directory before a production build
    #[serde(default = "default_clean_patterns")]
    pub clean: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlSettings {
    pub live: String,
    pub local: String,
    pub critical: String,
    pub public_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarSettings {
    /// Name of the extracted stylesheet chunk
    pub css_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranspileSettings {
    /// Regular expressions of paths the transpiler skips
    #[serde(default = "default_transpile_exclude")]
    pub exclude: Vec<String>,
}

impl Default for TranspileSettings {
    fn default() -> Self {
        Self {
            exclude: default_transpile_exclude(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevServerSettings {
    pub public: String,
    pub host: String,
    /// Kept as text; see [`DevServerSettings::port_value`]
    pub port: String,
    pub poll: bool,
    pub https: bool,
}

impl DevServerSettings {
    /// Port as emitted to the bundler: a number when it parses, the raw text otherwise.
    pub fn port_value(&self) -> Value {
        match self.port.trim().parse::<u16>() {
            Ok(port) => Value::from(port),
            Err(_) => {
                warn!(port = %self.port, "dev server port is not numeric, passing it through");
                Value::String(self.port.clone())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSettings {
    /// Prefix prepended to every manifest key
    pub base_path: String,
}

fn default_entries() -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), "app.js".to_string())])
}

fn default_clean_patterns() -> Vec<String> {
    vec!["**/*".to_string()]
}

fn default_transpile_exclude() -> Vec<String> {
    vec!["(node_modules|bower_components)".to_string()]
}

/// Resolves [`Settings`] from defaults, files and an environment snapshot.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    env: EnvSnapshot,
    user_file: Option<PathBuf>,
    project_file: Option<(PathBuf, bool)>,
}

impl SettingsLoader {
    pub fn new(env: EnvSnapshot) -> Self {
        Self {
            env,
            user_file: None,
            project_file: None,
        }
    }

    /// Use `path` as the user-level settings file when it exists.
    pub fn with_user_file(mut self, path: Option<PathBuf>) -> Self {
        self.user_file = path;
        self
    }

    /// Use `path` as the project settings file when it exists.
    pub fn with_project_file(mut self, path: PathBuf) -> Self {
        self.project_file = Some((path, false));
        self
    }

    /// Use `path` as the project settings file; loading fails if it is missing.
    pub fn with_required_file(mut self, path: PathBuf) -> Self {
        self.project_file = Some((path, true));
        self
    }

    pub fn env(&self) -> &EnvSnapshot {
        &self.env
    }

    /// Build the settings. Values are not validated beyond their types.
    pub fn load(&self) -> Result<Settings, ComposeError> {
        let mut builder = defaults::builder_with_defaults()?;
        builder = sources::user_file::add_to_builder(builder, self.user_file.as_deref());
        if let Some((path, required)) = &self.project_file {
            builder = sources::project_file::add_to_builder(builder, path, *required);
        }

        builder = builder
            .set_override_option("urls.public_path", self.env.get(env::PUBLIC_PATH))?
            .set_override_option("dev_server.public", self.env.get(env::DEVSERVER_PUBLIC))?
            .set_override_option("dev_server.host", self.env.get(env::DEVSERVER_HOST))?
            .set_override_option("dev_server.port", self.env.get(env::DEVSERVER_PORT))?
            .set_override_option("dev_server.poll", self.env.flag(env::DEVSERVER_POLL))?
            .set_override_option("dev_server.https", self.env.flag(env::DEVSERVER_HTTPS))?;

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        let tables = sources::keyed_tables::read_keyed_tables(&self.existing_files())?;
        if let Some(entries) = tables.entries {
            settings.entries = entries;
        }
        if let Some(modules) = tables.modules {
            settings.logging.modules = modules;
        }

        debug!(
            name = %settings.name,
            public_path = %settings.urls.public_path,
            entries = settings.entries.len(),
            "settings resolved"
        );
        Ok(settings)
    }

    /// Settings files that exist on disk, lowest layer first.
    fn existing_files(&self) -> Vec<&Path> {
        let project = self.project_file.as_ref().map(|(path, _)| path.as_path());
        self.user_file
            .as_deref()
            .into_iter()
            .chain(project)
            .filter(|path| path.is_file())
            .collect()
    }
}

impl Settings {
    /// Settings from the built-in defaults layer alone.
    pub fn defaults() -> Result<Self, ComposeError> {
        SettingsLoader::new(EnvSnapshot::empty()).load()
    }
}
