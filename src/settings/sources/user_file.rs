//! User-level settings file: `<platform config dir>/dualpack/settings.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the user-level settings file, when a home directory is known.
pub fn user_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dualpack").map(|dirs| dirs.config_dir().join("settings.toml"))
}

/// Add the user-level settings file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> ConfigBuilder<DefaultState> {
    match path {
        Some(path) if path.is_file() => {
            debug!(path = %path.display(), "adding user settings file");
            builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
        }
        _ => builder,
    }
}
