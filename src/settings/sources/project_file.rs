//! Project settings file: `<project>/dualpack.toml`, or an explicit `--settings` file.

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PROJECT_SETTINGS_FILE: &str = "dualpack.toml";

pub fn project_settings_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_SETTINGS_FILE)
}

/// Add the project settings file to the builder.
///
/// A `required` file that does not exist fails at build time; an optional one is
/// skipped.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    if !required && !path.is_file() {
        return builder;
    }
    debug!(path = %path.display(), required, "adding project settings file");
    builder.add_source(File::from(path).format(FileFormat::Toml).required(required))
}
