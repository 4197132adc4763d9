//! Built-in settings defaults: the lowest layer under every file and environment source.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in scalar defaults applied.
///
/// List and map defaults (entries, clean patterns, transpile excludes) live on the
/// `Settings` struct so that a file source replaces them wholesale.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("name", "Project_Name")?
        .set_default("paths.src.base", "./src/")?
        .set_default("paths.src.css", "./src/css/")?
        .set_default("paths.src.js", "./src/js/")?
        .set_default("paths.dist.base", "./dist/")?
        .set_default("paths.templates", "./templates/")?
        .set_default("urls.live", "https://example.com/")?
        .set_default("urls.local", "http://example.test/")?
        .set_default("urls.critical", "http://example.test/")?
        .set_default("urls.public_path", "/dist/")?
        .set_default("vars.css_name", "styles")?
        .set_default("dev_server.public", "http://localhost:8080")?
        .set_default("dev_server.host", "localhost")?
        .set_default("dev_server.port", "8080")?
        .set_default("dev_server.poll", false)?
        .set_default("dev_server.https", false)?
        .set_default("manifest.base_path", "")
}
