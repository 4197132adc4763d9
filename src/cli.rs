//! CLI domain: parse, route and output only.
//! No composition logic; the route table dispatches to library services.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, SettingsFormat};
pub use route::{run_standalone, RunContext};
