//! CLI output: error mapping from domain errors to the CLI surface.

use crate::error::ComposeError;

/// Map domain errors to a single line for stderr.
pub fn map_error(e: &ComposeError) -> String {
    format!("dualpack: {}", e)
}
