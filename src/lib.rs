//! Dualpack: legacy/modern bundler configuration composer
//!
//! Resolves project settings, builds a common configuration per browser
//! target and merges an environment fragment over it, producing the two
//! configurations a bundler runs for a dual (legacy + modern) build.

pub mod cli;
pub mod compose;
pub mod error;
pub mod fragment;
pub mod logging;
pub mod manifest;
pub mod merge;
pub mod settings;
pub mod target;
