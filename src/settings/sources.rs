//! File sources layered over the built-in defaults.

pub mod keyed_tables;
pub mod project_file;
pub mod user_file;
