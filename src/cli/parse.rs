//! CLI parse: clap types for dualpack. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::target::{BuildMode, BuildTarget};

/// Dualpack CLI - legacy/modern bundler configuration composer
#[derive(Parser)]
#[command(name = "dualpack")]
#[command(about = "Compose legacy and modern bundler configurations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    pub project: PathBuf,

    /// Settings file (replaces <project>/dualpack.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose bundler configurations for a mode
    Build {
        /// Bundler mode
        #[arg(long, value_enum)]
        mode: BuildMode,
        /// Emit only one target
        #[arg(long, value_enum)]
        target: Option<BuildTarget>,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Show resolved settings
    Settings {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: SettingsFormat,
    },
    /// Normalize the asset names of a manifest file
    Manifest {
        /// Manifest JSON file
        file: PathBuf,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingsFormat {
    Json,
    Toml,
}
