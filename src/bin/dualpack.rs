//! Dualpack CLI Binary
//!
//! Composes the legacy and modern bundler configurations for a project.

use clap::Parser;
use dualpack::cli::{run_standalone, Cli, RunContext};
use dualpack::logging::{init_logging, LoggingConfig};
use dualpack::settings::{user_settings_path, EnvSnapshot};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli, user_settings_path());

    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("dualpack starting");

    let result = match run_standalone(&cli.command) {
        Some(result) => result,
        None => match RunContext::new(cli.project.clone(), cli.settings.clone()) {
            Ok(context) => context.execute(&cli.command),
            Err(e) => {
                error!("Error opening project: {}", e);
                eprintln!("{}", dualpack::cli::map_error(&e));
                process::exit(1);
            }
        },
    };

    match result {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", dualpack::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and settings files.
/// Precedence: CLI flags override settings files override defaults.
fn build_logging_config(cli: &Cli, user_file: Option<PathBuf>) -> LoggingConfig {
    let loader = RunContext::settings_loader(
        &cli.project,
        cli.settings.clone(),
        user_file,
        EnvSnapshot::empty(),
    );
    let mut config = loader
        .load()
        .map(|settings| settings.logging)
        .unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
