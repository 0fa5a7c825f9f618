//! Warden CLI Binary
//!
//! Command-line interface for editing and querying a stored scene registry.

use clap::Parser;
use std::process;
use tracing::{error, info};
use warden::cli::{Cli, RunContext};
use warden::config::ConfigLoader;
use warden::logging::{init_logging, parse_format, parse_output, LogOutput, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = match build_logging_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", warden::cli::map_error(&e));
            process::exit(2);
        }
    };

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Warden CLI starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error opening workspace: {}", e);
            eprintln!("{}", warden::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", warden::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and the config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> Result<LoggingConfig, warden::ApiError> {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = parse_format(format)?;
    }
    if let Some(ref output) = cli.log_output {
        config.output = parse_output(output)?;
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    if config.output == LogOutput::File && config.file.is_relative() {
        config.file = cli.workspace.join(&config.file);
    }

    Ok(config)
}
