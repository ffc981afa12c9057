//! CLI module for evnotify
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Applying CLI overrides on top of loaded configuration
//! - Command execution

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use crate::config::ConfigLoader;
use crate::config::settings::Settings;
use crate::logger::init_logger;

/// Load configuration files and environment, apply CLI overrides, validate.
///
/// # Errors
/// Returns error if loading or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let mut loader = ConfigLoader::new()?;
    if let Some(path) = &cli.config {
        loader = loader.with_config_file(path);
    }
    if let Some(env) = cli.env {
        loader = loader.with_environment(env.into());
    }

    let mut settings = loader.load()?;
    apply_cli_overrides(&mut settings, cli);
    settings.validate()?;

    Ok(settings)
}

/// CLI values win over every configuration source.
pub fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(Commands::Serve { host, port, .. }) = &cli.command {
        if let Some(host) = host {
            settings.server.host = host.clone();
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
    }

    if let Some(level) = cli.log_level_override() {
        settings.logger.level = level.to_string();
    }
}

/// Install the global tracing subscriber from the `[logger]` section.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)?;
    Ok(())
}
