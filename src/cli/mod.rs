//! Command-line interface: argument parsing, merging CLI flags into the
//! loaded configuration, and dispatching the `serve` and `migrate` commands.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, LogLevel};

use anyhow::Context;

use crate::config::Settings;
use crate::logger::{LoggerGuard, init_logger};

/// Loads the layered configuration and applies CLI overrides.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::from_cli(cli).context("Failed to load configuration")?;
    merger
        .merge_cli_args(cli)
        .context("Invalid configuration")
}

/// Installs the global subscriber. Keep the guard alive for the whole run.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<LoggerGuard> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Invalid logger configuration")?;
    init_logger(logger_config).context("Failed to initialize logger")
}
