//! CLI argument parsing with clap
//!
//! Defines the command-line interface: global configuration flags plus the
//! `serve` and `migrate` subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Environment;

#[derive(Parser, Debug)]
#[command(name = "postboard")]
#[command(about = "Users and posts API server with JWT authentication")]
#[command(long_about = "
Postboard serves a JSON API for users and posts, backed either by an
in-memory store or by PostgreSQL.

EXAMPLES:
    # Start the server with the layered configuration in ./config
    postboard serve

    # Start server on custom host and port
    postboard serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    postboard --config /path/to/config.toml serve

    # Check configuration without starting the server
    postboard serve --dry-run

    # Apply pending PostgreSQL migrations
    postboard migrate

    # List pending migrations / roll back the last 2
    postboard migrate --dry-run
    postboard migrate --rollback 2
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load this file instead of the layered configuration directory
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Application environment; selects config/{env}.toml
    #[arg(short, long, value_parser = super::validation::validate_environment)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve {
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage PostgreSQL schema migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert the given number of applied migrations
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
