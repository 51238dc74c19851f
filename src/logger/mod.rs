//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - Daily rolling file output through `tracing-appender` (Full, Compact, JSON)

pub mod config;
pub mod error;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background file writer alive; buffered lines are flushed on drop.
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug)]
pub struct LoggerGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the global logger with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<LoggerGuard, LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    // The file layer goes first so console ANSI settings do not leak into span
    // fields written to the file (tokio-rs/tracing#1817).
    if config.file.enabled {
        let (writer, worker_guard) = file_writer(&config.file)?;
        layers.push(file_layer(config.file.format, writer));
        guard = Some(worker_guard);
    }

    if config.console.enabled {
        let use_ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::init(e.to_string()))?;

    Ok(LoggerGuard { _file: guard })
}

fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(&config.directory)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.prefix.as_str())
        .build(&config.directory)
        .map_err(|e| LoggerError::config(e.to_string()))?;

    Ok(tracing_appender::non_blocking(appender))
}

fn file_layer(format: LogFormat, writer: NonBlocking) -> BoxedLayer {
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    match format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = FileConfig::default();
        config.enabled = true;
        config.directory = temp_dir.path().join("nested").join("logs");

        let (_writer, _guard) = file_writer(&config).unwrap();
        assert!(config.directory.is_dir());
    }

    #[test]
    fn test_init_logger_only_once() {
        let temp_dir = TempDir::new().unwrap();
        let file = FileConfig::new(
            true,
            temp_dir.path().to_path_buf(),
            "test.log".to_string(),
            LogFormat::Json,
        );
        let config = LoggerConfig::new(ConsoleConfig::new(false, false), file, "debug".to_string())
            .unwrap();

        let _first = init_logger(config.clone());
        let second = init_logger(config);
        assert!(matches!(second, Err(LoggerError::Init { .. })));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_install() {
        let config = LoggerConfig {
            level: "chatty".to_string(),
            ..LoggerConfig::default()
        };
        assert!(matches!(init_logger(config), Err(LoggerError::Config { .. })));
    }
}
