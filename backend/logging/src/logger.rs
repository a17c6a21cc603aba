//! Structured Logger
//!
//! Wraps `tracing` with a human console layer on stderr, a daily-rolling
//! NDJSON file and an error-only NDJSON file. Stdout is left untouched for
//! the MCP protocol.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Prefix of the all-levels log file (`cardwire.log.YYYY-MM-DD`).
pub const APP_LOG_PREFIX: &str = "cardwire.log";
/// Prefix of the error-only log file.
pub const ERROR_LOG_PREFIX: &str = "cardwire-errors.log";

fn daily(log_dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .build(log_dir)
        .with_context(|| format!("creating {prefix} appender in {}", log_dir.display()))
}

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level`. Calling this twice is harmless; the second
/// subscriber is simply not installed.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> Result<()> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = fmt::layer()
        .json()
        .with_writer(daily(log_dir, APP_LOG_PREFIX)?)
        .with_ansi(false);

    let error_layer = fmt::layer()
        .json()
        .with_writer(daily(log_dir, ERROR_LOG_PREFIX)?)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .with(error_layer)
        .try_init();
    Ok(())
}
