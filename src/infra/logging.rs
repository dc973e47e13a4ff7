use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError};

const LOG_FILE_PREFIX: &str = "sidekick.log";

/// Initializes tracing with a daily-rolling file writer so the TUI screen
/// stays clean. The returned guard must be held for the process lifetime or
/// buffered lines are lost.
pub fn init(config: &LogConfig, log_dir: &Path) -> Result<WorkerGuard, AppError> {
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(AppError::LoggingInit)?;

    Ok(guard)
}

/// Fallback when no log directory could be resolved: plain stderr output.
pub fn init_stderr(config: &LogConfig) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_target(true)
        .try_init()
        .map_err(AppError::LoggingInit)
}
