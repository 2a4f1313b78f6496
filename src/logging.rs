use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LogConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `log_level`. Keep the returned guard alive for the
/// life of the process or buffered file output is lost.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard, LoggingError> {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| LoggingError::Filter {
            filter: config.log_level.clone(),
            message: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).try_init()?;
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).try_init()?;
    }

    Ok(guard)
}

