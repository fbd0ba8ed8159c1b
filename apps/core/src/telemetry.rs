use crate::config::{ClassifierConfig, LogFormat};
use crate::error::AppError;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const APP_NAME: &str = "inbox-triage";

/// Installs the global subscriber. Logs go to stderr so stdout stays clean for results.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &ClassifierConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| AppError::Config(format!("Invalid log level: {}", e)))?;

    let installed = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(APP_NAME.to_string(), std::io::stderr))
            .try_init(),
    };

    installed
        .map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
