//! Structured logging configuration.
//!
//! Builds a `tracing-subscriber` pipeline from [`LoggingConfig`]. The
//! `RUST_LOG` environment variable, when set, overrides the configured level
//! so operators can raise verbosity without editing configuration.

use crate::config::LoggingConfig;
use crate::error::{CoreError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber described by `config`.
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| CoreError::ConfigError(format!("Failed to install subscriber: {e}")))
}
