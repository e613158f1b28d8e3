//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, LogFormat};

/// Parse `LOG_LEVEL` into a filter. Accepts a bare level (`debug`) or a
/// directive list (`info,portfolio_store=trace`).
pub fn filter(level: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::builder()
        .parse(level.trim())
        .map_err(|source| ConfigError::InvalidLogLevel {
            level: level.to_string(),
            source,
        })
}

/// Install the global subscriber.
pub fn init(level: &str, format: LogFormat) -> Result<(), ConfigError> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(level)?);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
