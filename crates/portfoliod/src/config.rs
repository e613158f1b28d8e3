//! Daemon configuration from flags and environment variables.

use std::path::Path;

use clap::{Parser, ValueEnum};
use portfolio_metrics::{StatsdConfig, DEFAULT_PREFIX};
use thiserror::Error;

/// Errors in the startup configuration. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid STATSD_ADDRESS {0:?}: expected host:port")]
    InvalidStatsdAddress(String),

    #[error("invalid LOG_LEVEL {level:?}: {source}")]
    InvalidLogLevel {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to load env file: {0}")]
    EnvFile(#[source] dotenvy::Error),
}

/// Load `KEY=value` pairs from `path` into the process environment.
/// Variables already set win. Returns `false` when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::EnvFile(e)),
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "portfoliod", about = "Portfolio catalog over gRPC with a REST gateway")]
pub struct Config {
    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// StatsD collector as host:port. Metrics are discarded when unset.
    #[arg(long, env = "STATSD_ADDRESS")]
    pub statsd_address: Option<String>,

    /// Prefix for every emitted metric name.
    #[arg(long, env = "STATSD_PREFIX", default_value = DEFAULT_PREFIX)]
    pub statsd_prefix: String,

    /// Log filter: a level or a full `tracing` directive list.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Value for Access-Control-Allow-Origin.
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "*")]
    pub allowed_origin: String,

    #[arg(long, env = "GRPC_PORT", default_value_t = 50051)]
    pub grpc_port: u16,

    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,
}

impl Config {
    /// StatsD settings, or `None` when metrics are disabled.
    pub fn statsd(&self) -> Result<Option<StatsdConfig>, ConfigError> {
        let Some(address) = self
            .statsd_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
        else {
            return Ok(None);
        };

        let invalid = || ConfigError::InvalidStatsdAddress(address.to_string());

        let mut parts = address.split(':');
        let (Some(host), Some(port), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        if host.is_empty() {
            return Err(invalid());
        }
        let port: u16 = port.parse().map_err(|_| invalid())?;

        Ok(Some(StatsdConfig {
            host: host.to_string(),
            port,
            prefix: self.statsd_prefix.clone(),
        }))
    }
}
