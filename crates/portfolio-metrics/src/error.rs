//! Error types for metric emission.

use thiserror::Error;

/// Result type alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors that can occur while setting up or emitting metrics.
///
/// Emission errors are never fatal; only [`StatsdSink::connect`] failures
/// surface at startup.
///
/// [`StatsdSink::connect`]: crate::StatsdSink::connect
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("could not resolve statsd address {0}")]
    Resolve(String),

    #[error("timed out connecting to statsd at {0}")]
    Timeout(String),

    #[error("statsd i/o error: {0}")]
    Io(#[from] std::io::Error),
}
