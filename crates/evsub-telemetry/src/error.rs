//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing a tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or a directive could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A global subscriber is already installed, or the file appender
    /// could not be created.
    #[error("Initialization error: {0}")]
    InitError(String),

    /// The log directory could not be created.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
