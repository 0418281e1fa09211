//! Error types for the event hub.

use std::io;

use thiserror::Error;

/// Boxed error returned by filter transforms.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by hub operations.
///
/// Registration and removal never fail; the only runtime failure is a
/// filter resolving to an error while a value is being triggered.
#[derive(Debug, Error)]
pub enum HubError {
    /// The filter registered for an event rejected the emitted value.
    #[error("filter for event '{name}' failed: {source}")]
    Filter {
        /// Display form of the event name.
        name: String,
        /// Error returned by the filter.
        #[source]
        source: BoxError,
    },

    /// The hub was built from invalid options.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for hub operations.
pub type HubResult<T> = Result<T, HubError>;

/// Errors raised while loading or validating a [`HubConfig`](crate::HubConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// Path to the config file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse config file at {path}: {source}")]
    ParseError {
        /// Path to the config file that failed to parse.
        path: String,
        /// Underlying TOML parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Field that failed validation.
        field: String,
        /// Validation failure description.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
