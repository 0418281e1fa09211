//! evsub Telemetry - logging setup for applications embedding an evsub hub.
//!
//! The hub itself only emits `tracing` events (target `evsub_events`).
//! This crate installs a subscriber for them:
//! - Pretty, compact, full or JSON output
//! - stdout, stderr, rolling files, or the test harness
//! - `EnvFilter` level and per-target directives
//!
//! # Example
//!
//! ```rust,no_run
//! use evsub_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), evsub_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_hub_tracing();
//!
//! setup_logging(&config)?;
//! tracing::info!("hub ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, HUB_TARGET, LogConfig, LogFormat, LogTarget,
    setup_default_logging, setup_logging,
};
