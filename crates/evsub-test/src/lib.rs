//! evsub Test - shared test utilities for the evsub crates.
//!
//! This crate provides recorders, a switchable prefix source and config
//! fixtures that can be used across the workspace as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! evsub-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use evsub_events::Hub;
//!     use evsub_test::Recorder;
//!
//!     #[tokio::test]
//!     async fn test_delivery() {
//!         let hub: Hub<String, u32> = Hub::new();
//!         let seen = Recorder::new();
//!         hub.on("tick", seen.listener());
//!
//!         hub.trigger("tick", 1).await.unwrap();
//!         assert_eq!(seen.take(), vec![1]);
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
