//! evsub Events - typed publish/subscribe hub.
//!
//! This crate provides:
//! - Per-event listeners with generated or caller-chosen keys
//! - A cache of the last value of every event, for late subscribers
//! - Bounded history replay for allowlisted events
//! - Async filters that transform values before dispatch
//! - Wildcard listeners notified for every event
//! - Prefix-scoped teardown with destroy hooks
//!
//! # Architecture
//!
//! A [`Hub`] owns all state behind one lock. Listeners run synchronously
//! inside [`Hub::trigger`], in registration order, over a snapshot of the
//! listener list; the lock is never held while user code runs, so
//! listeners may freely call back into the hub.
//!
//! When the hub is built with an auto-prefix, every key it generates
//! carries the prefix that was active at registration time, and
//! [`Hub::destroy`] tears down only the registrations of the active
//! prefix. Listeners registered with [`Hub::on_global`] never belong to a
//! scope.
//!
//! # Example
//!
//! ```rust
//! use evsub_events::{Hub, OnOptions};
//! use serde_json::json;
//!
//! # async fn example() -> evsub_events::HubResult<()> {
//! let hub: Hub = Hub::builder().with_preserve(["log"]).build()?;
//!
//! hub.on("log", |line: &serde_json::Value| println!("{line}"));
//! hub.trigger("log", json!("started")).await?;
//!
//! assert_eq!(hub.get_preserve("log"), vec![json!("started")]);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::arithmetic_side_effects))]

pub mod prelude;

mod callback;
mod config;
mod dispatch;
mod each;
mod error;
mod hub;
mod key;
mod lifecycle;
mod logger;
mod registry;
mod slots;
mod store;
mod value;

pub use callback::{
    Callback, DestroyCallback, DestroyTarget, EachCallback, EachTarget, ListenerTarget, Target,
};
pub use config::HubConfig;
pub use dispatch::FilterFn;
pub use error::{BoxError, ConfigError, ConfigResult, HubError, HubResult};
pub use hub::{Hub, HubBuilder, OnOptions};
pub use key::{ListenerKey, PrefixFn};
pub use lifecycle::DestroyOptions;
pub use logger::{LogKind, LoggerFn};
pub use store::DEFAULT_PRESERVE_LIMIT;
pub use value::{EventName, EventValue};
