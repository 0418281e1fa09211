//! Prelude module - commonly used types for convenient import.
//!
//! Use `use evsub_events::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use evsub_events::prelude::*;
//!
//! # async fn example() -> HubResult<()> {
//! let hub: Hub<String, u32> = Hub::new();
//! let key = hub.on("tick", |n: &u32| println!("tick {n}"));
//!
//! hub.trigger("tick", 1).await?;
//! hub.off("tick", key);
//! # Ok(())
//! # }
//! ```

// Hub
pub use crate::{DestroyOptions, Hub, HubBuilder, OnOptions};

// Callbacks and keys
pub use crate::{Callback, DestroyCallback, EachCallback, ListenerKey, Target};

// Configuration
pub use crate::{HubConfig, LogKind};

// Errors
pub use crate::{HubError, HubResult};

// Bounds
pub use crate::{EventName, EventValue};
