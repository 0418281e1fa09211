//! Prelude module - commonly used test helpers.
//!
//! Use `use evsub_test::prelude::*;` in test modules.

pub use crate::{PrefixSwitch, Recorder, init_test_logging};
pub use crate::{SAMPLE_HUB_TOML, write_config_file};
