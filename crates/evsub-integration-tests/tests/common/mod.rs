//! Shared helpers for hub scenario tests.

use evsub_events::Hub;
use evsub_test::{PrefixSwitch, init_test_logging};

/// Build a string hub whose prefix follows `switch`.
#[allow(dead_code)]
pub fn scoped_hub(switch: &PrefixSwitch) -> Hub<String, String> {
    init_test_logging();
    Hub::builder()
        .with_auto_prefix(switch.source())
        .build()
        .expect("default options are valid")
}

/// Trigger every `(name, value)` pair in order.
#[allow(dead_code)]
pub async fn trigger_all(hub: &Hub<String, String>, events: &[(&str, &str)]) {
    for (name, value) in events {
        hub.trigger(*name, (*value).to_owned())
            .await
            .expect("no filters registered");
    }
}
