//! Test process setup.

use std::sync::Once;

use evsub_telemetry::{LogConfig, LogTarget, setup_logging};

static INIT: Once = Once::new();

/// Route `tracing` output to the test harness, once per process.
///
/// The level comes from `EVSUB_TEST_LOG` (default `warn`); hub events are
/// emitted under the `evsub_events` target. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let level = std::env::var("EVSUB_TEST_LOG").unwrap_or_else(|_| "warn".to_owned());
        let config = LogConfig::new(level)
            .with_target(LogTarget::Test)
            .without_timestamps()
            .without_ansi();
        // Another harness may have installed a subscriber already.
        if let Err(e) = setup_logging(&config) {
            tracing::debug!(error = %e, "test logging not installed");
        }
    });
}
