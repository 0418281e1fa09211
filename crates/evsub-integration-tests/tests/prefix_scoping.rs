//! Prefix-scoped registration and teardown across simulated pages.

mod common;

use common::{scoped_hub, trigger_all};
use evsub_events::{DestroyOptions, OnOptions};
use evsub_test::{PrefixSwitch, Recorder};

#[tokio::test]
async fn test_pages_tear_down_independently() {
    let switch = PrefixSwitch::new();
    let hub = scoped_hub(&switch);

    let global = Recorder::new();
    hub.on_global("one", global.listener(), OnOptions::default());
    hub.on_global("two", global.listener(), OnOptions::default());

    switch.set("page1");
    let page1 = Recorder::new();
    hub.on("one", page1.listener());
    hub.on("two", page1.listener());

    trigger_all(&hub, &[("one", "1"), ("two", "2")]).await;
    assert_eq!(page1.snapshot(), vec!["1", "2"]);
    assert_eq!(global.snapshot(), vec!["1", "2"]);

    switch.set("page2");
    let page2 = Recorder::new();
    hub.on_with("one", page2.listener(), OnOptions::immediate());
    hub.on_with("two", page2.listener(), OnOptions::immediate());

    trigger_all(&hub, &[("one", "3"), ("two", "4")]).await;
    assert_eq!(page1.snapshot(), vec!["1", "2", "3", "4"]);
    assert_eq!(page2.snapshot(), vec!["1", "2", "3", "4"]);
    assert_eq!(global.snapshot(), vec!["1", "2", "3", "4"]);

    // page2 leaves
    hub.destroy();
    trigger_all(&hub, &[("one", "5"), ("two", "6")]).await;
    assert_eq!(page1.snapshot(), vec!["1", "2", "3", "4", "5", "6"]);
    assert_eq!(page2.snapshot(), vec!["1", "2", "3", "4"]);
    assert_eq!(global.snapshot(), vec!["1", "2", "3", "4", "5", "6"]);

    // page1 leaves
    switch.set("page1");
    hub.destroy();
    trigger_all(&hub, &[("one", "7"), ("two", "8")]).await;
    assert_eq!(page1.snapshot(), vec!["1", "2", "3", "4", "5", "6"]);
    assert_eq!(global.snapshot(), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);

    hub.destroy_with(DestroyOptions::ignoring_prefix());
    trigger_all(&hub, &[("one", "9"), ("two", "10")]).await;
    assert_eq!(global.snapshot(), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
}

#[tokio::test]
async fn test_scoped_destroy_keeps_cache() {
    let switch = PrefixSwitch::starting_at("page1");
    let hub = scoped_hub(&switch);
    hub.on("one", |_: &String| {});
    trigger_all(&hub, &[("one", "1")]).await;

    hub.destroy();
    assert_eq!(hub.listener_count("one"), 0);
    assert_eq!(hub.get_cache("one"), Some("1".to_owned()));

    hub.destroy_with(DestroyOptions::ignoring_prefix());
    assert_eq!(hub.get_cache("one"), None);
}

#[tokio::test]
async fn test_explicit_key_is_scoped_to_prefix() {
    let switch = PrefixSwitch::starting_at("page1");
    let hub = scoped_hub(&switch);
    let seen = Recorder::new();

    let key = hub.on_with("one", seen.listener(), OnOptions::keyed("arranger"));
    assert_eq!(key, "page1-arranger");
    assert_eq!(switch.get(), hub.current_prefix());

    switch.set("page2");
    hub.on_with("one", seen.listener(), OnOptions::keyed("arranger"));
    assert_eq!(hub.listener_count("one"), 2);

    // the short key resolves under the active prefix
    assert!(hub.off("one", "arranger"));
    trigger_all(&hub, &[("one", "1")]).await;
    assert_eq!(seen.take(), vec!["1"]);

    // a full key from another scope is re-prefixed and misses
    assert!(!hub.off("one", &key));
    assert_eq!(hub.listener_count("one"), 1);

    // back in its own scope the full key is accepted as is
    switch.set("page1");
    assert!(hub.off("one", &key));
    assert_eq!(hub.listener_count("one"), 0);
}

#[tokio::test]
async fn test_scoped_off_leaves_global_short_key_alone() {
    let switch = PrefixSwitch::new();
    let hub = scoped_hub(&switch);
    let seen = Recorder::new();

    let global = hub.on_global("n", seen.listener(), OnOptions::keyed("k"));
    assert_eq!(global, "k");

    switch.set("page1");
    assert!(!hub.off("n", "k"));
    assert_eq!(hub.listener_count("n"), 1);

    hub.on_with("n", seen.listener(), OnOptions::keyed("k"));
    assert!(hub.off("n", "k"));
    trigger_all(&hub, &[("n", "1")]).await;
    assert_eq!(seen.take(), vec!["1"]);

    switch.set("");
    assert!(hub.off("n", "k"));
    assert_eq!(hub.listener_count("n"), 0);
}

#[tokio::test]
async fn test_destroy_reaches_longer_prefixes() {
    let switch = PrefixSwitch::starting_at("page10");
    let hub = scoped_hub(&switch);

    hub.on("one", |_: &String| {});
    hub.on_each(|_: &String, _: &String| {}, OnOptions::default());
    switch.set("page1");
    hub.on("one", |_: &String| {});

    hub.destroy();
    assert_eq!(hub.listener_count("one"), 0);
    assert_eq!(hub.each_count(), 0);
}

#[tokio::test]
async fn test_prefix_is_read_at_registration_time() {
    let switch = PrefixSwitch::new();
    let hub = scoped_hub(&switch);

    let before = hub.on("one", |_: &String| {});
    switch.set("page1");
    let after = hub.on("one", |_: &String| {});

    assert!(!before.in_scope("page1"));
    assert!(after.in_scope("page1"));

    hub.destroy();
    assert_eq!(hub.listener_count("one"), 1);
}
