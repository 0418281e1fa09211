//! The event hub: construction, listener registration, and cache access.
//!
//! Dispatch lives in `dispatch.rs`, wildcard listeners in `each.rs`, and
//! teardown in `lifecycle.rs`; all of them extend [`Hub`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, trace};

use crate::callback::{Callback, DestroyCallback, EachCallback, ListenerTarget, Target};
use crate::config::HubConfig;
use crate::dispatch::FilterFn;
use crate::error::HubResult;
use crate::key::{KeyFactory, ListenerKey, PrefixFn};
use crate::logger::{Journal, LogKind, LoggerFn};
use crate::registry::Registry;
use crate::slots::Slots;
use crate::store::ResultStore;
use crate::value::{EventName, EventValue};

/// Mutable hub state. Guarded by a single mutex that is never held while
/// user code runs.
pub(crate) struct HubState<N, V> {
    pub(crate) registry: Registry<N, V>,
    pub(crate) each: Slots<EachCallback<N, V>>,
    pub(crate) destroy: Slots<DestroyCallback>,
    pub(crate) store: ResultStore<N, V>,
    pub(crate) filters: HashMap<N, FilterFn<V>>,
}

pub(crate) struct HubInner<N, V> {
    pub(crate) state: Mutex<HubState<N, V>>,
    pub(crate) keys: KeyFactory,
    pub(crate) journal: Journal,
}

/// Registration options for [`Hub::on_with`], [`Hub::on_global`] and
/// [`Hub::on_each`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnOptions {
    /// Deliver the cached value (or the wildcard backlog) right away.
    pub immediate: bool,
    /// Caller-chosen key. Registering the same key again replaces the
    /// earlier registration.
    pub key: Option<String>,
}

impl OnOptions {
    /// Options with `immediate` set.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            immediate: true,
            key: None,
        }
    }

    /// Options with an explicit key.
    #[must_use]
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            immediate: false,
            key: Some(key.into()),
        }
    }

    /// Set an explicit key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Process-local publish/subscribe hub.
///
/// Listeners are registered per event name and called synchronously, in
/// registration order, whenever a value is triggered for that name. The
/// hub also remembers the last value of every event (for late
/// subscribers), the full history of allowlisted events, and supports
/// wildcard listeners, async filters, and prefix-scoped teardown.
///
/// Cloning a hub is cheap; clones share the same state.
///
/// # Example
///
/// ```rust
/// use evsub_events::{Hub, OnOptions};
///
/// # async fn example() -> evsub_events::HubResult<()> {
/// let hub: Hub<String, u32> = Hub::new();
///
/// hub.trigger("ready", 1).await?;
///
/// // Late subscriber still sees the last value.
/// hub.on_with("ready", |v: &u32| assert_eq!(*v, 1), OnOptions::immediate());
/// # Ok(())
/// # }
/// ```
pub struct Hub<N = String, V = serde_json::Value> {
    pub(crate) inner: Arc<HubInner<N, V>>,
}

impl<N, V> Clone for Hub<N, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: EventName, V: EventValue> fmt::Debug for Hub<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Hub")
            .field("listeners", &state.registry.total())
            .field("each", &state.each.len())
            .field("destroy_hooks", &state.destroy.len())
            .field("filters", &state.filters.len())
            .field("preserve_limit", &state.store.limit())
            .field("keys", &self.inner.keys)
            .finish_non_exhaustive()
    }
}

impl<N: EventName, V: EventValue> Default for Hub<N, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: EventName, V: EventValue> Hub<N, V> {
    /// Create a hub with default options: no preserved events, a history
    /// cap of 500, no prefix and no logger hook.
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(HubConfig::default(), None, None)
    }

    /// Start building a hub with custom options.
    #[must_use]
    pub fn builder() -> HubBuilder<N, V> {
        HubBuilder::new()
    }

    /// Create a hub from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Config`](crate::HubError::Config) if the
    /// configuration fails validation.
    pub fn from_config(config: HubConfig<N>) -> HubResult<Self> {
        HubBuilder::new().with_config(config).build()
    }

    fn assemble(
        mut config: HubConfig<N>,
        prefix: Option<PrefixFn>,
        logger: Option<LoggerFn>,
    ) -> Self {
        config.dedup_preserve();
        let journal = Journal::new(logger);
        if !config.preserve.is_empty() {
            journal.record(LogKind::Init, &"constructor", || {
                format!("preserve: {:?}", config.preserve)
            });
        }
        debug!(
            preserve = config.preserve.len(),
            preserve_limit = config.preserve_limit,
            "Hub created"
        );

        let state = HubState {
            registry: Registry::default(),
            each: Slots::default(),
            destroy: Slots::default(),
            store: ResultStore::new(config.preserve, config.preserve_limit),
            filters: HashMap::new(),
        };

        Self {
            inner: Arc::new(HubInner {
                state: Mutex::new(state),
                keys: KeyFactory::new(prefix),
                journal,
            }),
        }
    }

    /// Lock the hub state.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub(crate) fn state(&self) -> MutexGuard<'_, HubState<N, V>> {
        self.inner.state.lock().expect("hub state lock poisoned")
    }

    pub(crate) fn journal(&self) -> &Journal {
        &self.inner.journal
    }

    pub(crate) fn keys(&self) -> &KeyFactory {
        &self.inner.keys
    }

    pub(crate) fn downgrade(&self) -> Weak<HubInner<N, V>> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(inner: &Weak<HubInner<N, V>>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// The prefix currently returned by the auto-prefix function.
    #[must_use]
    pub fn current_prefix(&self) -> String {
        self.inner.keys.prefix()
    }

    /// Subscribe to an event.
    ///
    /// Returns the key to pass to [`Hub::off`].
    pub fn on(&self, name: impl Into<N>, callback: impl Into<Callback<V>>) -> ListenerKey {
        self.on_with(name, callback, OnOptions::default())
    }

    /// Subscribe to an event with explicit options.
    ///
    /// With `immediate` set and a cached value present, the callback is
    /// invoked with that value before this method returns. With an
    /// explicit key, any listener already registered under the same key
    /// for this event is replaced.
    pub fn on_with(
        &self,
        name: impl Into<N>,
        callback: impl Into<Callback<V>>,
        options: OnOptions,
    ) -> ListenerKey {
        let name = name.into();
        let key = self.inner.keys.scoped(&name, options.key.as_deref());
        self.register(name, key, callback.into(), options.immediate)
    }

    /// Subscribe without the active prefix.
    ///
    /// The key is built as if no prefix were configured, so a scoped
    /// [`Hub::destroy`] never removes this listener.
    pub fn on_global(
        &self,
        name: impl Into<N>,
        callback: impl Into<Callback<V>>,
        options: OnOptions,
    ) -> ListenerKey {
        let name = name.into();
        let key = self.inner.keys.global(&name, options.key.as_deref());
        self.register(name, key, callback.into(), options.immediate)
    }

    /// Subscribe for a single delivery.
    ///
    /// The listener unsubscribes itself right before it runs. When
    /// `immediate` is set and a cached value exists, the callback runs
    /// with it at once, nothing is registered, and `None` is returned.
    pub fn once(
        &self,
        name: impl Into<N>,
        callback: impl Into<Callback<V>>,
        immediate: bool,
    ) -> Option<ListenerKey> {
        let name = name.into();
        let callback = callback.into();
        self.journal()
            .record(LogKind::Once, &name, || format!("immediate: {immediate}"));

        if immediate {
            let cached = self.state().store.cached(&name);
            if let Some(value) = cached {
                callback.call(&value);
                return None;
            }
        }

        let key = self.inner.keys.scoped(&name, None);
        let hub = self.downgrade();
        let fired = AtomicBool::new(false);
        let wrapper = {
            let name = name.clone();
            let key = key.clone();
            Callback::new(move |value: &V| {
                if fired.swap(true, Ordering::AcqRel) {
                    return;
                }
                if let Some(hub) = Self::upgrade(&hub) {
                    hub.unregister(&name, key.as_str());
                }
                callback.call(value);
            })
        };

        Some(self.register(name, key, wrapper, immediate))
    }

    /// Subscribe until the callback returns `false`.
    ///
    /// The listener stays registered while the callback keeps returning
    /// `true` and removes itself after the first `false`.
    pub fn once_until<F>(&self, name: impl Into<N>, callback: F, immediate: bool) -> ListenerKey
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.journal()
            .record(LogKind::OnceUntil, &name, || format!("immediate: {immediate}"));

        let key = self.inner.keys.scoped(&name, None);
        let hub = self.downgrade();
        let finished = AtomicBool::new(false);
        let wrapper = {
            let name = name.clone();
            let key = key.clone();
            Callback::new(move |value: &V| {
                if finished.load(Ordering::Acquire) {
                    return;
                }
                if !callback(value) {
                    finished.store(true, Ordering::Release);
                    if let Some(hub) = Self::upgrade(&hub) {
                        hub.unregister(&name, key.as_str());
                    }
                }
            })
        };

        self.register(name, key, wrapper, immediate)
    }

    /// Unsubscribe one listener from an event.
    ///
    /// A key target is matched in its prefixed form, as `on` would have
    /// built it under the current prefix. A full key returned by `on` in
    /// the current scope is also accepted as is. A callback target
    /// removes the first registration of that handle. Returns whether a
    /// listener was removed; unknown targets are ignored.
    pub fn off<Q>(&self, name: &Q, target: impl Into<ListenerTarget<V>>) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        let removed = match target.into() {
            Target::Key(raw) => {
                let candidates = self.keys().candidates(&raw);
                let mut state = self.state();
                candidates
                    .iter()
                    .find_map(|key| state.registry.remove_key(name, key.as_str()))
            },
            Target::Callback(callback) => self.state().registry.remove_callback(name, &callback),
        };

        match removed {
            Some(key) => {
                trace!(event = %name, key = %key, "Listener removed");
                self.journal()
                    .record(LogKind::Off, &name, || format!("eventKey: {key}"));
                true
            },
            None => false,
        }
    }

    /// Subscribe after replaying the preserved history of the event.
    ///
    /// Every history entry is delivered to the callback, oldest first,
    /// before it is registered for future triggers.
    pub fn on_with_preserve(
        &self,
        name: impl Into<N>,
        callback: impl Into<Callback<V>>,
        key: Option<&str>,
    ) -> ListenerKey {
        let name = name.into();
        let callback = callback.into();
        self.journal()
            .record(LogKind::OnWithPreserve, &name, || format!("fnKey: {key:?}"));

        let backlog = self.state().store.history(&name);
        for value in &backlog {
            callback.call(value);
        }

        let options = OnOptions {
            immediate: false,
            key: key.map(str::to_owned),
        };
        self.on_with(name, callback, options)
    }

    /// Preserved history of an event, oldest first.
    ///
    /// Empty when the event is not in the preserve allowlist or was never
    /// triggered.
    #[must_use]
    pub fn get_preserve<Q>(&self, name: &Q) -> Vec<V>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        let history = self.state().store.history(name);
        self.journal()
            .record(LogKind::GetPreserve, &name, || format!("total: {}", history.len()));
        history
    }

    /// Last value dispatched for an event.
    #[must_use]
    pub fn get_cache<Q>(&self, name: &Q) -> Option<V>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state().store.cached(name)
    }

    /// Forget the cached value of one event. Returns the removed value.
    pub fn delete_cache<Q>(&self, name: &Q) -> Option<V>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        let removed = self.state().store.remove_cached(name);
        if removed.is_some() {
            trace!(event = %name, "Cache entry deleted");
        }
        removed
    }

    /// Forget the cached values of every event.
    pub fn clear_cache(&self) {
        self.state().store.clear_cache();
        trace!("Cache cleared");
    }

    /// Number of listeners currently registered for an event.
    #[must_use]
    pub fn listener_count<Q>(&self, name: &Q) -> usize
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state().registry.len(name)
    }

    fn register(
        &self,
        name: N,
        key: ListenerKey,
        callback: Callback<V>,
        immediate: bool,
    ) -> ListenerKey {
        let cached = {
            let mut state = self.state();
            state
                .registry
                .insert(name.clone(), key.clone(), callback.clone());
            if immediate {
                state.store.cached(&name)
            } else {
                None
            }
        };

        trace!(event = %name, key = %key, immediate, "Listener registered");
        self.journal().record(LogKind::On, &name, || {
            let delivered = if cached.is_some() {
                ", delivered cached value"
            } else {
                ""
            };
            format!("on({name}, fn, immediate: {immediate}, eventKey: {key}){delivered}")
        });

        if let Some(value) = cached {
            callback.call(&value);
        }
        key
    }

    /// Remove a listener by its stored key.
    pub(crate) fn unregister(&self, name: &N, key: &str) {
        let removed = self.state().registry.remove_key(name, key);
        if let Some(key) = removed {
            trace!(event = %name, key = %key, "Listener removed itself");
            self.journal()
                .record(LogKind::Off, name, || format!("eventKey: {key}"));
        }
    }
}

/// Builder for [`Hub`].
pub struct HubBuilder<N = String, V = serde_json::Value> {
    config: HubConfig<N>,
    prefix: Option<PrefixFn>,
    logger: Option<LoggerFn>,
    _value: PhantomData<fn() -> V>,
}

impl<N: EventName, V: EventValue> Default for HubBuilder<N, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: EventName, V: EventValue> HubBuilder<N, V> {
    /// Create a builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HubConfig::default(),
            prefix: None,
            logger: None,
            _value: PhantomData,
        }
    }

    /// Replace the serializable options.
    #[must_use]
    pub fn with_config(mut self, config: HubConfig<N>) -> Self {
        self.config = config;
        self
    }

    /// Keep the full history of the given events.
    #[must_use]
    pub fn with_preserve(mut self, names: impl IntoIterator<Item = impl Into<N>>) -> Self {
        self.config = self.config.with_preserve(names);
        self
    }

    /// Set the per-event history cap.
    #[must_use]
    pub fn with_preserve_limit(mut self, limit: usize) -> Self {
        self.config.preserve_limit = limit;
        self
    }

    /// Set the function producing the active prefix.
    ///
    /// It is evaluated on every registration, removal and destroy call.
    #[must_use]
    pub fn with_auto_prefix<F>(mut self, prefix: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.prefix = Some(Arc::new(prefix));
        self
    }

    /// Set the logger hook.
    #[must_use]
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(LogKind, &str, &str) + Send + Sync + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Validate the options and build the hub.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Config`](crate::HubError::Config) if the
    /// options fail validation.
    pub fn build(self) -> HubResult<Hub<N, V>> {
        self.config.validate()?;
        Ok(Hub::assemble(self.config, self.prefix, self.logger))
    }
}

impl<N: fmt::Debug, V> fmt::Debug for HubBuilder<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubBuilder")
            .field("config", &self.config)
            .field("has_prefix", &self.prefix.is_some())
            .field("has_logger", &self.logger.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evsub_test::Recorder;

    fn hub() -> Hub<String, String> {
        Hub::new()
    }

    #[tokio::test]
    async fn test_trigger_reaches_all_listeners_in_order() {
        let hub = hub();
        let seen = Recorder::new();
        let a = seen.clone();
        let b = seen.clone();
        hub.on("hello", move |v: &String| a.push(format!("a-{v}")));
        hub.on("hello", move |v: &String| b.push(format!("b-{v}")));

        hub.trigger("hello", "x".to_owned()).await.unwrap();
        assert_eq!(seen.take(), vec!["a-x", "b-x"]);
    }

    #[tokio::test]
    async fn test_off_by_callback() {
        let hub = hub();
        let seen = Recorder::new();
        let f1 = {
            let seen = seen.clone();
            Callback::new(move |v: &String| seen.push(format!("f1-{v}")))
        };
        let f2 = {
            let seen = seen.clone();
            Callback::new(move |v: &String| seen.push(format!("f2-{v}")))
        };
        hub.on("hello", f1.clone());
        hub.on("hello", f2);

        hub.trigger("hello", "x".to_owned()).await.unwrap();
        assert!(hub.off("hello", &f1));
        hub.trigger("hello", "y".to_owned()).await.unwrap();

        assert_eq!(seen.take(), vec!["f1-x", "f2-x", "f2-y"]);
        assert!(!hub.off("hello", &f1));
    }

    #[tokio::test]
    async fn test_off_by_key() {
        let hub = hub();
        let seen = Recorder::new();
        let s = seen.clone();
        let key = hub.on("hello", move |v: &String| s.push(v.clone()));
        assert_eq!(key, "hello-0");

        assert!(hub.off("hello", &key));
        hub.trigger("hello", "x".to_owned()).await.unwrap();
        assert!(seen.is_empty());
    }

    #[test]
    fn test_off_unknown_is_noop() {
        let hub = hub();
        assert!(!hub.off("missing", "nope"));
        assert!(!hub.off("missing", Callback::new(|_: &String| {})));
    }

    #[tokio::test]
    async fn test_immediate_uses_cache() {
        let hub = hub();
        let seen = Recorder::new();

        let s = seen.clone();
        hub.on_with("hello", move |v: &String| s.push(v.clone()), OnOptions::immediate());
        assert!(seen.is_empty());

        hub.trigger("hello", "01".to_owned()).await.unwrap();
        assert_eq!(seen.take(), vec!["01"]);

        let s = seen.clone();
        hub.on_with("hello", move |v: &String| s.push(format!("late-{v}")), OnOptions::immediate());
        assert_eq!(seen.take(), vec!["late-01"]);
    }

    #[tokio::test]
    async fn test_explicit_key_replaces() {
        let hub = hub();
        let seen = Recorder::new();

        let s = seen.clone();
        hub.on_with("hello", move |v: &String| s.push(format!("cb1-{v}")), OnOptions::keyed("k"));
        let s = seen.clone();
        hub.on_with("hello", move |v: &String| s.push(format!("cb2-{v}")), OnOptions::keyed("k"));

        assert_eq!(hub.listener_count("hello"), 1);
        hub.trigger("hello", "x".to_owned()).await.unwrap();
        assert_eq!(seen.take(), vec!["cb2-x"]);
    }

    #[tokio::test]
    async fn test_same_key_on_two_events() {
        let hub = hub();
        let one = Recorder::new();
        let two = Recorder::new();

        let s = one.clone();
        hub.on_with("one", move |v: &String| s.push(v.clone()), OnOptions::keyed("arranger"));
        let s = two.clone();
        hub.on_with("two", move |v: &String| s.push(v.clone()), OnOptions::keyed("arranger"));

        hub.trigger("one", "1".to_owned()).await.unwrap();
        hub.trigger("two", "2".to_owned()).await.unwrap();
        assert_eq!(one.snapshot(), vec!["1"]);
        assert_eq!(two.snapshot(), vec!["2"]);

        hub.destroy();
        hub.trigger("one", "3".to_owned()).await.unwrap();
        hub.trigger("two", "4".to_owned()).await.unwrap();
        assert_eq!(one.snapshot(), vec!["1"]);
        assert_eq!(two.snapshot(), vec!["2"]);
    }

    #[tokio::test]
    async fn test_once_fires_once() {
        let hub = hub();
        let seen = Recorder::new();
        let s = seen.clone();
        let key = hub.once("hello", move |v: &String| s.push(v.clone()), false);
        assert!(key.is_some());

        for v in ["01", "02", "03"] {
            hub.trigger("hello", v.to_owned()).await.unwrap();
        }
        assert_eq!(seen.take(), vec!["01"]);
        assert_eq!(hub.listener_count("hello"), 0);
    }

    #[tokio::test]
    async fn test_once_immediate_with_cache_registers_nothing() {
        let hub = hub();
        hub.trigger("hello", "01".to_owned()).await.unwrap();

        let seen = Recorder::new();
        let s = seen.clone();
        let key = hub.once("hello", move |v: &String| s.push(v.clone()), true);

        assert!(key.is_none());
        assert_eq!(seen.take(), vec!["01"]);
        hub.trigger("hello", "02".to_owned()).await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_once_can_be_cancelled_by_key() {
        let hub = hub();
        let seen = Recorder::new();
        let s = seen.clone();
        let key = hub.once("hello", move |v: &String| s.push(v.clone()), false);

        assert!(hub.off("hello", key.unwrap()));
        hub.trigger("hello", "01".to_owned()).await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_once_until_stops_on_false() {
        let hub = hub();
        let seen = Recorder::new();
        let s = seen.clone();
        let padding = std::sync::atomic::AtomicUsize::new(0);
        hub.once_until(
            "hello",
            move |v: &String| {
                s.push(format!("a-{v}"));
                padding.fetch_add(1, Ordering::SeqCst) < 1
            },
            false,
        );

        for v in ["01", "02", "03", "04"] {
            hub.trigger("hello", v.to_owned()).await.unwrap();
        }
        assert_eq!(seen.take(), vec!["a-01", "a-02"]);
        assert_eq!(hub.listener_count("hello"), 0);
    }

    #[tokio::test]
    async fn test_once_until_immediate_false_unregisters() {
        let hub = hub();
        hub.trigger("hello", "01".to_owned()).await.unwrap();

        let seen = Recorder::new();
        let s = seen.clone();
        hub.once_until(
            "hello",
            move |v: &String| {
                s.push(v.clone());
                false
            },
            true,
        );

        assert_eq!(seen.take(), vec!["01"]);
        assert_eq!(hub.listener_count("hello"), 0);
    }

    #[tokio::test]
    async fn test_listener_removed_during_dispatch_still_runs() {
        let hub = hub();
        let seen = Recorder::new();

        let victim = {
            let seen = seen.clone();
            Callback::new(move |v: &String| seen.push(format!("victim-{v}")))
        };
        let killer = {
            let hub = hub.clone();
            let victim = victim.clone();
            let seen = seen.clone();
            move |v: &String| {
                seen.push(format!("killer-{v}"));
                hub.off("hello", &victim);
            }
        };
        hub.on("hello", killer);
        hub.on("hello", victim);

        hub.trigger("hello", "1".to_owned()).await.unwrap();
        hub.trigger("hello", "2".to_owned()).await.unwrap();
        assert_eq!(seen.take(), vec!["killer-1", "victim-1", "killer-2"]);
    }

    #[tokio::test]
    async fn test_on_with_preserve_replays_backlog() {
        let hub: Hub<String, String> = Hub::builder().with_preserve(["log"]).build().unwrap();
        for v in ["a", "b"] {
            hub.trigger("log", v.to_owned()).await.unwrap();
        }

        let seen = Recorder::new();
        let s = seen.clone();
        hub.on_with_preserve("log", move |v: &String| s.push(v.clone()), None);
        hub.trigger("log", "c".to_owned()).await.unwrap();

        assert_eq!(seen.take(), vec!["a", "b", "c"]);
        assert_eq!(hub.get_preserve("log"), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_and_clear_cache() {
        let hub = hub();
        hub.trigger("one", "1".to_owned()).await.unwrap();
        hub.trigger("two", "1".to_owned()).await.unwrap();

        assert_eq!(hub.delete_cache("one"), Some("1".to_owned()));
        assert_eq!(hub.get_cache("one"), None);
        assert_eq!(hub.get_cache("two"), Some("1".to_owned()));

        hub.clear_cache();
        assert_eq!(hub.get_cache("two"), None);
    }

    #[test]
    fn test_builder_rejects_zero_limit() {
        let result: HubResult<Hub<String, String>> =
            Hub::builder().with_preserve_limit(0).build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_builder_accepts_repeated_preserve() {
        let hub: Hub<String, String> = Hub::builder()
            .with_preserve(["log"])
            .with_preserve(["log"])
            .build()
            .unwrap();

        hub.trigger("log", "a".to_owned()).await.unwrap();
        assert_eq!(hub.get_preserve("log"), vec!["a".to_owned()]);
    }

    #[test]
    fn test_logger_hook_receives_records() {
        let seen = Recorder::new();
        let s = seen.clone();
        let hub: Hub<String, String> = Hub::builder()
            .with_logger(move |kind: LogKind, subject: &str, _: &str| {
                s.push(format!("{kind}:{subject}"));
            })
            .build()
            .unwrap();

        let key = hub.on("hello", |_: &String| {});
        hub.off("hello", &key);
        assert_eq!(seen.take(), vec!["on:hello", "off:hello"]);
    }

    #[test]
    fn test_prefix_fn_may_reenter_hub() {
        use std::sync::OnceLock;

        let slot: Arc<OnceLock<Hub<String, String>>> = Arc::new(OnceLock::new());
        let reader = Arc::clone(&slot);
        let hub: Hub<String, String> = Hub::builder()
            .with_auto_prefix(move || {
                if let Some(hub) = reader.get() {
                    let _ = hub.listener_count("x");
                    let _ = hub.get_cache("x");
                }
                "page1".to_owned()
            })
            .build()
            .unwrap();
        assert!(slot.set(hub.clone()).is_ok());

        hub.on_with("x", |_: &String| {}, OnOptions::keyed("k"));
        hub.on_each(|_: &String, _: &String| {}, OnOptions::keyed("k"));
        hub.on_destroy(|| {}, Some("k"));

        assert!(hub.off("x", "k"));
        assert!(hub.off_each("k"));
        assert!(hub.off_destroy("k"));
        assert_eq!(hub.listener_count("x"), 0);
    }

    #[test]
    fn test_panicking_prefix_fn_leaves_hub_usable() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        let broken = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&broken);
        let hub: Hub<String, String> = Hub::builder()
            .with_auto_prefix(move || {
                assert!(!flag.load(Ordering::SeqCst), "prefix source failed");
                "page1".to_owned()
            })
            .build()
            .unwrap();
        hub.on_with("x", |_: &String| {}, OnOptions::keyed("k"));

        broken.store(true, Ordering::SeqCst);
        assert!(catch_unwind(AssertUnwindSafe(|| hub.off("x", "k"))).is_err());

        broken.store(false, Ordering::SeqCst);
        assert_eq!(hub.listener_count("x"), 1);
        assert!(hub.off("x", "k"));
    }

    #[test]
    fn test_hub_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Hub>();
        assert_send_sync::<Hub<u32, Option<String>>>();
    }
}
