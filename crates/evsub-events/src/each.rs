//! Wildcard listeners.

use tracing::trace;

use crate::callback::{EachCallback, EachTarget, Target};
use crate::hub::{Hub, OnOptions};
use crate::key::{EACH_NAMESPACE, ListenerKey};
use crate::logger::LogKind;
use crate::value::{EventName, EventValue};

impl<N: EventName, V: EventValue> Hub<N, V> {
    /// Subscribe to every event.
    ///
    /// With `immediate` set, the callback first receives the latest value
    /// of every event triggered so far, one per event, ordered by when
    /// each event was last triggered.
    pub fn on_each(
        &self,
        callback: impl Into<EachCallback<N, V>>,
        options: OnOptions,
    ) -> ListenerKey {
        let callback = callback.into();
        let key = self.keys().scoped(&EACH_NAMESPACE, options.key.as_deref());

        let backlog = {
            let mut state = self.state();
            state.each.insert(key.clone(), callback.clone());
            if options.immediate {
                state.store.each_preserves()
            } else {
                Vec::new()
            }
        };

        trace!(key = %key, immediate = options.immediate, "Wildcard listener registered");
        self.journal().record(LogKind::OnEach, &key, || {
            format!("immediate: {}, replayed: {}", options.immediate, backlog.len())
        });

        for (name, value) in &backlog {
            callback.call(name, value);
        }
        key
    }

    /// Unsubscribe wildcard listeners.
    ///
    /// A key removes at most one listener, matched like [`Hub::off`]. A
    /// callback removes every registration of that handle. Returns whether
    /// anything was removed.
    pub fn off_each(&self, target: impl Into<EachTarget<N, V>>) -> bool {
        let removed = match target.into() {
            Target::Key(raw) => {
                let candidates = self.keys().candidates(&raw);
                let mut state = self.state();
                candidates
                    .iter()
                    .find_map(|key| state.each.remove_key(key.as_str()))
                    .into_iter()
                    .collect::<Vec<_>>()
            },
            Target::Callback(callback) => self.state().each.remove_all(|c| c.ptr_eq(&callback)),
        };

        for key in &removed {
            trace!(key = %key, "Wildcard listener removed");
            self.journal().record(LogKind::OffEach, key, String::new);
        }
        !removed.is_empty()
    }

    /// Number of registered wildcard listeners.
    #[must_use]
    pub fn each_count(&self) -> usize {
        self.state().each.len()
    }

    /// Broadcast a dispatched value to wildcard listeners and remember it
    /// for later immediate subscribers.
    pub(crate) fn trigger_each(&self, name: &N, value: &V) {
        let listeners = self.state().each.snapshot();
        if !listeners.is_empty() {
            self.journal().record(LogKind::TriggerEach, name, || {
                format!("listeners: {}", listeners.len())
            });
        }
        for (_, callback) in &listeners {
            callback.call(name, value);
        }
        self.state().store.mark_each(name.clone(), value.clone());
    }
}
