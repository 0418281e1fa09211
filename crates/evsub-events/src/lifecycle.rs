//! Destroy hooks and teardown.
//!
//! A hub built with an auto-prefix tears down only the active scope: the
//! registrations whose key was built under the current prefix. Without a
//! prefix, or when asked to ignore it, `destroy` clears every listener and
//! every remembered value.

use tracing::{debug, trace};

use crate::callback::{DestroyCallback, DestroyTarget, Target};
use crate::hub::Hub;
use crate::key::{DESTROY_NAMESPACE, ListenerKey};
use crate::logger::LogKind;
use crate::value::{EventName, EventValue};

/// Options for [`Hub::destroy_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyOptions {
    /// Tear down everything even when a prefix is active.
    pub ignore_prefix: bool,
}

impl DestroyOptions {
    /// Options for a full teardown regardless of the active prefix.
    #[must_use]
    pub fn ignoring_prefix() -> Self {
        Self {
            ignore_prefix: true,
        }
    }
}

impl<N: EventName, V: EventValue> Hub<N, V> {
    /// Register a hook to run when the hub, or the active scope, is
    /// destroyed.
    pub fn on_destroy(
        &self,
        callback: impl Into<DestroyCallback>,
        key: Option<&str>,
    ) -> ListenerKey {
        let key = self.keys().scoped(&DESTROY_NAMESPACE, key);
        self.state().destroy.insert(key.clone(), callback.into());

        trace!(key = %key, "Destroy hook registered");
        self.journal().record(LogKind::OnDestroy, &key, String::new);
        key
    }

    /// Remove destroy hooks.
    ///
    /// Same matching as [`Hub::off_each`]: a key removes one hook, a
    /// callback removes every registration of that handle.
    pub fn off_destroy(&self, target: impl Into<DestroyTarget>) -> bool {
        let removed = match target.into() {
            Target::Key(raw) => {
                let candidates = self.keys().candidates(&raw);
                let mut state = self.state();
                candidates
                    .iter()
                    .find_map(|key| state.destroy.remove_key(key.as_str()))
                    .into_iter()
                    .collect::<Vec<_>>()
            },
            Target::Callback(callback) => {
                self.state().destroy.remove_all(|c| c.ptr_eq(&callback))
            },
        };

        for key in &removed {
            trace!(key = %key, "Destroy hook removed");
            self.journal().record(LogKind::OffDestroy, key, String::new);
        }
        !removed.is_empty()
    }

    /// Number of registered destroy hooks.
    #[must_use]
    pub fn destroy_hook_count(&self) -> usize {
        self.state().destroy.len()
    }

    /// Tear down the active scope, or the whole hub when no prefix is set.
    pub fn destroy(&self) {
        self.destroy_with(DestroyOptions::default());
    }

    /// Tear down with explicit options.
    ///
    /// With a non-empty prefix and `ignore_prefix` unset, only per-event
    /// listeners, wildcard listeners and destroy hooks registered under
    /// that prefix are removed; the removed hooks then run. Cached values
    /// and history are kept.
    ///
    /// Otherwise every listener, wildcard listener, cached value and
    /// history entry is dropped, and every destroy hook runs once and is
    /// removed. Filters are kept in both cases.
    pub fn destroy_with(&self, options: DestroyOptions) {
        let prefix = self.current_prefix();
        let scoped = !prefix.is_empty() && !options.ignore_prefix;

        let (removed, hooks) = {
            let mut state = self.state();
            if scoped {
                let mut removed = state.registry.remove_scope(&prefix);
                removed.extend(state.each.drain_scope(&prefix).into_iter().map(|(k, _)| k));
                (removed, state.destroy.drain_scope(&prefix))
            } else {
                state.registry.clear();
                state.each.drain();
                state.store.clear();
                (Vec::new(), state.destroy.drain())
            }
        };

        if scoped {
            debug!(
                prefix = %prefix,
                listeners = removed.len(),
                hooks = hooks.len(),
                "Scope destroyed"
            );
            self.journal().record(LogKind::Destroy, &prefix, || {
                let keys: Vec<&str> = removed.iter().map(ListenerKey::as_str).collect();
                format!("eventKeys: {keys:?}")
            });
        } else {
            debug!(hooks = hooks.len(), "Hub destroyed");
            self.journal()
                .record(LogKind::Destroy, &"all", || format!("hooks: {}", hooks.len()));
        }

        for (_, hook) in &hooks {
            hook.call();
        }
    }

    /// Same as [`Hub::destroy`].
    pub fn reset(&self) {
        self.destroy();
    }
}
