//! Per-event listener registry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::callback::Callback;
use crate::key::ListenerKey;
use crate::slots::Slots;
use crate::value::EventName;

/// Maps each event name to its ordered listeners.
#[derive(Debug)]
pub(crate) struct Registry<N, V> {
    listeners: HashMap<N, Slots<Callback<V>>>,
}

impl<N, V> Default for Registry<N, V> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<N: EventName, V> Registry<N, V> {
    pub(crate) fn insert(&mut self, name: N, key: ListenerKey, callback: Callback<V>) {
        self.listeners.entry(name).or_default().insert(key, callback);
    }

    #[cfg(test)]
    pub(crate) fn contains<Q>(&self, name: &Q, key: &str) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listeners
            .get(name)
            .is_some_and(|slots| slots.contains(key))
    }

    pub(crate) fn remove_key<Q>(&mut self, name: &Q, key: &str) -> Option<ListenerKey>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listeners.get_mut(name)?.remove_key(key)
    }

    pub(crate) fn remove_callback<Q>(&mut self, name: &Q, callback: &Callback<V>) -> Option<ListenerKey>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listeners
            .get_mut(name)?
            .remove_first(|c| c.ptr_eq(callback))
    }

    /// Listeners for `name` in registration order, detached from the registry.
    pub(crate) fn snapshot<Q>(&self, name: &Q) -> Vec<(ListenerKey, Callback<V>)>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listeners
            .get(name)
            .map(Slots::snapshot)
            .unwrap_or_default()
    }

    /// Remove every listener registered under `prefix`, across all names.
    pub(crate) fn remove_scope(&mut self, prefix: &str) -> Vec<ListenerKey> {
        let mut removed = Vec::new();
        for slots in self.listeners.values_mut() {
            removed.extend(slots.drain_scope(prefix).into_iter().map(|(k, _)| k));
        }
        self.listeners.retain(|_, slots| !slots.is_empty());
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
    }

    pub(crate) fn len<Q>(&self, name: &Q) -> usize
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listeners.get(name).map_or(0, Slots::len)
    }

    pub(crate) fn total(&self) -> usize {
        self.listeners.values().map(Slots::len).sum()
    }
}
