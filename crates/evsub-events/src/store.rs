//! Result cache, bounded history, and wildcard replay list.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use crate::value::{EventName, EventValue};

/// Default cap on the number of history entries kept per event.
pub const DEFAULT_PRESERVE_LIMIT: usize = 500;

/// Values remembered for late subscribers.
#[derive(Debug)]
pub(crate) struct ResultStore<N, V> {
    /// Last dispatched value per event.
    cache: HashMap<N, V>,
    /// Events whose full history is kept.
    preserve: HashSet<N>,
    /// Maximum number of history entries per event.
    limit: usize,
    /// History per allowlisted event, oldest first.
    history: HashMap<N, VecDeque<V>>,
    /// Latest value per event for wildcard replay, ordered by last trigger.
    each_preserves: Vec<(N, V)>,
}

impl<N: EventName, V: EventValue> ResultStore<N, V> {
    pub(crate) fn new(preserve: impl IntoIterator<Item = N>, limit: usize) -> Self {
        Self {
            cache: HashMap::new(),
            preserve: preserve.into_iter().collect(),
            limit,
            history: HashMap::new(),
            each_preserves: Vec::new(),
        }
    }

    pub(crate) fn cached<Q>(&self, name: &Q) -> Option<V>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.get(name).cloned()
    }

    pub(crate) fn set_cached(&mut self, name: N, value: V) {
        self.cache.insert(name, value);
    }

    pub(crate) fn remove_cached<Q>(&mut self, name: &Q) -> Option<V>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.remove(name)
    }

    pub(crate) fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub(crate) fn is_preserved(&self, name: &N) -> bool {
        self.preserve.contains(name)
    }

    /// Append to the history of an allowlisted event.
    ///
    /// Returns the history length after the append, or `None` when the
    /// event is not allowlisted.
    pub(crate) fn mark_preserve(&mut self, name: &N, value: V) -> Option<usize> {
        if !self.preserve.contains(name) {
            return None;
        }
        let entries = self.history.entry(name.clone()).or_default();
        while entries.len() >= self.limit && !entries.is_empty() {
            entries.pop_front();
        }
        entries.push_back(value);
        Some(entries.len())
    }

    pub(crate) fn history<Q>(&self, name: &Q) -> Vec<V>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.history
            .get(name)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Record the latest value for wildcard replay, replacing any older entry.
    pub(crate) fn mark_each(&mut self, name: N, value: V) {
        self.each_preserves.retain(|(n, _)| *n != name);
        self.each_preserves.push((name, value));
    }

    pub(crate) fn each_preserves(&self) -> Vec<(N, V)> {
        self.each_preserves.clone()
    }

    /// Drop every remembered value. The allowlist and limit are kept.
    pub(crate) fn clear(&mut self) {
        self.cache.clear();
        self.history.clear();
        self.each_preserves.clear();
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }
}
