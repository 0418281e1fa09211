//! Ordered key → callback storage shared by every namespace.

use crate::key::ListenerKey;

/// Ordered list of keyed registrations.
///
/// Insertion order is dispatch order. Keys are unique within one list.
#[derive(Debug)]
pub(crate) struct Slots<C> {
    entries: Vec<(ListenerKey, C)>,
}

impl<C> Default for Slots<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C: Clone> Slots<C> {
    /// Append a registration, dropping any previous one under the same key.
    pub(crate) fn insert(&mut self, key: ListenerKey, callback: C) {
        self.remove_key(key.as_str());
        self.entries.push((key, callback));
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_str() == key)
    }

    pub(crate) fn remove_key(&mut self, key: &str) -> Option<ListenerKey> {
        let index = self.entries.iter().position(|(k, _)| k.as_str() == key)?;
        Some(self.entries.remove(index).0)
    }

    /// Remove the first registration whose callback matches.
    pub(crate) fn remove_first(&mut self, matches: impl Fn(&C) -> bool) -> Option<ListenerKey> {
        let index = self.entries.iter().position(|(_, c)| matches(c))?;
        Some(self.entries.remove(index).0)
    }

    /// Remove every registration whose callback matches.
    pub(crate) fn remove_all(&mut self, matches: impl Fn(&C) -> bool) -> Vec<ListenerKey> {
        let (removed, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(_, c)| matches(c));
        self.entries = kept;
        removed.into_iter().map(|(k, _)| k).collect()
    }

    /// Remove and return every registration belonging to `prefix`.
    pub(crate) fn drain_scope(&mut self, prefix: &str) -> Vec<(ListenerKey, C)> {
        let (removed, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(k, _)| k.in_scope(prefix));
        self.entries = kept;
        removed
    }

    /// Remove and return every registration.
    pub(crate) fn drain(&mut self) -> Vec<(ListenerKey, C)> {
        std::mem::take(&mut self.entries)
    }

    /// Clone the registrations for lock-free dispatch.
    pub(crate) fn snapshot(&self) -> Vec<(ListenerKey, C)> {
        self.entries.clone()
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> impl Iterator<Item = &ListenerKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
