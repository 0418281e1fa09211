//! Recording helpers for listeners and hooks.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Collects values pushed from listeners, in call order.
///
/// Clones share the same buffer, so a clone can be moved into a callback
/// while the test keeps the original for assertions. A listener that
/// panicked while holding the buffer does not poison later reads.
pub struct Recorder<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Recorder<T> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a value.
    pub fn push(&self, value: T) {
        self.entries().push(value);
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.entries())
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of recorded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<T: Clone> Recorder<T> {
    /// Copy of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries().clone()
    }
}

impl<T: Clone + Send + 'static> Recorder<T> {
    /// A listener closure that records a clone of every value it receives.
    #[must_use]
    pub fn listener(&self) -> impl Fn(&T) + Send + Sync + 'static {
        let recorder = self.clone();
        move |value: &T| recorder.push(value.clone())
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Recorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("entries", &*self.entries())
            .finish()
    }
}

/// Settable prefix source for hubs built with an auto-prefix.
///
/// Pass [`PrefixSwitch::source`] to the hub builder, then call
/// [`PrefixSwitch::set`] to move between scopes.
#[derive(Debug, Clone, Default)]
pub struct PrefixSwitch {
    current: Arc<Mutex<String>>,
}

impl PrefixSwitch {
    /// Start with an empty prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given prefix.
    #[must_use]
    pub fn starting_at(prefix: impl Into<String>) -> Self {
        let switch = Self::new();
        switch.set(prefix);
        switch
    }

    /// Change the active prefix.
    pub fn set(&self, prefix: impl Into<String>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = prefix.into();
    }

    /// The active prefix.
    #[must_use]
    pub fn get(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Closure returning the active prefix.
    #[must_use]
    pub fn source(&self) -> impl Fn() -> String + Send + Sync + 'static {
        let switch = self.clone();
        move || switch.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_shares_buffer() {
        let recorder = Recorder::new();
        let clone = recorder.clone();
        clone.push(1);
        clone.push(2);

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.snapshot(), vec![1, 2]);
        assert_eq!(recorder.take(), vec![1, 2]);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_listener_records_clones() {
        let recorder: Recorder<String> = Recorder::new();
        let listener = recorder.listener();
        listener(&"a".to_owned());
        listener(&"b".to_owned());
        assert_eq!(recorder.take(), vec!["a", "b"]);
    }

    #[test]
    fn test_prefix_switch() {
        let switch = PrefixSwitch::starting_at("page1");
        let source = switch.source();
        assert_eq!(source(), "page1");

        switch.set("page2");
        assert_eq!(source(), "page2");
        assert_eq!(switch.get(), "page2");
    }
}
