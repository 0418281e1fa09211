//! Listener keys and the dynamic naming prefix.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Pseudo-name used when generating wildcard listener keys.
pub(crate) const EACH_NAMESPACE: &str = "__each";

/// Pseudo-name used when generating destroy hook keys.
pub(crate) const DESTROY_NAMESPACE: &str = "__destroy";

/// Identifier of one registration inside a hub.
///
/// Returned by every registration method; pass it back to the matching
/// `off*` method to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerKey(String);

impl ListenerKey {
    /// View the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether a scoped teardown under `prefix` removes this key.
    ///
    /// Plain string prefix match: `page1` also covers `page10-…`.
    #[must_use]
    pub fn in_scope(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ListenerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ListenerKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListenerKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for ListenerKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl PartialEq<str> for ListenerKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ListenerKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Zero-argument function producing the active prefix.
pub type PrefixFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Generates listener keys.
///
/// The prefix function is evaluated on every call so that a caller can
/// switch scopes (pages, sessions, plugins) without rebuilding the hub.
pub(crate) struct KeyFactory {
    counter: AtomicU64,
    prefix: Option<PrefixFn>,
}

impl KeyFactory {
    pub(crate) fn new(prefix: Option<PrefixFn>) -> Self {
        Self {
            counter: AtomicU64::new(0),
            prefix,
        }
    }

    /// Current prefix; empty when no prefix function is configured.
    pub(crate) fn prefix(&self) -> String {
        self.prefix.as_ref().map(|f| f()).unwrap_or_default()
    }

    /// Build a key under the active prefix.
    pub(crate) fn scoped(&self, name: &dyn fmt::Display, explicit: Option<&str>) -> ListenerKey {
        let prefix = self.prefix();
        self.build(&prefix, name, explicit)
    }

    /// Stored keys a caller-supplied key may refer to, in match order.
    ///
    /// The prefixed form comes first. The literal key is added only when
    /// it already starts with `{prefix}-`, so a key returned by a
    /// registration in the active scope can be passed back unchanged
    /// while a short key never reaches another scope or a global listener.
    pub(crate) fn candidates(&self, explicit: &str) -> Vec<ListenerKey> {
        let prefix = self.prefix();
        let derived = self.build(&prefix, &"", Some(explicit));
        let owned = !prefix.is_empty()
            && explicit
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('-'));

        if owned {
            vec![derived, ListenerKey::from(explicit)]
        } else {
            vec![derived]
        }
    }

    /// Build a key that ignores the active prefix.
    pub(crate) fn global(&self, name: &dyn fmt::Display, explicit: Option<&str>) -> ListenerKey {
        self.build("", name, explicit)
    }

    fn build(&self, prefix: &str, name: &dyn fmt::Display, explicit: Option<&str>) -> ListenerKey {
        let raw = match (prefix.is_empty(), explicit) {
            (true, Some(key)) => key.to_owned(),
            (true, None) => format!("{name}-{}", self.next()),
            (false, Some(key)) => format!("{prefix}-{key}"),
            (false, None) => format!("{prefix}-{name}-{}", self.next()),
        };
        ListenerKey(raw)
    }

    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl fmt::Debug for KeyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFactory")
            .field("counter", &self.counter.load(Ordering::Relaxed))
            .field("has_prefix", &self.prefix.is_some())
            .finish()
    }
}
