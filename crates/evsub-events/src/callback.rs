//! Callback handles stored by the hub.
//!
//! Every callback is reference counted so that the same handle can be
//! registered and later passed back to an `off*` method; removal by
//! callback compares handles by pointer identity.

use std::fmt;
use std::sync::Arc;

use crate::key::ListenerKey;

/// Listener bound to a single event name.
pub struct Callback<V>(Arc<dyn Fn(&V) + Send + Sync>);

impl<V> Callback<V> {
    /// Wrap a closure into a listener handle.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&V) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the listener.
    pub fn call(&self, value: &V) {
        (self.0)(value);
    }

    /// Whether both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<V> Clone for Callback<V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<V> fmt::Debug for Callback<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").finish_non_exhaustive()
    }
}

impl<V, F> From<F> for Callback<V>
where
    F: Fn(&V) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Wildcard listener, notified for every dispatched event.
pub struct EachCallback<N, V>(Arc<dyn Fn(&N, &V) + Send + Sync>);

impl<N, V> EachCallback<N, V> {
    /// Wrap a closure into a wildcard listener handle.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&N, &V) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the listener.
    pub fn call(&self, name: &N, value: &V) {
        (self.0)(name, value);
    }

    /// Whether both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<N, V> Clone for EachCallback<N, V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<N, V> fmt::Debug for EachCallback<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EachCallback").finish_non_exhaustive()
    }
}

impl<N, V, F> From<F> for EachCallback<N, V>
where
    F: Fn(&N, &V) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Hook run when the hub, or the active prefix scope, is destroyed.
#[derive(Clone)]
pub struct DestroyCallback(Arc<dyn Fn() + Send + Sync>);

impl DestroyCallback {
    /// Wrap a closure into a destroy hook handle.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the hook.
    pub fn call(&self) {
        (self.0)();
    }

    /// Whether both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DestroyCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DestroyCallback").finish_non_exhaustive()
    }
}

impl<F> From<F> for DestroyCallback
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// What an `off*` call should remove: a registration key or a callback handle.
#[derive(Debug, Clone)]
pub enum Target<C> {
    /// Remove by key. The key is re-derived with the active prefix first.
    Key(String),
    /// Remove by callback identity.
    Callback(C),
}

impl<C> From<&str> for Target<C> {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl<C> From<String> for Target<C> {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl<C> From<ListenerKey> for Target<C> {
    fn from(key: ListenerKey) -> Self {
        Self::Key(key.into_string())
    }
}

impl<C> From<&ListenerKey> for Target<C> {
    fn from(key: &ListenerKey) -> Self {
        Self::Key(key.as_str().to_owned())
    }
}

impl<V> From<Callback<V>> for Target<Callback<V>> {
    fn from(callback: Callback<V>) -> Self {
        Self::Callback(callback)
    }
}

impl<V> From<&Callback<V>> for Target<Callback<V>> {
    fn from(callback: &Callback<V>) -> Self {
        Self::Callback(callback.clone())
    }
}

impl<N, V> From<EachCallback<N, V>> for Target<EachCallback<N, V>> {
    fn from(callback: EachCallback<N, V>) -> Self {
        Self::Callback(callback)
    }
}

impl<N, V> From<&EachCallback<N, V>> for Target<EachCallback<N, V>> {
    fn from(callback: &EachCallback<N, V>) -> Self {
        Self::Callback(callback.clone())
    }
}

impl From<DestroyCallback> for Target<DestroyCallback> {
    fn from(callback: DestroyCallback) -> Self {
        Self::Callback(callback)
    }
}

impl From<&DestroyCallback> for Target<DestroyCallback> {
    fn from(callback: &DestroyCallback) -> Self {
        Self::Callback(callback.clone())
    }
}

/// Removal target for per-name listeners.
pub type ListenerTarget<V> = Target<Callback<V>>;

/// Removal target for wildcard listeners.
pub type EachTarget<N, V> = Target<EachCallback<N, V>>;

/// Removal target for destroy hooks.
pub type DestroyTarget = Target<DestroyCallback>;
