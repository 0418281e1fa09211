//! Trigger, replay and filters.

use std::borrow::Borrow;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, trace, warn};

use crate::error::{BoxError, HubError, HubResult};
use crate::hub::Hub;
use crate::logger::LogKind;
use crate::value::{EventName, EventValue};

/// Type-erased async transform applied to a value before dispatch.
pub type FilterFn<V> = Arc<dyn Fn(V) -> BoxFuture<'static, Result<V, BoxError>> + Send + Sync>;

impl<N: EventName, V: EventValue> Hub<N, V> {
    /// Dispatch a value to every listener of an event.
    ///
    /// Equivalent to [`Hub::trigger_with`] with `ignore_absent` unset.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Filter`] if the event's filter fails.
    pub async fn trigger(&self, name: impl Into<N>, value: V) -> HubResult<()> {
        self.trigger_with(name, value, false).await
    }

    /// Dispatch a value, optionally dropping absent results.
    ///
    /// The value first goes through the event's filter, if one is
    /// registered. When `ignore_absent` is set and the result is absent
    /// (see [`EventValue::is_absent`]) nothing else happens. Otherwise the
    /// result is cached, delivered to a snapshot of the listeners in
    /// registration order, appended to the history when the event is
    /// preserved, and finally broadcast to wildcard listeners.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Filter`] if the filter fails. Nothing is cached,
    /// delivered or preserved in that case.
    pub async fn trigger_with(
        &self,
        name: impl Into<N>,
        value: V,
        ignore_absent: bool,
    ) -> HubResult<()> {
        let name = name.into();

        let filter = self.state().filters.get(&name).cloned();
        let value = match filter {
            Some(filter) => filter(value).await.map_err(|source| {
                warn!(event = %name, error = %source, "Filter failed");
                HubError::Filter {
                    name: name.to_string(),
                    source,
                }
            })?,
            None => value,
        };

        if ignore_absent && value.is_absent() {
            trace!(event = %name, "Absent value ignored");
            return Ok(());
        }

        let (listeners, preserved) = {
            let mut state = self.state();
            state.store.set_cached(name.clone(), value.clone());
            (state.registry.snapshot(&name), state.store.is_preserved(&name))
        };

        trace!(event = %name, listeners = listeners.len(), "Dispatching event");
        if !preserved {
            self.journal().record(LogKind::Trigger, &name, || {
                format!("listeners: {}", listeners.len())
            });
        }

        for (_, callback) in &listeners {
            callback.call(&value);
        }

        if preserved {
            let total = self.state().store.mark_preserve(&name, value.clone());
            if let Some(total) = total {
                trace!(event = %name, total, "History appended");
                self.journal()
                    .record(LogKind::MarkPreserve, &name, || format!("total: {total}"));
            }
        }

        self.trigger_each(&name, &value);
        Ok(())
    }

    /// Deliver the cached value of an event to its current listeners again.
    ///
    /// Filters, history and wildcard listeners are not involved. Does
    /// nothing if the event was never triggered.
    pub fn replay<Q>(&self, name: &Q)
    where
        N: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        let (cached, listeners) = {
            let state = self.state();
            (state.store.cached(name), state.registry.snapshot(name))
        };
        let Some(value) = cached else {
            return;
        };

        trace!(event = %name, listeners = listeners.len(), "Replaying cached value");
        self.journal().record(LogKind::Replay, &name, || {
            format!("listeners: {}", listeners.len())
        });
        for (_, callback) in &listeners {
            callback.call(&value);
        }
    }

    /// Register the async transform for an event, replacing any earlier one.
    ///
    /// Only triggers that start after this call go through the new filter.
    pub fn add_filter<F, Fut, E>(&self, name: impl Into<N>, filter: F)
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let name = name.into();
        let erased: FilterFn<V> = Arc::new(move |value| {
            let fut = filter(value);
            async move { fut.await.map_err(Into::into) }.boxed()
        });

        let replaced = self
            .state()
            .filters
            .insert(name.clone(), erased)
            .is_some();
        debug!(event = %name, replaced, "Filter registered");
        self.journal()
            .record(LogKind::AddFilter, &name, || format!("replaced: {replaced}"));
    }

    /// Remove the filter of an event. Returns whether one was registered.
    pub fn remove_filter<Q>(&self, name: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        let removed = self.state().filters.remove(name).is_some();
        if removed {
            debug!(event = %name, "Filter removed");
        }
        removed
    }
}
