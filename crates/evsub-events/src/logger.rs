//! Operation log hook.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Kind of hub operation reported to the logger hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Hub constructed.
    Init,
    /// Filter registered.
    AddFilter,
    /// Listeners replayed from cache.
    Replay,
    /// Value dispatched.
    Trigger,
    /// Hub or scope destroyed.
    Destroy,
    /// Listener registered.
    On,
    /// Listener removed.
    Off,
    /// One-shot listener registered.
    Once,
    /// Conditional listener registered.
    OnceUntil,
    /// Listener registered with history replay.
    OnWithPreserve,
    /// History read.
    GetPreserve,
    /// Wildcard listener registered.
    OnEach,
    /// Wildcard listener removed.
    OffEach,
    /// Value broadcast to wildcard listeners.
    TriggerEach,
    /// Destroy hook registered.
    OnDestroy,
    /// Destroy hook removed.
    OffDestroy,
    /// History entry appended.
    MarkPreserve,
}

impl LogKind {
    /// Stable string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::AddFilter => "add_filter",
            Self::Replay => "replay",
            Self::Trigger => "trigger",
            Self::Destroy => "destroy",
            Self::On => "on",
            Self::Off => "off",
            Self::Once => "once",
            Self::OnceUntil => "once_until",
            Self::OnWithPreserve => "on_with_preserve",
            Self::GetPreserve => "get_preserve",
            Self::OnEach => "on_each",
            Self::OffEach => "off_each",
            Self::TriggerEach => "trigger_each",
            Self::OnDestroy => "on_destroy",
            Self::OffDestroy => "off_destroy",
            Self::MarkPreserve => "mark_preserve",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied observer of hub operations: `(kind, subject, detail)`.
///
/// The subject is usually the event name; for lifecycle operations it is
/// the active prefix or a fixed label. The hook runs inline and is not
/// guarded: a panicking logger aborts the operation that reported to it.
pub type LoggerFn = Arc<dyn Fn(LogKind, &str, &str) + Send + Sync>;

/// Forwards operation records to the optional logger hook.
#[derive(Clone, Default)]
pub(crate) struct Journal {
    hook: Option<LoggerFn>,
}

impl Journal {
    pub(crate) fn new(hook: Option<LoggerFn>) -> Self {
        Self { hook }
    }

    /// Forward a record to the logger hook, building the detail lazily.
    pub(crate) fn record(
        &self,
        kind: LogKind,
        subject: &dyn fmt::Display,
        detail: impl FnOnce() -> String,
    ) {
        if let Some(hook) = &self.hook {
            hook(kind, &subject.to_string(), &detail());
        }
    }
}

impl fmt::Debug for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Journal")
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}
