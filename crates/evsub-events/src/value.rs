//! Bounds for event names and emitted values.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Identifier of a logical event channel.
///
/// Any cloneable, hashable, displayable type qualifies. The display form
/// is used when listener keys are generated.
pub trait EventName: Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static {}

impl<T> EventName for T where T: Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static {}

/// A value that can be emitted through the hub.
///
/// `is_absent` decides whether a triggered value is dropped when the
/// caller asks for absent values to be ignored.
pub trait EventValue: Clone + Send + Sync + 'static {
    /// Whether this value counts as "no value".
    fn is_absent(&self) -> bool {
        false
    }
}

impl EventValue for serde_json::Value {
    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl<T> EventValue for Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T> EventValue for Arc<T> where T: Send + Sync + ?Sized + 'static {}

impl<T> EventValue for Vec<T> where T: Clone + Send + Sync + 'static {}

macro_rules! present_values {
    ($($ty:ty),* $(,)?) => {
        $(impl EventValue for $ty {})*
    };
}

present_values!(
    (),
    bool,
    char,
    String,
    &'static str,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);
