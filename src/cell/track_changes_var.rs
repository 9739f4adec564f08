//! `TrackChangesVar` - a var that mirrors a source until it is written.

use core::fmt;
use std::sync::RwLock;

use super::slot::{SharedSlot, Slot};
use super::traits::VarDelegate;
use crate::macros::trace_event;

/// A var that reads through to a source function until it is explicitly set.
///
/// Until the first [`set`](Self::set), every [`get`](Self::get) calls the
/// source and returns its current result; nothing is cached. After a `set`,
/// reads return the written value and the source is no longer consulted.
///
/// Reads of an unwritten var check an atomic flag and call the source without
/// taking any lock, so concurrent reads may each call it. Written values sit
/// behind a plain `RwLock`, one word of state per var.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use propvar::TrackChangesVar;
///
/// let counter = AtomicU32::new(0);
/// let tracked = TrackChangesVar::new(|| counter.fetch_add(1, Ordering::SeqCst) + 1);
/// assert_eq!(tracked.get(), 1);
/// assert_eq!(tracked.get(), 2);
///
/// tracked.set(100);
/// assert!(tracked.written());
/// assert_eq!(tracked.get(), 100);
/// ```
pub struct TrackChangesVar<T, F = fn() -> T> {
    slot: SharedSlot<T, RwLock<Slot<T>>>,
    source: F,
}

impl<T, F> TrackChangesVar<T, F> {
    /// Creates an unwritten var reading through to `source`.
    pub fn new(source: F) -> Self {
        Self {
            slot: SharedSlot::new(),
            source,
        }
    }

    /// Returns `true` once [`set`](Self::set) has been called.
    #[inline]
    pub fn written(&self) -> bool {
        self.slot.is_occupied()
    }

    /// Stores `value`; later reads return it instead of consulting the source.
    pub fn set(&self, value: T) {
        if !self.slot.store(value) {
            trace_event!(ty = core::any::type_name::<T>(), "tracked var detached from source");
        }
    }
}

impl<T, F> TrackChangesVar<T, F>
where
    T: Clone,
    F: Fn() -> T,
{
    /// Returns the written value, or the source's current value if unwritten.
    ///
    /// # Panics
    ///
    /// Propagates a panic from the source function.
    #[inline]
    pub fn get(&self) -> T {
        match self.slot.load() {
            Some(value) => value,
            None => {
                trace_event!(ty = core::any::type_name::<T>(), "tracked var read through to source");
                (self.source)()
            }
        }
    }
}

impl<T, E, F> TrackChangesVar<T, F>
where
    T: Clone,
    F: Fn() -> Result<T, E>,
{
    /// Returns the written value, or the result of a fallible source if unwritten.
    ///
    /// # Errors
    ///
    /// Returns the source's error unchanged. Written vars never fail.
    #[inline]
    pub fn try_get(&self) -> Result<T, E> {
        match self.slot.load() {
            Some(value) => Ok(value),
            None => {
                trace_event!(ty = core::any::type_name::<T>(), "tracked var read through to source");
                (self.source)()
            }
        }
    }
}

impl<T, F> VarDelegate<T> for TrackChangesVar<T, F>
where
    T: Clone,
    F: Fn() -> T,
{
    #[inline]
    fn get(&self) -> T {
        TrackChangesVar::get(self)
    }

    #[inline]
    fn set(&self, value: T) {
        TrackChangesVar::set(self, value);
    }
}

impl<T: fmt::Debug, F> fmt::Debug for TrackChangesVar<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackChangesVar")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_reads_through_until_set() {
        let counter = AtomicI32::new(0);
        let tracked = TrackChangesVar::new(|| counter.fetch_add(1, Ordering::SeqCst) + 1);
        assert!(!tracked.written());
        assert_eq!(tracked.get(), 1);
        assert_eq!(tracked.get(), 2);

        tracked.set(100);
        assert!(tracked.written());
        assert_eq!(tracked.get(), 100);
        assert_eq!(tracked.get(), 100);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_set_replaces_previous_write() {
        let tracked = TrackChangesVar::new(|| "source");
        tracked.set("one");
        tracked.set("two");
        assert_eq!(tracked.get(), "two");
    }

    #[test]
    fn test_written_absent_value_stops_read_through() {
        let tracked = TrackChangesVar::new(|| Some(1));
        assert_eq!(tracked.get(), Some(1));
        tracked.set(None);
        assert!(tracked.written());
        assert_eq!(tracked.get(), None);
    }

    #[test]
    fn test_try_get_surfaces_source_error() {
        let tracked = TrackChangesVar::new(|| "x".parse::<u8>());
        assert!(tracked.try_get().is_err());
        assert!(tracked.try_get().is_err());
        tracked.set(3);
        assert_eq!(tracked.try_get(), Ok(3));
    }

    #[test]
    fn test_debug_does_not_consult_source() {
        let tracked: TrackChangesVar<u8, _> = TrackChangesVar::new(|| -> u8 { panic!("must not run") });
        assert_eq!(format!("{tracked:?}"), "TrackChangesVar { slot: Empty, .. }");
    }
}
