//! `ThreadSafeLazyVar` - a var computed once on first read, overridable with `set`.

use core::fmt;
use std::sync::Mutex;

use super::slot::{Loaded, SharedSlot};
use super::traits::VarDelegate;
use crate::macros::trace_event;

/// A thread-safe, lazily initialized var.
///
/// The initializer runs on the first [`get`](Self::get), at most once per
/// successful initialization, no matter how many threads race on that first
/// read. Threads arriving while it runs block until it finishes and then see
/// its value. Later reads only take a shard read lock.
///
/// [`initialized`](Self::initialized) and [`set`](Self::set) never wait for a
/// running initializer.
///
/// If the initializer fails (panics, or returns `Err` through
/// [`try_get`](Self::try_get)) the var stays uninitialized and the next read
/// runs it again. Failures are never cached.
///
/// [`set`](Self::set) overwrites the value at any time, initialized or not. A
/// value set while the initializer runs wins over the initializer's result.
///
/// The initializer may call `set` and `initialized` on its own var, but not
/// `get` or `try_get`.
///
/// # Example
///
/// ```rust
/// use propvar::ThreadSafeLazyVar;
///
/// let lazy = ThreadSafeLazyVar::new(|| 42);
/// assert!(!lazy.initialized());
/// assert_eq!(lazy.get(), 42);
/// assert!(lazy.initialized());
///
/// lazy.set(7);
/// assert_eq!(lazy.get(), 7);
/// ```
pub struct ThreadSafeLazyVar<T, F = fn() -> T> {
    slot: SharedSlot<T>,
    init_lock: Mutex<()>,
    init: F,
}

impl<T, F> ThreadSafeLazyVar<T, F> {
    /// Creates an uninitialized var backed by `init`.
    pub fn new(init: F) -> Self {
        Self {
            slot: SharedSlot::new(),
            init_lock: Mutex::new(()),
            init,
        }
    }

    /// Returns `true` once a value is stored, either computed or `set`.
    ///
    /// Never runs the initializer and never blocks.
    #[inline]
    pub fn initialized(&self) -> bool {
        self.slot.is_occupied()
    }

    /// Stores `value`, replacing any computed or previously set value.
    ///
    /// Does not wait for a running initializer; the initializer's result is
    /// discarded and readers blocked on it observe this value instead.
    pub fn set(&self, value: T) {
        if self.slot.store(value) {
            trace_event!(ty = core::any::type_name::<T>(), "lazy var value replaced");
        }
    }
}

impl<T, F> ThreadSafeLazyVar<T, F>
where
    T: Clone,
    F: Fn() -> T,
{
    /// Returns the value, running the initializer if nothing is stored yet.
    ///
    /// # Panics
    ///
    /// Propagates a panic from the initializer. The var stays uninitialized.
    #[inline]
    pub fn get(&self) -> T {
        if let Some(value) = self.slot.load() {
            return value;
        }
        match self.get_slow(|| Ok::<T, core::convert::Infallible>((self.init)())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<T, E, F> ThreadSafeLazyVar<T, F>
where
    T: Clone,
    F: Fn() -> Result<T, E>,
{
    /// Returns the value, running a fallible initializer if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns the initializer's error unchanged. The var stays uninitialized,
    /// so the next call tries again.
    #[inline]
    pub fn try_get(&self) -> Result<T, E> {
        if let Some(value) = self.slot.load() {
            return Ok(value);
        }
        self.get_slow(&self.init)
    }
}

impl<T: Clone, F> ThreadSafeLazyVar<T, F> {
    #[cold]
    fn get_slow<E>(&self, init: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        trace_event!(ty = core::any::type_name::<T>(), "lazy var initializing");
        match self.slot.occupy_with(&self.init_lock, init) {
            Ok(Loaded::Initialized(value)) => {
                trace_event!(ty = core::any::type_name::<T>(), "lazy var initialized");
                Ok(value)
            }
            Ok(Loaded::Raced(value)) => {
                trace_event!(ty = core::any::type_name::<T>(), "lazy var filled while waiting to initialize");
                Ok(value)
            }
            Err(err) => {
                trace_event!(ty = core::any::type_name::<T>(), "lazy var initializer failed");
                Err(err)
            }
        }
    }
}

impl<T, F> VarDelegate<T> for ThreadSafeLazyVar<T, F>
where
    T: Clone,
    F: Fn() -> T,
{
    #[inline]
    fn get(&self) -> T {
        ThreadSafeLazyVar::get(self)
    }

    #[inline]
    fn set(&self, value: T) {
        ThreadSafeLazyVar::set(self, value);
    }
}

impl<T: Default> Default for ThreadSafeLazyVar<T, fn() -> T> {
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for ThreadSafeLazyVar<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSafeLazyVar")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_get_then_set() {
        let lazy = ThreadSafeLazyVar::new(|| 42);
        assert!(!lazy.initialized());
        assert_eq!(lazy.get(), 42);
        assert!(lazy.initialized());
        lazy.set(7);
        assert_eq!(lazy.get(), 7);
    }

    #[test]
    fn test_initializer_runs_once() {
        let calls = AtomicUsize::new(0);
        let lazy = ThreadSafeLazyVar::new(|| calls.fetch_add(1, Ordering::SeqCst) + 10);
        assert_eq!(lazy.get(), 10);
        assert_eq!(lazy.get(), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_before_get_skips_initializer() {
        let lazy = ThreadSafeLazyVar::new(|| -> String { panic!("must not run") });
        lazy.set("preset".to_string());
        assert!(lazy.initialized());
        assert_eq!(lazy.get(), "preset");
    }

    #[test]
    fn test_stores_absent_value() {
        let calls = AtomicUsize::new(0);
        let lazy = ThreadSafeLazyVar::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            None::<u32>
        });
        assert_eq!(lazy.get(), None);
        assert!(lazy.initialized());
        assert_eq!(lazy.get(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_initializer_retries() {
        let calls = AtomicUsize::new(0);
        let lazy = ThreadSafeLazyVar::new(|| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first attempt fails");
            }
            5
        });

        let first = panic::catch_unwind(AssertUnwindSafe(|| lazy.get()));
        assert!(first.is_err());
        assert!(!lazy.initialized());

        assert_eq!(lazy.get(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_try_get_error_is_not_cached() {
        let calls = AtomicUsize::new(0);
        let lazy = ThreadSafeLazyVar::new(|| match calls.fetch_add(1, Ordering::SeqCst) {
            0 => Err("not ready"),
            n => Ok(n),
        });
        assert_eq!(lazy.try_get(), Err("not ready"));
        assert!(!lazy.initialized());
        assert_eq!(lazy.try_get(), Ok(1));
        assert_eq!(lazy.try_get(), Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_and_debug() {
        let lazy: ThreadSafeLazyVar<u8> = ThreadSafeLazyVar::default();
        assert_eq!(format!("{lazy:?}"), "ThreadSafeLazyVar { slot: Empty, .. }");
        assert_eq!(lazy.get(), 0);
        assert_eq!(format!("{lazy:?}"), "ThreadSafeLazyVar { slot: Occupied(0), .. }");
    }
}
