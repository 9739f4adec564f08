//! Slot storage shared by the var holders.
//!
//! A slot is either `Empty` or `Occupied(value)`. Because the emptiness marker
//! lives in the discriminant, an absent value (`None` when `T = Option<U>`) is
//! stored as `Occupied(None)` and can never be mistaken for an empty slot.

use core::fmt;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crossbeam_utils::sync::{ShardedLock, ShardedLockReadGuard, ShardedLockWriteGuard};

/// Contents of a holder: nothing assigned yet, or an assigned value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot<T> {
    Empty,
    Occupied(T),
}

impl<T> Slot<T> {
    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// Wraps an assigned value so it is distinguishable from an empty slot.
#[inline]
pub(crate) fn mask<T>(value: T) -> Slot<T> {
    Slot::Occupied(value)
}

/// Returns the assigned value, or `None` if nothing was ever assigned.
#[inline]
pub(crate) fn unmask<T>(slot: &Slot<T>) -> Option<&T> {
    match slot {
        Slot::Empty => None,
        Slot::Occupied(value) => Some(value),
    }
}

/// Read/write lock backing a [`SharedSlot`].
///
/// Poisoning is ignored: no user code runs while a slot lock is held, so the
/// slot is always consistent.
pub(crate) trait SlotLock<T> {
    type Read<'a>: Deref<Target = Slot<T>>
    where
        Self: 'a;
    type Write<'a>: DerefMut<Target = Slot<T>>
    where
        Self: 'a;

    fn empty() -> Self;
    fn read_slot(&self) -> Self::Read<'_>;
    fn write_slot(&self) -> Self::Write<'_>;
}

/// Sharded backing: reads lock a per-thread shard, writes lock every shard.
impl<T> SlotLock<T> for ShardedLock<Slot<T>> {
    type Read<'a> = ShardedLockReadGuard<'a, Slot<T>> where Self: 'a;
    type Write<'a> = ShardedLockWriteGuard<'a, Slot<T>> where Self: 'a;

    fn empty() -> Self {
        ShardedLock::new(Slot::Empty)
    }

    #[inline]
    fn read_slot(&self) -> Self::Read<'_> {
        self.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write_slot(&self) -> Self::Write<'_> {
        self.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-word backing for write-heavy or numerous slots.
impl<T> SlotLock<T> for RwLock<Slot<T>> {
    type Read<'a> = RwLockReadGuard<'a, Slot<T>> where Self: 'a;
    type Write<'a> = RwLockWriteGuard<'a, Slot<T>> where Self: 'a;

    fn empty() -> Self {
        RwLock::new(Slot::Empty)
    }

    #[inline]
    fn read_slot(&self) -> Self::Read<'_> {
        self.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write_slot(&self) -> Self::Write<'_> {
        self.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A slot readable and writable from many threads.
///
/// `occupied` mirrors the slot state. It is raised with `Release` while the
/// write lock is held, after the value is in place, and never lowered, so an
/// `Acquire` load that sees `true` is followed by a read that finds the value.
/// Empty slots are answered from the flag alone, without touching the lock.
pub(crate) struct SharedSlot<T, L = ShardedLock<Slot<T>>> {
    occupied: AtomicBool,
    lock: L,
    _value: core::marker::PhantomData<fn() -> T>,
}

impl<T, L: SlotLock<T>> SharedSlot<T, L> {
    pub(crate) fn new() -> Self {
        Self {
            occupied: AtomicBool::new(false),
            lock: L::empty(),
            _value: core::marker::PhantomData,
        }
    }

    /// Returns `true` once a value has been stored. Never blocks.
    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Acquire)
    }

    /// Stores `value`, returning `true` if it replaced an earlier value.
    pub(crate) fn store(&self, value: T) -> bool {
        let mut slot = self.lock.write_slot();
        let replaced = slot.is_occupied();
        *slot = mask(value);
        self.occupied.store(true, Ordering::Release);
        replaced
    }

    /// Returns a clone of the stored value, if any.
    #[inline]
    pub(crate) fn load(&self) -> Option<T>
    where
        T: Clone,
    {
        if !self.is_occupied() {
            return None;
        }
        unmask(&self.lock.read_slot()).cloned()
    }

    /// Fills an empty slot with the result of `init`, one initializer at a time.
    ///
    /// `gate` serializes initializers; the slot lock itself is only held to
    /// publish the result, so `store` and `is_occupied` never wait on `init`.
    /// After the gate is taken the slot is checked again and, if another
    /// thread filled it, `init` is not called. A value stored while `init`
    /// ran is kept and `init`'s result is discarded. On `Err` or panic the
    /// slot stays empty and the gate is released.
    pub(crate) fn occupy_with<E, I>(&self, gate: &Mutex<()>, init: I) -> Result<Loaded<T>, E>
    where
        T: Clone,
        I: FnOnce() -> Result<T, E>,
    {
        let _gate = gate.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.load() {
            return Ok(Loaded::Raced(value));
        }
        let value = init()?;

        let mut slot = self.lock.write_slot();
        if let Some(current) = unmask(&slot) {
            return Ok(Loaded::Raced(current.clone()));
        }
        *slot = mask(value.clone());
        self.occupied.store(true, Ordering::Release);
        Ok(Loaded::Initialized(value))
    }
}

/// Outcome of [`SharedSlot::occupy_with`].
pub(crate) enum Loaded<T> {
    /// This call ran the initializer and published its value.
    Initialized(T),
    /// The slot was filled elsewhere, before or while this call waited.
    Raced(T),
}

impl<T: fmt::Debug, L: SlotLock<T>> fmt::Debug for SharedSlot<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match unmask(&self.lock.read_slot()) {
            Some(value) => f.debug_tuple("Occupied").field(value).finish(),
            None => f.write_str("Empty"),
        }
    }
}
