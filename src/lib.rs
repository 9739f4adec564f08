//! # `propvar` - Thread-Safe Property Delegates
//!
//! Two small holders for routing a field's reads and writes through a policy
//! object, safe to share across threads.
//!
//! ## Holders
//!
//! 1. **`ThreadSafeLazyVar<T, F>`**:
//!    - Computes its value on first read, exactly once per successful init
//!    - Concurrent first readers block until the single initializer finishes
//!    - Failed initialization is retried on the next read, never cached
//!    - `set` overrides the value at any time
//!
//! 2. **`TrackChangesVar<T, F>`**:
//!    - Reads through to a source function until written
//!    - After `set`, returns the last written value
//!    - `written()` reports whether the source has been detached
//!
//! Both store their value in a slot that is either empty or occupied, so an
//! absent value (`None` for `T = Option<U>`) is a legitimate stored value and
//! never reads as "not yet set".
//!
//! ## Concurrency
//!
//! Every slot carries an atomic "occupied" flag, so `initialized()`,
//! `written()` and reads of an empty slot never take a lock. The lazy var
//! keeps its value behind a [`crossbeam_utils::sync::ShardedLock`], whose
//! readers lock a per-thread shard and do not contend; the tracked var uses a
//! plain `RwLock`. Initializers are serialized by a separate mutex and run
//! with the slot unlocked, so `set` never waits on them. A panic inside an
//! initializer leaves the slot empty and the next read retries.
//!
//! ## Features
//!
//! - `tracing`: emits TRACE events for lazy initialization and overrides.
//!
//! ## Example
//!
//! ```rust
//! use propvar::{ThreadSafeLazyVar, TrackChangesVar};
//!
//! let lazy = ThreadSafeLazyVar::new(|| 42);
//! assert_eq!(lazy.get(), 42);
//! assert!(lazy.initialized());
//! lazy.set(7);
//! assert_eq!(lazy.get(), 7);
//!
//! let source = std::sync::atomic::AtomicUsize::new(0);
//! let tracked = TrackChangesVar::new(|| source.load(std::sync::atomic::Ordering::Relaxed));
//! assert!(!tracked.written());
//! tracked.set(100);
//! assert_eq!(tracked.get(), 100);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod macros;

pub mod cell;

pub use cell::{ThreadSafeLazyVar, TrackChangesVar, VarDelegate};

// Compile-time assertions for thread-safety
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<ThreadSafeLazyVar<u64>>();
    assert_send_sync::<TrackChangesVar<u64>>();
    assert_send_sync::<ThreadSafeLazyVar<std::sync::Arc<str>>>();
    assert_send_sync::<TrackChangesVar<Option<String>>>();
};
