//! Var holders and the slot they store into.
//!
//! - `slot` is the crate-private empty/occupied storage shared by both holders.
//! - `lazy_var` and `track_changes_var` are the two read/write policies.
//! - `traits` is the accessor seam owners program against.

mod slot;

pub mod lazy_var;
pub mod track_changes_var;
pub mod traits;

pub use lazy_var::ThreadSafeLazyVar;
pub use track_changes_var::TrackChangesVar;
pub use traits::VarDelegate;
