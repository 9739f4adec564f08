//! The get/set seam through which owners expose a var as a field.

/// A read/write delegate for a single value.
///
/// Owners hold a delegate per field and route the field's accessors through
/// it; the delegate decides where the value comes from. The trait is object
/// safe, so heterogeneous policies can sit behind `Box<dyn VarDelegate<T>>`.
///
/// ```rust
/// use propvar::{ThreadSafeLazyVar, TrackChangesVar, VarDelegate};
///
/// struct Settings {
///     name: Box<dyn VarDelegate<String> + Send + Sync>,
/// }
///
/// let lazy = Settings { name: Box::new(ThreadSafeLazyVar::new(|| "lazy".to_string())) };
/// let tracked = Settings { name: Box::new(TrackChangesVar::new(|| "live".to_string())) };
///
/// assert_eq!(lazy.name.get(), "lazy");
/// tracked.name.set("pinned".to_string());
/// assert_eq!(tracked.name.get(), "pinned");
/// ```
pub trait VarDelegate<T> {
    /// Reads the current value.
    fn get(&self) -> T;

    /// Writes a new value.
    fn set(&self, value: T);
}

impl<T, D: VarDelegate<T> + ?Sized> VarDelegate<T> for &D {
    #[inline]
    fn get(&self) -> T {
        (**self).get()
    }

    #[inline]
    fn set(&self, value: T) {
        (**self).set(value);
    }
}

impl<T, D: VarDelegate<T> + ?Sized> VarDelegate<T> for Box<D> {
    #[inline]
    fn get(&self) -> T {
        (**self).get()
    }

    #[inline]
    fn set(&self, value: T) {
        (**self).set(value);
    }
}

impl<T, D: VarDelegate<T> + ?Sized> VarDelegate<T> for std::sync::Arc<D> {
    #[inline]
    fn get(&self) -> T {
        (**self).get()
    }

    #[inline]
    fn set(&self, value: T) {
        (**self).set(value);
    }
}
