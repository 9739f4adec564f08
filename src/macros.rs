//! Internal logging shim over `tracing`.

/// Emits a TRACE-level `tracing` event when the `tracing` feature is enabled.
///
/// Compiles to nothing otherwise, so the arguments are never evaluated.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::trace!($($arg)*);
        }
    };
}

pub(crate) use trace_event;
