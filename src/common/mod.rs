//! Supporting utility types shared across the codec.

mod bytestr;

pub use bytestr::ByteStr;

/// Emits a trace-level log line through whichever backend is enabled
/// (`log` and/or `verbose`/`tracing`); a no-op if neither is.
macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")] log::trace!($($tt)*);
        #[cfg(feature = "verbose")] tracing::trace!($($tt)*);
    };
}

pub(crate) use trace;
