//! The crate-level error and result alias.

use crate::message::ProtocolError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level failure of a fallible entry point into this crate.
///
/// Most of the codec's own operations already return [`ProtocolError`]
/// directly; this wrapper exists for the handful of entry points
/// (`AsyncReadStream`, the tokio-backed byte source) that also touch I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    #[cfg(feature = "tokio")]
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
