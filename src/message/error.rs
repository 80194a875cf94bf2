//! Errors raised while decoding a backend message.
//!
//! These are the fatal-to-the-decoder kinds from section 7: any of them
//! terminates the streaming decoder (see [`crate::decoder`]). There is
//! deliberately no partial recovery — once a frame fails to decode, the
//! byte position of the *next* frame is ambiguous, so continuing would
//! silently resynchronize on garbage.

/// An error raised while decoding bytes from the backend, or while
/// building a frontend message whose invariants the caller violated.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A frame's declared content length exceeds the configured `max_length`.
    #[error("message {code:?} of length {content_length} exceeds the configured maximum of {max_length}")]
    MessageTooLong {
        code: u8,
        content_length: u32,
        max_length: u32,
    },

    /// The backend sent a type byte this codec does not recognize.
    #[error("unsupported backend message type {0:?}")]
    UnsupportedMessageType(u8),

    /// Sub-kind of an `AuthenticationRequest` not in the closed accepted set.
    #[error("unsupported authentication method {0}")]
    UnsupportedAuthenticationMethod(u32),

    /// Byte following `SSLRequest` was neither `'S'` nor `'N'`.
    #[error("unsupported SSL negotiation reply {0:?}")]
    UnsupportedSSLReply(u8),

    /// Format tag outside `{0, 1}`.
    #[error("unsupported format type {0}")]
    UnsupportedFormatType(i16),

    /// Transaction status byte outside `{'I', 'T', 'E'}`.
    #[error("unsupported transaction status {0:?}")]
    UnsupportedTransactionStatus(u8),

    /// A `CopyInResponse`/`CopyOutResponse`/`CopyBothResponse` declared an
    /// overall format of Text while one or more per-column formats were Binary.
    #[error("copy response claims overall text format but columns {columns:?} are binary")]
    UnexpectedBinaryColumnFormat { columns: Vec<u16> },

    /// A null-terminated string field ran off the end of the buffer
    /// without a NUL byte — malformed framing, not a truncated read.
    #[error("string field is not null-terminated")]
    UnterminatedString,

    /// A string field's bytes were not valid for the given charset.
    #[error("field is not valid {charset} text")]
    InvalidEncoding { charset: &'static str },

    /// A `DataRow` column length was a negative value other than `-1`.
    #[error("column length {0} is negative but not the NULL sentinel -1")]
    MalformedColumnLength(i32),
}
