//! Errors raised while decoding a single column value into a Rust type.
//!
//! These are recoverable from the caller's perspective (per spec.md §7, a
//! column-decoder failure does not invalidate the rest of the row or the
//! decoder stage it came from) — unlike [`crate::message::ProtocolError`],
//! nothing here ever poisons a [`crate::decoder::Decoder`].

use std::{num::ParseIntError, str::Utf8Error};

/// An error raised converting a column's raw bytes into a requested type.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The column's bytes were not valid UTF-8 text.
    #[error("column is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    /// A numeric text representation failed to parse.
    #[error("failed to parse {type_name} from {value:?}: {source}")]
    ParseInt {
        type_name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A floating-point text representation failed to parse.
    #[error("failed to parse {type_name} from {value:?}")]
    ParseFloat { type_name: &'static str, value: String },

    /// Neither `"t"` nor `"f"`.
    #[error("{0:?} is not a valid boolean (expected \"t\" or \"f\")")]
    InvalidBool(String),

    /// Missing the `\x` prefix, or an odd/invalid hex digit run.
    #[error("{0:?} is not a valid hex-encoded byte array (expected a \\x prefix)")]
    InvalidByteArray(String),

    /// A single-byte/single-character decode was handed more than one
    /// byte/character — the source accepts this silently; this codec does not.
    #[error("expected exactly one {unit}, found {actual}")]
    ExcessValue { unit: &'static str, actual: usize },

    /// A calendar date failed to parse against the expected `yyyy-MM-dd` format.
    #[error("{0:?} is not a valid yyyy-MM-dd date")]
    InvalidDate(String),

    /// An arbitrary-precision numeric (`rust_decimal`/`num-bigint`) failed to parse.
    #[error("failed to parse {type_name} from {value:?}")]
    ParseBigNumeric { type_name: &'static str, value: String },
}
