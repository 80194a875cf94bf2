//! Pluggable Column Decoders: the explicit capability contract spec.md §4.5
//! substitutes for the source's ambient/implicit conversions — a trait with
//! one method per `T`, no runtime registry, no reflection.

mod error;
mod impls;

pub use error::DecodeError;
pub use impls::ByteArray;

use bytes::Bytes;

use crate::charset::Charset;

/// A type decodable from a single non-NULL column value.
///
/// Implementations receive the column's raw text-format bytes and the
/// charset they were sent in; NULL handling lives one level up, in
/// [`decode_option`].
pub trait Decode: Sized {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError>;
}

/// The NULL-aware convenience the source calls `as-option-T`: `None` for a
/// NULL column, `Some(T::decode(..))` otherwise.
pub fn decode_option<T: Decode>(value: Option<Bytes>, charset: Charset) -> Result<Option<T>, DecodeError> {
    value.map(|bytes| T::decode(bytes, charset)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_option_passes_through_null() {
        assert_eq!(decode_option::<i32>(None, Charset::UTF8).unwrap(), None);
    }

    #[test]
    fn decode_option_decodes_present_value() {
        let value = Some(Bytes::from_static(b"7"));
        assert_eq!(decode_option::<i32>(value, Charset::UTF8).unwrap(), Some(7));
    }

    #[test]
    fn decode_option_surfaces_parse_failure() {
        let value = Some(Bytes::from_static(b"not-a-number"));
        assert!(decode_option::<i32>(value, Charset::UTF8).is_err());
    }
}
