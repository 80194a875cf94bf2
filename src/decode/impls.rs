//! Built-in column decoders for the primitive types named in spec.md §4.5.
//!
//! Every decoder here is a string decode chained with a parse step — the
//! pattern this corpus's raw-row drivers use throughout (`qs/src/decode.rs`
//! decodes `i32`/`String` the same way, just without the string-then-parse
//! indirection since `i32` there is fixed-width binary). Postgres's simple
//! query protocol sends everything as text, so parsing through `str` is the
//! general case; this codec does not attempt a binary fast path.

use bytes::Bytes;

use super::{Decode, DecodeError};
use crate::charset::Charset;

fn decode_str(value: &Bytes, charset: Charset) -> Result<&str, DecodeError> {
    let _ = charset; // only UTF-8 is actually decoded, per `Charset`'s own contract
    Ok(std::str::from_utf8(value)?)
}

macro_rules! parse_int {
    ($($ty:ty),* $(,)?) => {$(
        impl Decode for $ty {
            fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
                let text = decode_str(&value, charset)?;
                text.parse().map_err(|source| DecodeError::ParseInt {
                    type_name: stringify!($ty),
                    value: text.to_owned(),
                    source,
                })
            }
        }
    )*};
}

parse_int!(i16, i32, i64);

macro_rules! parse_float {
    ($($ty:ty),* $(,)?) => {$(
        impl Decode for $ty {
            fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
                let text = decode_str(&value, charset)?;
                text.parse().map_err(|_| DecodeError::ParseFloat {
                    type_name: stringify!($ty),
                    value: text.to_owned(),
                })
            }
        }
    )*};
}

parse_float!(f32, f64);

impl Decode for String {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        Ok(decode_str(&value, charset)?.to_owned())
    }
}

/// `"t"`/`"f"`, the wire representation of `bool` in text format.
impl Decode for bool {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        match decode_str(&value, charset)? {
            "t" => Ok(true),
            "f" => Ok(false),
            other => Err(DecodeError::InvalidBool(other.to_owned())),
        }
    }
}

/// A single byte. The source's `ByteDecoder` silently truncates a
/// multi-byte payload to its first byte; per spec.md §9 Open Questions,
/// this codec fails instead.
impl Decode for u8 {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        let _ = charset;
        if value.len() != 1 {
            return Err(DecodeError::ExcessValue { unit: "byte", actual: value.len() });
        }
        Ok(value[0])
    }
}

/// A single character. Same excess-payload rule as the byte decoder, but
/// counted in Unicode scalar values rather than bytes.
impl Decode for char {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        let text = decode_str(&value, charset)?;
        let mut chars = text.chars();
        let first = chars.next();
        if chars.next().is_some() || first.is_none() {
            return Err(DecodeError::ExcessValue { unit: "character", actual: text.chars().count() });
        }
        Ok(first.unwrap())
    }
}

/// Postgres's `\x`-prefixed hex byte-array text format (`bytea`).
pub struct ByteArray(pub Vec<u8>);

impl Decode for ByteArray {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        let text = decode_str(&value, charset)?;
        let hex = text
            .strip_prefix("\\x")
            .ok_or_else(|| DecodeError::InvalidByteArray(text.to_owned()))?;

        if hex.len() % 2 != 0 {
            return Err(DecodeError::InvalidByteArray(text.to_owned()));
        }

        let mut bytes = Vec::with_capacity(hex.len() / 2);
        for pair in hex.as_bytes().chunks_exact(2) {
            let byte = std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| DecodeError::InvalidByteArray(text.to_owned()))?;
            bytes.push(byte);
        }
        Ok(ByteArray(bytes))
    }
}

#[cfg(feature = "time")]
impl Decode for time::Date {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        const FORMAT: &[time::format_description::FormatItem<'_>] =
            time::macros::format_description!("[year]-[month]-[day]");
        let text = decode_str(&value, charset)?;
        time::Date::parse(text, FORMAT).map_err(|_| DecodeError::InvalidDate(text.to_owned()))
    }
}

#[cfg(feature = "rust_decimal")]
impl Decode for rust_decimal::Decimal {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        let text = decode_str(&value, charset)?;
        text.parse().map_err(|_| DecodeError::ParseBigNumeric {
            type_name: "Decimal",
            value: text.to_owned(),
        })
    }
}

#[cfg(feature = "num-bigint")]
impl Decode for num_bigint::BigInt {
    fn decode(value: Bytes, charset: Charset) -> Result<Self, DecodeError> {
        let text = decode_str(&value, charset)?;
        text.parse().map_err(|_| DecodeError::ParseBigNumeric {
            type_name: "BigInt",
            value: text.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i32_parses_decimal_text() {
        assert_eq!(i32::decode(Bytes::from_static(b"-42"), Charset::UTF8).unwrap(), -42);
    }

    #[test]
    fn bool_accepts_t_and_f_only() {
        assert!(bool::decode(Bytes::from_static(b"t"), Charset::UTF8).unwrap());
        assert!(!bool::decode(Bytes::from_static(b"f"), Charset::UTF8).unwrap());
        assert!(bool::decode(Bytes::from_static(b"true"), Charset::UTF8).is_err());
    }

    #[test]
    fn byte_rejects_more_than_one_byte() {
        assert!(matches!(
            u8::decode(Bytes::from_static(b"ab"), Charset::UTF8),
            Err(DecodeError::ExcessValue { unit: "byte", actual: 2 })
        ));
        assert_eq!(u8::decode(Bytes::from_static(b"a"), Charset::UTF8).unwrap(), b'a');
    }

    #[test]
    fn char_rejects_more_than_one_scalar_value() {
        assert!(char::decode(Bytes::from_static("äb".as_bytes()), Charset::UTF8).is_err());
        assert_eq!(char::decode(Bytes::from_static("ä".as_bytes()), Charset::UTF8).unwrap(), 'ä');
    }

    #[test]
    fn byte_array_decodes_hex_pairs() {
        let ByteArray(bytes) = ByteArray::decode(Bytes::from_static(b"\\x00ff7f"), Charset::UTF8).unwrap();
        assert_eq!(bytes, vec![0x00, 0xff, 0x7f]);
    }

    #[test]
    fn byte_array_requires_prefix() {
        assert!(ByteArray::decode(Bytes::from_static(b"00ff"), Charset::UTF8).is_err());
    }

    #[test]
    fn byte_array_rejects_odd_length_hex() {
        assert!(ByteArray::decode(Bytes::from_static(b"\\x0"), Charset::UTF8).is_err());
    }
}
