//! Format tags and the `FieldFormats` block shared by `Bind`/`FunctionCall`.

use bytes::{Buf, BufMut};

use super::error::ProtocolError;

/// Data transmission format for a parameter or result column.
///
/// As of Postgres 7.4 the only supported formats are text and binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Format code zero. No trailing NUL; the text format never allows
    /// embedded NULs.
    Text,
    /// Format code one. Integer binary representations use network byte
    /// order; other types are type-specific.
    Binary,
}

impl Format {
    pub const fn format_code(self) -> i16 {
        match self {
            Format::Text => 0,
            Format::Binary => 1,
        }
    }

    pub fn from_code(code: i16) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(Format::Text),
            1 => Ok(Format::Binary),
            other => Err(ProtocolError::UnsupportedFormatType(other)),
        }
    }
}

/// The per-column (or per-parameter) format block sent with `Bind` and
/// returned by `CopyInResponse`/`CopyOutResponse`/`CopyBothResponse`.
///
/// Encodes as:
/// - absent (`Default`): `[0: i16]`
/// - `Matched`: `[1: i16][format: i16]` — one format shared by every column
/// - `Mixed`: `[n: i16][formats: i16 * n]`
#[derive(Debug, Clone)]
pub enum FieldFormats {
    /// No format codes supplied; columns default to text.
    Default,
    /// A single format code applies to every column.
    Matched(Format, u16),
    /// An explicit format code per column.
    Mixed(Vec<Format>),
}

impl FieldFormats {
    pub fn len(&self) -> u16 {
        match self {
            FieldFormats::Default => 0,
            FieldFormats::Matched(_, count) => *count,
            FieldFormats::Mixed(formats) => formats.len() as u16,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn encode(&self, buf: &mut impl BufMut) {
        match self {
            FieldFormats::Default => buf.put_i16(0),
            FieldFormats::Matched(format, _) => {
                buf.put_i16(1);
                buf.put_i16(format.format_code());
            }
            FieldFormats::Mixed(formats) => {
                buf.put_i16(formats.len() as i16);
                for format in formats {
                    buf.put_i16(format.format_code());
                }
            }
        }
    }

    /// Parses the per-column format block carried by `CopyInResponse` and
    /// friends: an `i16` count followed by that many `i16` format codes.
    pub(crate) fn decode(mut body: impl Buf, count: u16) -> Result<Vec<Format>, ProtocolError> {
        (0..count).map(|_| Format::from_code(body.get_i16())).collect()
    }
}
