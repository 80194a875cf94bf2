//! The character set used to decode/encode every string field on the wire.
//!
//! Postgres negotiates an encoding (`client_encoding`) once per session; the
//! codec never looks that up itself. Instead, every encode/decode operation
//! that touches a string takes a [`Charset`] as a plain parameter, per
//! section 3 of the protocol ("the charset is a parameter to every
//! encode/decode operation; it is not global state").
//!
//! Only UTF-8 is actually implemented here: it is what `client_encoding`
//! defaults to and what the overwhelming majority of servers run with, and
//! it is what every example driver in this crate's lineage hardcodes. A
//! `Charset` that names something else is accepted (so callers can still
//! plumb the server-reported `client_encoding` through unchanged) but
//! decoding rejects any byte sequence that is not valid UTF-8, the same as
//! if the server had claimed UTF-8.

use crate::message::error::ProtocolError;

/// A named character encoding, threaded through encode/decode calls instead
/// of being stored as global or connection-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static str);

impl Charset {
    /// The default Postgres client encoding, and the only one this codec
    /// can actually decode.
    pub const UTF8: Charset = Charset("UTF8");

    /// Build a charset from its Postgres name (e.g. as reported by a
    /// `ParameterStatus` message for `client_encoding`).
    pub const fn named(name: &'static str) -> Self {
        Self(name)
    }

    /// The Postgres name of this charset.
    pub const fn name(&self) -> &'static str {
        self.0
    }

    pub(crate) fn decode<'b>(&self, bytes: &'b [u8]) -> Result<&'b str, ProtocolError> {
        std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidEncoding { charset: self.0 })
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::UTF8
    }
}
