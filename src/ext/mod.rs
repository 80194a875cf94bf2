//! Byte codec primitives.
//!
//! Big-endian fixed-width integers are read/written directly through
//! [`bytes::Buf`]/[`bytes::BufMut`] (which are big-endian by convention for
//! every `get_*`/`put_*` method used here) rather than reinventing them.
//! What is left is Postgres-specific: null-terminated strings and the
//! length-prefixing convention shared by every frontend/backend frame.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{charset::Charset, common::ByteStr, message::error::ProtocolError};

/// A PostgreSQL object identifier, as carried in `RowDescription`/`ParameterDescription`.
pub type Oid = u32;

/// Postgres integer widths are a frequent source of off-by-one casts; these
/// helpers make the narrowing explicit and panic (rather than silently
/// wrap) on overflow, since a message that large could never have been
/// meant for the wire.
pub trait UsizeExt {
    fn to_u32(self) -> u32;
    fn to_u16(self) -> u16;
    fn to_i32(self) -> i32;
    fn to_i16(self) -> i16;
}

impl UsizeExt for usize {
    fn to_u32(self) -> u32 {
        self.try_into().expect("message size too large for protocol")
    }

    fn to_u16(self) -> u16 {
        self.try_into().expect("message size too large for protocol")
    }

    fn to_i32(self) -> i32 {
        self.try_into().expect("message size too large for protocol")
    }

    fn to_i16(self) -> i16 {
        self.try_into().expect("message size too large for protocol")
    }
}

pub trait StrExt {
    /// Length of this string once written as a null-terminated Postgres string.
    fn nul_string_len(&self) -> u32;
}

impl StrExt for str {
    fn nul_string_len(&self) -> u32 {
        self.len().to_u32() + 1 /* nul */
    }
}

pub trait BufMutExt {
    /// Writes a Postgres null-terminated string.
    fn put_nul_string(&mut self, string: &str);

    /// Writes a length-prefixed byte run: an `i32` of `bytes.len() + 4`
    /// followed by `bytes` itself, per section 4.1's length-prefixing helper.
    fn put_length_prefixed(&mut self, bytes: &[u8]);
}

impl<B: BufMut> BufMutExt for B {
    fn put_nul_string(&mut self, string: &str) {
        self.put(string.as_bytes());
        self.put_u8(b'\0');
    }

    fn put_length_prefixed(&mut self, bytes: &[u8]) {
        self.put_i32(bytes.len().to_i32() + 4);
        self.put(bytes);
    }
}

/// Reading helpers over a [`Bytes`]/[`BytesMut`] cursor.
///
/// `get_nul_bytes`/`get_nul_bytestr` fail rather than panic when no NUL
/// terminator is found in the remaining buffer — deliberately stricter than
/// the teacher's original `.expect(...)`, per the framing-error contract
/// this codec commits to for malformed input (see `ProtocolError::UnterminatedString`).
///
/// `get_nul_bytestr` takes the connection's [`Charset`] and decodes through
/// it rather than assuming UTF-8, per spec.md §4.1's Byte Codec Primitives
/// contract (a null-terminated-string reader parameterized by charset).
pub trait BytesExt: Sized {
    fn get_nul_bytes(&mut self) -> Result<Self, ProtocolError>;

    fn get_nul_bytestr(&mut self, charset: Charset) -> Result<ByteStr, ProtocolError>;
}

impl BytesExt for Bytes {
    fn get_nul_bytes(&mut self) -> Result<Self, ProtocolError> {
        let end = self
            .iter()
            .position(|&b| b == b'\0')
            .ok_or(ProtocolError::UnterminatedString)?;
        let me = self.split_to(end);
        Buf::advance(self, 1); // nul
        Ok(me)
    }

    fn get_nul_bytestr(&mut self, charset: Charset) -> Result<ByteStr, ProtocolError> {
        let raw = self.get_nul_bytes()?;
        charset.decode(&raw)?;
        Ok(ByteStr::from_utf8(raw).expect("charset.decode already validated the encoding"))
    }
}

impl BytesExt for BytesMut {
    fn get_nul_bytes(&mut self) -> Result<Self, ProtocolError> {
        let end = self
            .iter()
            .position(|&b| b == b'\0')
            .ok_or(ProtocolError::UnterminatedString)?;
        let me = self.split_to(end);
        Buf::advance(self, 1); // nul
        Ok(me)
    }

    fn get_nul_bytestr(&mut self, charset: Charset) -> Result<ByteStr, ProtocolError> {
        let raw = self.get_nul_bytes()?.freeze();
        charset.decode(&raw)?;
        Ok(ByteStr::from_utf8(raw).expect("charset.decode already validated the encoding"))
    }
}

/// A single bind/function-call parameter value: `None` for SQL NULL,
/// `Some(bytes)` otherwise. Encodes as the `i32` length prefix (`-1` for
/// NULL) followed by the value, per the `Parameter` wire layout.
pub trait BindParam {
    fn size(&self) -> i32;

    fn write(&self, buf: &mut BytesMut);
}

impl BindParam for Option<&[u8]> {
    fn size(&self) -> i32 {
        match self {
            Some(bytes) => bytes.len().to_i32(),
            None => -1,
        }
    }

    fn write(&self, buf: &mut BytesMut) {
        buf.put_i32(self.size());
        if let Some(bytes) = self {
            buf.put_slice(bytes);
        }
    }
}
