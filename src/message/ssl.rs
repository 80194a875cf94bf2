//! The single-byte reply a server sends immediately after an `SSLRequest`,
//! before the rest of the startup handshake begins.
//!
//! Unlike every other backend message this reply carries no type byte and
//! no length prefix — it is always exactly one byte, so it is decoded here
//! rather than through [`super::BackendMessage::decode`].

use super::error::ProtocolError;

/// The server's response to `SSLRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslReply {
    /// `'S'` — the server will now expect a TLS handshake on this connection.
    Accepted,
    /// `'N'` — the server does not support TLS; continue in the clear.
    Rejected,
}

impl SslReply {
    /// Decodes the single reply byte, failing on anything but `'S'`/`'N'`.
    pub fn decode(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            b'S' => Ok(Self::Accepted),
            b'N' => Ok(Self::Rejected),
            other => Err(ProtocolError::UnsupportedSSLReply(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_s_and_n_only() {
        assert_eq!(SslReply::decode(b'S').unwrap(), SslReply::Accepted);
        assert_eq!(SslReply::decode(b'N').unwrap(), SslReply::Rejected);
        assert!(matches!(SslReply::decode(b'?'), Err(ProtocolError::UnsupportedSSLReply(b'?'))));
    }
}
