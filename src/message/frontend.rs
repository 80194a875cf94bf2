//! Frontend messages: the client-to-server half of the protocol.
//!
//! <https://www.postgresql.org/docs/current/protocol-message-formats.html>
//!
//! All variants except [`FrontendMessage::Startup`], [`FrontendMessage::SslRequest`]
//! and [`FrontendMessage::CancelRequest`] are framed as
//! `[type: u8][length: i32][payload]`, where `length` covers itself plus
//! `payload`. Those three are the "version-zero" messages: historically the
//! very first message on a connection carries no type byte, just a version
//! (or magic) number followed by its own length-inclusive framing.

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    format::FieldFormats,
    password::Password,
};
use crate::{
    charset::Charset,
    ext::{BindParam, BufMutExt, StrExt, UsizeExt},
};

/// Protocol version 3.0, as sent in `StartupMessage`.
pub const PROTOCOL_VERSION_3_0: i32 = 196_608;
/// Magic number identifying an `SSLRequest`.
pub const SSL_REQUEST_CODE: i32 = 80_877_103;
/// Magic number identifying a `CancelRequest`.
pub const CANCEL_REQUEST_CODE: i32 = 80_877_102;

/// Identifies a prepared statement or portal target for `Close`/`Describe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `'P'` — a portal.
    Portal,
    /// `'S'` — a prepared statement.
    Statement,
}

impl Target {
    fn byte(self) -> u8 {
        match self {
            Target::Portal => b'P',
            Target::Statement => b'S',
        }
    }
}

/// The full closed set of messages a frontend may send.
///
/// `encode` is pure: given a charset it returns the exact bytes to write to
/// the wire, with no side effects and no dependency on connection state.
#[derive(Debug, Clone)]
pub enum FrontendMessage<'a> {
    /// The very first message on a connection. No type byte.
    Startup {
        user: &'a str,
        params: &'a [(&'a str, &'a str)],
    },
    /// Sent instead of `Startup` to negotiate TLS before the real handshake. No type byte.
    SslRequest,
    /// Sent on a fresh connection to cancel a running query on another
    /// connection sharing the same `processId`/`secretKey`. No type byte.
    CancelRequest { process_id: i32, secret_key: i32 },

    Bind {
        portal: &'a str,
        statement: &'a str,
        param_formats: FieldFormats,
        params: &'a [Option<&'a [u8]>],
        result_formats: FieldFormats,
    },
    Close { target: Target, name: &'a str },
    CopyData { data: &'a [u8] },
    CopyDone,
    CopyFail { message: &'a str },
    Describe { target: Target, name: &'a str },
    Execute { portal: &'a str, max_rows: i32 },
    Flush,
    FunctionCall {
        oid: u32,
        param_formats: FieldFormats,
        params: &'a [Option<&'a [u8]>],
        result_format: FieldFormats,
    },
    Parse {
        statement: &'a str,
        sql: &'a str,
        param_types: &'a [u32],
    },
    PasswordMessage(Password<'a>),
    Query { sql: &'a str },
    Sync,
    Terminate,
}

/// A cached 5-byte encoding for a message whose payload is empty, shared by
/// every unit variant instead of being re-built on every send.
const fn empty_message(type_byte: u8) -> [u8; 5] {
    [type_byte, 0, 0, 0, 4]
}

impl FrontendMessage<'_> {
    /// Encodes this message to a fresh [`Bytes`] buffer.
    pub fn encode(&self, charset: Charset) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf, charset);
        buf.freeze()
    }

    /// Encodes this message, appending it to an existing buffer — the
    /// shape used when pipelining several frontend messages before a flush.
    pub fn encode_into(&self, buf: &mut BytesMut, charset: Charset) {
        // Accepted for symmetry with `BackendMessage::decode`'s
        // `decode(charset, payload_bytes)` contract and so callers can pass
        // the session's negotiated `client_encoding` through unchanged, but
        // unused: every string here is already a Rust `&str`, which is
        // valid UTF-8 by construction, and `Charset` (see charset.rs) only
        // ever actually supports UTF-8, so there is no distinct encoding to
        // perform per charset.
        let _ = charset;
        match self {
            FrontendMessage::Startup { user, params } => encode_startup(buf, user, params),
            FrontendMessage::SslRequest => {
                buf.put_i32(8);
                buf.put_i32(SSL_REQUEST_CODE);
            }
            FrontendMessage::CancelRequest { process_id, secret_key } => {
                buf.put_i32(16);
                buf.put_i32(CANCEL_REQUEST_CODE);
                buf.put_i32(*process_id);
                buf.put_i32(*secret_key);
            }
            FrontendMessage::Bind { portal, statement, param_formats, params, result_formats } => {
                with_frame(buf, b'B', |buf| {
                    buf.put_nul_string(portal);
                    buf.put_nul_string(statement);
                    param_formats.encode(buf);
                    buf.put_i16(params.len().to_i16());
                    for param in *params {
                        param.write(buf);
                    }
                    result_formats.encode(buf);
                });
            }
            FrontendMessage::Close { target, name } => {
                with_frame(buf, b'C', |buf| {
                    buf.put_u8(target.byte());
                    buf.put_nul_string(name);
                });
            }
            FrontendMessage::CopyData { data } => {
                with_frame(buf, b'd', |buf| buf.put_slice(data));
            }
            FrontendMessage::CopyDone => buf.put_slice(&empty_message(b'c')),
            FrontendMessage::CopyFail { message } => {
                with_frame(buf, b'f', |buf| buf.put_nul_string(message));
            }
            FrontendMessage::Describe { target, name } => {
                with_frame(buf, b'D', |buf| {
                    buf.put_u8(target.byte());
                    buf.put_nul_string(name);
                });
            }
            FrontendMessage::Execute { portal, max_rows } => {
                with_frame(buf, b'E', |buf| {
                    buf.put_nul_string(portal);
                    buf.put_i32(*max_rows);
                });
            }
            FrontendMessage::Flush => buf.put_slice(&empty_message(b'H')),
            FrontendMessage::FunctionCall { oid, param_formats, params, result_format } => {
                with_frame(buf, b'F', |buf| {
                    buf.put_u32(*oid);
                    param_formats.encode(buf);
                    buf.put_i16(params.len().to_i16());
                    for param in *params {
                        param.write(buf);
                    }
                    result_format.encode(buf);
                });
            }
            FrontendMessage::Parse { statement, sql, param_types } => {
                with_frame(buf, b'P', |buf| {
                    buf.put_nul_string(statement);
                    buf.put_nul_string(sql);
                    buf.put_i16(param_types.len().to_i16());
                    for oid in *param_types {
                        buf.put_u32(*oid);
                    }
                });
            }
            FrontendMessage::PasswordMessage(password) => {
                with_frame(buf, b'p', |buf| buf.put_nul_string(password.as_str()));
            }
            FrontendMessage::Query { sql } => {
                with_frame(buf, b'Q', |buf| buf.put_nul_string(sql));
            }
            FrontendMessage::Sync => buf.put_slice(&empty_message(b'S')),
            FrontendMessage::Terminate => buf.put_slice(&empty_message(b'X')),
        }
    }
}

/// Writes `[type: u8][length: i32][body]`, computing `length` from
/// whatever `body` writes, by reserving the length field and patching it
/// in afterwards — the same two-pass approach the rest of this corpus uses
/// rather than pre-computing a size hint for every variant.
fn with_frame(buf: &mut BytesMut, type_byte: u8, body: impl FnOnce(&mut BytesMut)) {
    let offset = buf.len();
    buf.put_u8(type_byte);
    buf.put_i32(0); // patched below
    body(buf);
    let len = (buf.len() - offset - 1).to_i32();
    buf[offset + 1..offset + 5].copy_from_slice(&len.to_be_bytes());
}

fn encode_startup(buf: &mut BytesMut, user: &str, params: &[(&str, &str)]) {
    let offset = buf.len();
    buf.put_i32(0); // patched below
    buf.put_i32(PROTOCOL_VERSION_3_0);

    buf.put_nul_string("user");
    buf.put_nul_string(user);

    for (key, value) in params {
        // a duplicate `user` key in `params` never overrides the explicit `user` argument
        if *key == "user" {
            continue;
        }
        buf.put_nul_string(key);
        buf.put_nul_string(value);
    }

    buf.put_u8(0); // terminator

    let len = (buf.len() - offset).to_i32();
    buf[offset..offset + 4].copy_from_slice(&len.to_be_bytes());
}
