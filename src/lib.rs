//! A streaming codec for the PostgreSQL v3 frontend/backend wire protocol.
//!
//! This crate converts typed frontend messages into bytes and a continuous
//! byte stream from the backend into typed messages. It owns framing,
//! encoding, and back-pressure — nothing about transport (TCP/TLS), pooling,
//! authentication policy, or SQL result materialization.
//!
//! The three load-bearing pieces:
//!
//! - [`message`]: the closed [`FrontendMessage`]/[`BackendMessage`] sums and
//!   their encode/decode contracts.
//! - [`decoder`]: [`Decoder`], the buffer-level state machine that turns
//!   pushed byte chunks into a queue of decoded [`BackendMessage`]s, plus a
//!   [`futures_core::Stream`] adapter over it.
//! - [`rollover`]: a generic one-input/many-output fan-out used to hand a
//!   byte or message stream off between protocol-phase consumers (SSL
//!   negotiation, authentication, query cycle).
//!
//! [`decode`] supplies the pluggable per-column value decoders a consumer
//! calls after a `DataRow` has been yielded.

mod charset;
mod common;
pub mod decode;
pub mod decoder;
mod error;
mod ext;
pub mod message;
pub mod rollover;

pub use charset::Charset;
pub use decode::{ByteArray, Decode, DecodeError, decode_option};
pub use decoder::{Decoder, DecoderConfig, DecodedStream};
pub use error::{Error, Result};
pub use ext::Oid;
pub use message::{
    BackendMessage, FieldFormats, Format, FrontendMessage, Password, ProtocolError, SslReply,
    Target,
};
pub use rollover::{RolloverOutput, rollover};

#[cfg(feature = "tokio")]
pub use decoder::AsyncReadStream;
