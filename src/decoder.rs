//! The Streaming Decoder: turns a continuous byte stream into a lazy
//! sequence of [`BackendMessage`]s, tolerant of arbitrary chunk boundaries.
//!
//! [`Decoder`] is the synchronous, I/O-free core — it only ever sees bytes
//! handed to it and messages it has already produced, so its behavior is a
//! pure function of the concatenation of pushed chunks (the chunking
//! invariance property). [`DecodedStream`] drives a `Decoder` from any
//! [`futures_core::Stream`] of byte chunks, adding the on-demand polling a
//! real transport needs.

use std::collections::VecDeque;

use bytes::{Buf, Bytes, BytesMut};

use crate::{
    charset::Charset,
    common::trace,
    message::{BackendMessage, ProtocolError},
};

/// Tunables threaded through every decode: the charset every string field is
/// decoded with, and the maximum content length a single frame may declare.
#[derive(Debug, Clone, Copy)]
pub struct DecoderConfig {
    pub charset: Charset,
    pub max_length: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { charset: Charset::UTF8, max_length: 64 * 1024 * 1024 }
    }
}

/// The buffer-level decode state machine: `remainder` holds bytes pushed
/// but not yet forming a whole frame, `decoded` holds frames already cut
/// out and awaiting a `pop`.
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    remainder: BytesMut,
    decoded: VecDeque<BackendMessage>,
    /// Set once a decode fails; the decoder refuses further pushes after
    /// this, since the byte offset of the next frame is no longer known.
    poisoned: bool,
}

/// A single frame's header: type byte plus declared content length.
struct FrameHeader {
    code: u8,
    content_length: u32,
}

const HEADER_LEN: usize = 5; // 1 type byte + 4 length bytes

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            remainder: BytesMut::new(),
            decoded: VecDeque::new(),
            poisoned: false,
        }
    }

    /// on-upstream-push: appends `bytes` to `remainder` and decodes as many
    /// complete frames as are now available.
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        if self.poisoned {
            return Ok(());
        }
        self.remainder.extend_from_slice(bytes);
        if let Err(e) = self.decode_available() {
            self.poisoned = true;
            return Err(e);
        }
        Ok(())
    }

    /// on-downstream-pull: pops the oldest decoded message, if any is ready.
    pub fn pop(&mut self) -> Option<BackendMessage> {
        self.decoded.pop_front()
    }

    /// True once a decode error has terminated this decoder; no more
    /// messages will ever be produced even if more bytes are pushed.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn decode_available(&mut self) -> Result<(), ProtocolError> {
        while let Some(header) = self.peek_header()? {
            let total = HEADER_LEN + header.content_length as usize;
            if self.remainder.len() < total {
                // incomplete frame: keep the remainder (from the type byte)
                // for the next push, per §4.3's framing rationale.
                break;
            }
            self.remainder.advance(HEADER_LEN);
            let body = self.remainder.split_to(header.content_length as usize).freeze();
            trace!("decoded frame: code={:?} len={}", header.code as char, header.content_length);
            let message = BackendMessage::decode(header.code, body, self.config.charset)?;
            self.decoded.push_back(message);
        }
        Ok(())
    }

    /// Non-destructively inspects the front of `remainder` for a complete
    /// header, validating its declared length against `max_length` without
    /// consuming any bytes — a full frame may still be incomplete.
    fn peek_header(&self) -> Result<Option<FrameHeader>, ProtocolError> {
        let Some(header) = self.remainder.get(..HEADER_LEN) else { return Ok(None) };
        let code = header[0];
        let length = i32::from_be_bytes(header[1..5].try_into().unwrap());
        let content_length = length.saturating_sub(4).max(0) as u32;

        if content_length > self.config.max_length {
            return Err(ProtocolError::MessageTooLong {
                code,
                content_length,
                max_length: self.config.max_length,
            });
        }

        Ok(Some(FrameHeader { code, content_length }))
    }
}

pin_project_lite::pin_project! {
    /// Adapts any `Stream<Item = Result<Bytes, E>>` of upstream byte chunks
    /// into a `Stream<Item = Result<BackendMessage, E>>` of decoded
    /// messages, driving a [`Decoder`] on demand.
    pub struct DecodedStream<S, E> {
        #[pin]
        upstream: S,
        decoder: Decoder,
        finished: bool,
        _err: std::marker::PhantomData<fn() -> E>,
    }
}

impl<S, E> DecodedStream<S, E> {
    pub fn new(upstream: S, config: DecoderConfig) -> Self {
        Self {
            upstream,
            decoder: Decoder::new(config),
            finished: false,
            _err: std::marker::PhantomData,
        }
    }
}

impl<S, E> futures_core::Stream for DecodedStream<S, E>
where
    S: futures_core::Stream<Item = Result<Bytes, E>>,
    E: From<ProtocolError>,
{
    type Item = Result<BackendMessage, E>;

    fn poll_next(
        self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        use std::task::Poll;

        let mut this = self.project();

        loop {
            if *this.finished {
                return Poll::Ready(None);
            }
            if let Some(message) = this.decoder.pop() {
                return Poll::Ready(Some(Ok(message)));
            }

            match this.upstream.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => {
                    // on-upstream-finish: any pending remainder is discarded.
                    *this.finished = true;
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(Some(Ok(chunk))) => {
                    if let Err(e) = this.decoder.push(&chunk) {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(e.into())));
                    }
                }
            }
        }
    }
}

#[cfg(feature = "tokio")]
pub use async_read::AsyncReadStream;

#[cfg(feature = "tokio")]
mod async_read {
    use std::{
        pin::Pin,
        task::{Context, Poll, ready},
    };

    use bytes::{BufMut, Bytes, BytesMut};
    use tokio::io::AsyncRead;

    /// Turns any [`tokio::io::AsyncRead`] into a `Stream<Item =
    /// io::Result<Bytes>>`, the shape [`super::DecodedStream`] expects as
    /// its upstream. Each poll reads whatever is currently available into a
    /// reused buffer and yields it as one chunk — chunk boundaries are
    /// irrelevant to the decoder by construction.
    pub struct AsyncReadStream<R> {
        reader: R,
        buf: BytesMut,
    }

    const READ_CAPACITY: usize = 8 * 1024;

    impl<R> AsyncReadStream<R> {
        pub fn new(reader: R) -> Self {
            Self { reader, buf: BytesMut::with_capacity(READ_CAPACITY) }
        }
    }

    impl<R: AsyncRead + Unpin> futures_core::Stream for AsyncReadStream<R> {
        type Item = std::io::Result<Bytes>;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            use tokio::io::ReadBuf;

            let me = self.get_mut();
            me.buf.reserve(READ_CAPACITY);

            let n = {
                let dst = me.buf.chunk_mut();
                let dst = unsafe { dst.as_uninit_slice_mut() };
                let mut read_buf = ReadBuf::uninit(dst);
                let ptr = read_buf.filled().as_ptr();
                ready!(Pin::new(&mut me.reader).poll_read(cx, &mut read_buf)?);
                assert_eq!(ptr, read_buf.filled().as_ptr());
                read_buf.filled().len()
            };

            if n == 0 {
                return Poll::Ready(None);
            }

            // SAFETY: `poll_read` reported `n` bytes initialized starting at `dst`.
            unsafe { me.buf.advance_mut(n) };
            let chunk = me.buf.split_to(n).freeze();
            Poll::Ready(Some(Ok(chunk)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_for_query_idle() -> [u8; 6] {
        [b'Z', 0, 0, 0, 5, b'I']
    }

    #[test]
    fn decodes_ready_for_query_in_one_push() {
        // Scenario A
        let mut decoder = Decoder::new(DecoderConfig::default());
        decoder.push(&ready_for_query_idle()).unwrap();
        let msg = decoder.pop().expect("message ready");
        assert!(matches!(msg, BackendMessage::ReadyForQuery(_)));
        assert!(decoder.pop().is_none());
    }

    #[test]
    fn decodes_ready_for_query_split_across_pushes() {
        // Scenario B
        let bytes = ready_for_query_idle();
        let mut decoder = Decoder::new(DecoderConfig::default());
        decoder.push(&bytes[..1]).unwrap();
        assert!(decoder.pop().is_none());
        decoder.push(&bytes[1..]).unwrap();
        let msg = decoder.pop().expect("message ready after full frame");
        assert!(matches!(msg, BackendMessage::ReadyForQuery(_)));
        assert!(decoder.pop().is_none());
    }

    #[test]
    fn chunking_invariance_holds_for_arbitrary_splits() {
        let mut full = Vec::new();
        full.extend_from_slice(&ready_for_query_idle());
        full.extend_from_slice(&[b'1', 0, 0, 0, 4]); // ParseComplete

        for split in 0..full.len() {
            let mut decoder = Decoder::new(DecoderConfig::default());
            decoder.push(&full[..split]).unwrap();
            decoder.push(&full[split..]).unwrap();

            let first = decoder.pop().unwrap();
            let second = decoder.pop().unwrap();
            assert!(matches!(first, BackendMessage::ReadyForQuery(_)));
            assert!(matches!(second, BackendMessage::ParseComplete(_)));
            assert!(decoder.pop().is_none());
        }
    }

    #[test]
    fn message_too_long_terminates_the_decoder() {
        let mut decoder = Decoder::new(DecoderConfig { charset: Charset::UTF8, max_length: 4 });
        let frame = [b'Z', 0, 0, 0, 9, b'I', b'I', b'I', b'I']; // content length 5 > max 4
        let err = decoder.push(&frame).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MessageTooLong { code: b'Z', content_length: 5, max_length: 4 }
        ));
        assert!(decoder.is_poisoned());
    }

    #[test]
    fn unknown_type_byte_fails() {
        let mut decoder = Decoder::new(DecoderConfig::default());
        let frame = [b'?', 0, 0, 0, 4];
        let err = decoder.push(&frame).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedMessageType(b'?')));
    }
}
