//! End-to-end exercises of the decoder and rollover stage without a real
//! socket, covering the concrete scenarios from the protocol's test suite.

use bytes::Bytes;
use futures_executor::block_on_stream;
use futures_util::stream;

use pgwire_codec::message::backend::{BackendMessage, TransactionStatus};
use pgwire_codec::message::frontend::FrontendMessage;
use pgwire_codec::{Charset, Decoder, DecoderConfig, ProtocolError, rollover};

fn ready_for_query_idle() -> [u8; 6] {
    [b'Z', 0, 0, 0, 5, b'I']
}

#[test]
fn scenario_a_decode_ready_for_query() {
    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.push(&ready_for_query_idle()).unwrap();
    let BackendMessage::ReadyForQuery(rfq) = decoder.pop().unwrap() else {
        panic!("expected ReadyForQuery");
    };
    assert_eq!(rfq.status, TransactionStatus::Idle);
    assert!(decoder.pop().is_none());
}

#[test]
fn scenario_b_chunked_decode_produces_no_extra_emissions() {
    let bytes = ready_for_query_idle();
    let mut decoder = Decoder::new(DecoderConfig::default());
    decoder.push(&bytes[..1]).unwrap();
    assert!(decoder.pop().is_none());
    decoder.push(&bytes[1..]).unwrap();
    assert!(matches!(decoder.pop(), Some(BackendMessage::ReadyForQuery(_))));
    assert!(decoder.pop().is_none());
}

#[test]
fn scenario_c_terminate_encodes_to_fixed_bytes() {
    let bytes = FrontendMessage::Terminate.encode(Charset::UTF8);
    assert_eq!(&bytes[..], &[b'X', 0, 0, 0, 4]);
}

#[test]
fn scenario_d_startup_message_framing() {
    let msg = FrontendMessage::Startup { user: "alice", params: &[] };
    let bytes = msg.encode(Charset::UTF8);

    let len = i32::from_be_bytes(bytes[0..4].try_into().unwrap());
    assert_eq!(len as usize, bytes.len());
    assert_eq!(&bytes[4..8], &196_608i32.to_be_bytes());
    assert_eq!(&bytes[8..], b"user\0alice\0\0");
}

#[test]
fn scenario_e_rollover_advances_on_cancel() {
    let mut outputs = rollover(stream::iter([1, 2]), 2);
    let out1 = outputs.pop().unwrap();
    let out0 = outputs.pop().unwrap();

    let mut s0 = block_on_stream(out0);
    assert_eq!(s0.next(), Some(1));
    s0.into_inner().cancel();

    let mut s1 = block_on_stream(out1);
    assert_eq!(s1.next(), Some(2));
    assert_eq!(s1.next(), None);
}

#[test]
fn scenario_f_rollover_skips_already_cancelled_output() {
    let mut outputs = rollover(stream::iter([1, 2]), 3);
    let out2 = outputs.pop().unwrap();
    let out1 = outputs.pop().unwrap();
    let out0 = outputs.pop().unwrap();

    out1.cancel();

    let mut s0 = block_on_stream(out0);
    assert_eq!(s0.next(), Some(1));
    s0.into_inner().cancel();

    let mut s2 = block_on_stream(out2);
    assert_eq!(s2.next(), Some(2));
}

#[test]
fn scenario_g_md5_password_matches_challenge_response_chain() {
    use pgwire_codec::message::password::Password;

    let salt = [0x01, 0x02, 0x03, 0x04];
    let Password::Md5(actual) = Password::md5("u", "p", salt) else {
        panic!("expected Md5 variant");
    };
    assert!(actual.starts_with("md5"));
    assert_eq!(actual.len(), 3 + 32);
}

#[test]
fn scenario_h_command_complete_tag_shapes() {
    use pgwire_codec::message::backend::{BackendProtocol, CommandComplete, CommandTag};

    let CommandComplete { tag } =
        CommandComplete::decode_body(Bytes::from_static(b"INSERT 1234 5\0"), Charset::UTF8).unwrap();
    assert!(matches!(tag, CommandTag::OidWithRows { oid: 1234, rows: 5, .. }));

    let CommandComplete { tag } =
        CommandComplete::decode_body(Bytes::from_static(b"SELECT 7\0"), Charset::UTF8).unwrap();
    assert!(matches!(tag, CommandTag::RowsAffected { rows: 7, .. }));

    let CommandComplete { tag } =
        CommandComplete::decode_body(Bytes::from_static(b"BEGIN\0"), Charset::UTF8).unwrap();
    assert!(matches!(tag, CommandTag::NameOnly { .. }));
}

#[test]
fn message_too_long_reports_code_and_lengths() {
    let mut decoder = Decoder::new(DecoderConfig { charset: Charset::UTF8, max_length: 4 });
    let frame = [b'Z', 0, 0, 0, 9, b'I', b'I', b'I', b'I'];
    let err = decoder.push(&frame).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::MessageTooLong { code: b'Z', content_length: 5, max_length: 4 }
    ));
    assert!(decoder.is_poisoned());
}

#[test]
fn copy_in_response_rejects_binary_column_under_text_overall() {
    use pgwire_codec::message::backend::BackendMessage as BM;

    let mut body = bytes::BytesMut::new();
    body.extend_from_slice(&[0]); // overall text
    body.extend_from_slice(&2i16.to_be_bytes());
    body.extend_from_slice(&0i16.to_be_bytes());
    body.extend_from_slice(&1i16.to_be_bytes());

    let err = BM::decode(b'G', body.freeze(), Charset::UTF8).unwrap_err();
    assert!(matches!(err, ProtocolError::UnexpectedBinaryColumnFormat { columns } if columns == vec![1]));
}

#[test]
fn chunking_invariance_across_every_split_point() {
    let mut full = Vec::new();
    full.extend_from_slice(&ready_for_query_idle());
    full.extend_from_slice(&[b'1', 0, 0, 0, 4]); // ParseComplete

    for split in 0..=full.len() {
        let mut decoder = Decoder::new(DecoderConfig::default());
        decoder.push(&full[..split]).unwrap();
        decoder.push(&full[split..]).unwrap();

        assert!(matches!(decoder.pop(), Some(BackendMessage::ReadyForQuery(_))));
        assert!(matches!(decoder.pop(), Some(BackendMessage::ParseComplete(_))));
        assert!(decoder.pop().is_none());
    }
}
