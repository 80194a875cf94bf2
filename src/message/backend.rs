//! Backend messages: the server-to-client half of the protocol.
//!
//! <https://www.postgresql.org/docs/current/protocol-message-formats.html>

use bytes::{Buf, Bytes};

use super::{error::ProtocolError, format::{FieldFormats, Format}};
use crate::{charset::Charset, common::ByteStr, ext::BytesExt};

/// Decodes the body of a single backend frame, given its type byte.
///
/// `body` is the payload only — type byte and length field already stripped.
/// `charset` is the connection's active [`Charset`], threaded through per
/// spec.md §4.2's `decode(charset, payload_bytes) -> message` contract —
/// every string field in the payload is decoded through it.
pub trait BackendProtocol: Sized {
    const MSGTYPE: u8;

    fn decode_body(body: Bytes, charset: Charset) -> Result<Self, ProtocolError>;
}

macro_rules! match_backend {
    ($($name:ident,)*) => {
        impl BackendMessage {
            /// Dispatches on `msgtype` to the matching variant's decoder.
            ///
            /// Only covers the variants generated by this macro; see
            /// [`BackendMessage::decode`] for the full closed set including
            /// `ErrorResponse`/`NoticeResponse`/the Copy*Response family,
            /// which share a payload struct across distinct type bytes and
            /// so cannot be given a single `BackendProtocol::MSGTYPE`.
            fn decode_remaining(msgtype: u8, body: Bytes, charset: Charset) -> Result<Self, ProtocolError> {
                let message = match msgtype {
                    $($name::MSGTYPE => Self::$name(<$name as BackendProtocol>::decode_body(body, charset)?),)*
                    other => return Err(ProtocolError::UnsupportedMessageType(other)),
                };
                Ok(message)
            }
        }
    };
}

/// The full closed set of messages a backend may send.
#[derive(Debug)]
pub enum BackendMessage {
    Authentication(Authentication),
    BackendKeyData(BackendKeyData),
    BindComplete(BindComplete),
    CloseComplete(CloseComplete),
    CommandComplete(CommandComplete),
    CopyData(CopyData),
    CopyDone(CopyDone),
    CopyInResponse(CopyResponse),
    CopyOutResponse(CopyResponse),
    CopyBothResponse(CopyResponse),
    DataRow(DataRow),
    EmptyQueryResponse(EmptyQueryResponse),
    ErrorResponse(ResponseFields),
    FunctionCallResponse(FunctionCallResponse),
    NoData(NoData),
    NoticeResponse(ResponseFields),
    NotificationResponse(NotificationResponse),
    ParameterDescription(ParameterDescription),
    ParameterStatus(ParameterStatus),
    ParseComplete(ParseComplete),
    PortalSuspended(PortalSuspended),
    ReadyForQuery(ReadyForQuery),
    RowDescription(RowDescription),
}

match_backend! {
    Authentication,
    BackendKeyData,
    BindComplete,
    CloseComplete,
    CommandComplete,
    CopyData,
    CopyDone,
    DataRow,
    EmptyQueryResponse,
    FunctionCallResponse,
    NoData,
    NotificationResponse,
    ParameterDescription,
    ParameterStatus,
    ParseComplete,
    PortalSuspended,
    ReadyForQuery,
    RowDescription,
}

// `ErrorResponse`/`NoticeResponse` share a payload shape (`ResponseFields`)
// but are distinct variants of `BackendMessage`, and the three Copy*Response
// messages share `CopyResponse` — none of these fit the one-struct-per-byte
// macro above, so they are dispatched by hand alongside it.
impl BackendMessage {
    /// Decodes a single backend frame body, dispatching on its type byte.
    pub fn decode(msgtype: u8, body: Bytes, charset: Charset) -> Result<Self, ProtocolError> {
        match msgtype {
            b'E' => Ok(Self::ErrorResponse(ResponseFields::decode(body, charset)?)),
            b'N' => Ok(Self::NoticeResponse(ResponseFields::decode(body, charset)?)),
            b'G' => Ok(Self::CopyInResponse(CopyResponse::decode(body)?)),
            b'H' => Ok(Self::CopyOutResponse(CopyResponse::decode(body)?)),
            b'W' => Ok(Self::CopyBothResponse(CopyResponse::decode(body)?)),
            _ => Self::decode_remaining(msgtype, body, charset),
        }
    }

    /// The type byte this variant was (or would be) framed with.
    ///
    /// Hand-written rather than macro-generated: `CopyInResponse`/
    /// `CopyOutResponse`/`CopyBothResponse` all share the `CopyResponse`
    /// payload struct, and `ErrorResponse`/`NoticeResponse` both share
    /// `ResponseFields`, so none of the five has a single `MSGTYPE`
    /// associated constant to dispatch on — this match must be exhaustive
    /// over every `BackendMessage` variant, irregular ones included.
    pub const fn msgtype(&self) -> u8 {
        match self {
            Self::Authentication(_) => Authentication::MSGTYPE,
            Self::BackendKeyData(_) => BackendKeyData::MSGTYPE,
            Self::BindComplete(_) => BindComplete::MSGTYPE,
            Self::CloseComplete(_) => CloseComplete::MSGTYPE,
            Self::CommandComplete(_) => CommandComplete::MSGTYPE,
            Self::CopyData(_) => CopyData::MSGTYPE,
            Self::CopyDone(_) => CopyDone::MSGTYPE,
            Self::CopyInResponse(_) => b'G',
            Self::CopyOutResponse(_) => b'H',
            Self::CopyBothResponse(_) => b'W',
            Self::DataRow(_) => DataRow::MSGTYPE,
            Self::EmptyQueryResponse(_) => EmptyQueryResponse::MSGTYPE,
            Self::ErrorResponse(_) => b'E',
            Self::FunctionCallResponse(_) => FunctionCallResponse::MSGTYPE,
            Self::NoData(_) => NoData::MSGTYPE,
            Self::NoticeResponse(_) => b'N',
            Self::NotificationResponse(_) => NotificationResponse::MSGTYPE,
            Self::ParameterDescription(_) => ParameterDescription::MSGTYPE,
            Self::ParameterStatus(_) => ParameterStatus::MSGTYPE,
            Self::ParseComplete(_) => ParseComplete::MSGTYPE,
            Self::PortalSuspended(_) => PortalSuspended::MSGTYPE,
            Self::ReadyForQuery(_) => ReadyForQuery::MSGTYPE,
            Self::RowDescription(_) => RowDescription::MSGTYPE,
        }
    }

    /// Name of the message a given type byte decodes to, for logging.
    /// Returns `"Unknown"` for a byte outside the closed table.
    pub const fn message_name(msgtype: u8) -> &'static str {
        match msgtype {
            Authentication::MSGTYPE => "Authentication",
            BackendKeyData::MSGTYPE => "BackendKeyData",
            BindComplete::MSGTYPE => "BindComplete",
            CloseComplete::MSGTYPE => "CloseComplete",
            CommandComplete::MSGTYPE => "CommandComplete",
            CopyData::MSGTYPE => "CopyData",
            CopyDone::MSGTYPE => "CopyDone",
            b'G' => "CopyInResponse",
            b'H' => "CopyOutResponse",
            b'W' => "CopyBothResponse",
            DataRow::MSGTYPE => "DataRow",
            EmptyQueryResponse::MSGTYPE => "EmptyQueryResponse",
            b'E' => "ErrorResponse",
            FunctionCallResponse::MSGTYPE => "FunctionCallResponse",
            NoData::MSGTYPE => "NoData",
            b'N' => "NoticeResponse",
            NotificationResponse::MSGTYPE => "NotificationResponse",
            ParameterDescription::MSGTYPE => "ParameterDescription",
            ParameterStatus::MSGTYPE => "ParameterStatus",
            ParseComplete::MSGTYPE => "ParseComplete",
            PortalSuspended::MSGTYPE => "PortalSuspended",
            ReadyForQuery::MSGTYPE => "ReadyForQuery",
            RowDescription::MSGTYPE => "RowDescription",
            _ => "Unknown",
        }
    }
}

/// An authentication request or challenge.
///
/// The accepted sub-kinds are the closed set from spec.md §3: `{0, 2, 3, 5,
/// 6, 7, 8, 9}`. SASL (10/11/12) is deliberately not part of that set — the
/// SCRAM/SASL exchange itself is an explicit Non-goal (see `DESIGN.md`), so
/// a server requesting it surfaces as `UnsupportedAuthenticationMethod`
/// rather than being silently half-decoded.
pub enum Authentication {
    Ok,
    KerberosV5,
    CleartextPassword,
    MD5Password { salt: [u8; 4] },
    /// Kind 6, deprecated and never sent by any server still speaking v3.0,
    /// kept only because spec.md's closed set names it explicitly.
    ScmCredential,
    Gss,
    GssContinue { data: Bytes },
    Sspi,
}

impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "Ok"),
            Self::KerberosV5 => write!(f, "KerberosV5"),
            Self::CleartextPassword => write!(f, "CleartextPassword"),
            Self::MD5Password { .. } => f.debug_struct("MD5Password").field("salt", &"<BINARY>").finish(),
            Self::ScmCredential => write!(f, "ScmCredential"),
            Self::Gss => write!(f, "Gss"),
            Self::GssContinue { .. } => f.debug_struct("GssContinue").field("data", &"<BINARY>").finish(),
            Self::Sspi => write!(f, "Sspi"),
        }
    }
}

impl BackendProtocol for Authentication {
    const MSGTYPE: u8 = b'R';

    fn decode_body(mut body: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        let auth = match body.get_u32() {
            0 => Self::Ok,
            2 => Self::KerberosV5,
            3 => Self::CleartextPassword,
            5 => Self::MD5Password { salt: body.get_u32().to_be_bytes() },
            6 => Self::ScmCredential,
            7 => Self::Gss,
            8 => Self::GssContinue { data: body },
            9 => Self::Sspi,
            other => return Err(ProtocolError::UnsupportedAuthenticationMethod(other)),
        };
        Ok(auth)
    }
}

/// Cancellation key data the frontend must retain to issue a `CancelRequest` later.
pub struct BackendKeyData {
    pub process_id: i32,
    pub secret_key: i32,
}

impl BackendProtocol for BackendKeyData {
    const MSGTYPE: u8 = b'K';

    fn decode_body(mut body: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        Ok(Self {
            process_id: body.get_i32(),
            secret_key: body.get_i32(),
        })
    }
}

impl std::fmt::Debug for BackendKeyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendKeyData")
            .field("process_id", &self.process_id)
            .field("secret_key", &"<REDACTED>")
            .finish()
    }
}

/// A run-time parameter change report, e.g. `server_version` or `TimeZone`.
#[derive(Debug)]
pub struct ParameterStatus {
    pub name: ByteStr,
    pub value: ByteStr,
}

impl BackendProtocol for ParameterStatus {
    const MSGTYPE: u8 = b'S';

    fn decode_body(mut body: Bytes, charset: Charset) -> Result<Self, ProtocolError> {
        Ok(Self {
            name: body.get_nul_bytestr(charset)?,
            value: body.get_nul_bytestr(charset)?,
        })
    }
}

/// A single tagged field within an `ErrorResponse`/`NoticeResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    Severity,
    SqlState,
    Message,
    Detail,
    Hint,
    Position,
    InternalPosition,
    InternalQuery,
    Where,
    Schema,
    Table,
    Column,
    DataType,
    Constraint,
    File,
    Line,
    Routine,
}

impl FieldTag {
    fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'S' => Self::Severity,
            b'C' => Self::SqlState,
            b'M' => Self::Message,
            b'D' => Self::Detail,
            b'H' => Self::Hint,
            b'P' => Self::Position,
            b'p' => Self::InternalPosition,
            b'q' => Self::InternalQuery,
            b'W' => Self::Where,
            b's' => Self::Schema,
            b't' => Self::Table,
            b'c' => Self::Column,
            b'd' => Self::DataType,
            b'n' => Self::Constraint,
            b'F' => Self::File,
            b'L' => Self::Line,
            b'R' => Self::Routine,
            // unrecognized tags are silently ignored, per §3's ResponseFields contract
            _ => return None,
        })
    }
}

/// The shared payload of `ErrorResponse` and `NoticeResponse`: a sequence of
/// tagged fields terminated by a zero byte.
#[derive(Debug, Default)]
pub struct ResponseFields {
    fields: Vec<(FieldTag, ByteStr)>,
}

impl ResponseFields {
    fn decode(mut body: Bytes, charset: Charset) -> Result<Self, ProtocolError> {
        let mut fields = Vec::new();
        loop {
            if !body.has_remaining() {
                break;
            }
            let tag = body.get_u8();
            if tag == 0 {
                break;
            }
            let value = body.get_nul_bytestr(charset)?;
            if let Some(tag) = FieldTag::from_byte(tag) {
                fields.push((tag, value));
            }
        }
        Ok(Self { fields })
    }

    pub fn get(&self, tag: FieldTag) -> Option<&ByteStr> {
        self.fields.iter().find(|(t, _)| *t == tag).map(|(_, v)| v)
    }

    pub fn severity(&self) -> Option<&ByteStr> {
        self.get(FieldTag::Severity)
    }

    pub fn message(&self) -> Option<&ByteStr> {
        self.get(FieldTag::Message)
    }

    pub fn sql_state(&self) -> Option<&ByteStr> {
        self.get(FieldTag::SqlState)
    }

    /// The `Where` field split on `\n`, since the server reports a call-context
    /// stack as newline-separated lines rather than one field per frame.
    pub fn where_context(&self) -> Vec<&str> {
        self.get(FieldTag::Where)
            .map(|v| v.as_ref().split('\n').collect())
            .unwrap_or_default()
    }
}

/// `CommandComplete`'s space-separated tag, parsed into its three observed shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTag {
    /// `"INSERT oid rows"` — the legacy INSERT-with-OID shape.
    OidWithRows { command: ByteStr, oid: u32, rows: u64 },
    /// `"name rows"` — DELETE/UPDATE/MERGE/SELECT/MOVE/FETCH/COPY.
    RowsAffected { command: ByteStr, rows: u64 },
    /// A bare command name with no row count, e.g. `"BEGIN"`.
    NameOnly { command: ByteStr },
}

#[derive(Debug)]
pub struct CommandComplete {
    pub tag: CommandTag,
}

impl BackendProtocol for CommandComplete {
    const MSGTYPE: u8 = b'C';

    fn decode_body(mut body: Bytes, charset: Charset) -> Result<Self, ProtocolError> {
        let raw = body.get_nul_bytestr(charset)?;
        Ok(Self { tag: parse_command_tag(raw) })
    }
}

fn parse_command_tag(raw: ByteStr) -> CommandTag {
    let text = raw.as_ref();
    let mut parts = text.split(' ');
    let first = parts.next().unwrap_or_default();
    let second = parts.next();
    let third = parts.next();

    match (second, third) {
        (Some(oid), Some(rows)) => match (oid.parse::<u32>(), rows.parse::<u64>()) {
            (Ok(oid), Ok(rows)) => CommandTag::OidWithRows {
                command: ByteStr::copy_from_str(first),
                oid,
                rows,
            },
            _ => CommandTag::NameOnly { command: raw },
        },
        (Some(rows), None) => match rows.parse::<u64>() {
            Ok(rows) => CommandTag::RowsAffected {
                command: ByteStr::copy_from_str(first),
                rows,
            },
            Err(_) => CommandTag::NameOnly { command: raw },
        },
        _ => CommandTag::NameOnly { command: raw },
    }
}

/// `NegotiateProtocolVersion` — left out of the closed set decoded by
/// `BackendMessage`; this message is not part of the main v3.0 table and
/// only appears during a version-mismatch handshake. Carried as a free
/// function for callers that want to parse it out of band.
pub fn decode_negotiate_protocol_version(mut body: Bytes, charset: Charset) -> (i32, Vec<ByteStr>) {
    let minor = body.get_i32();
    let count = body.get_i32();
    let mut names = Vec::with_capacity(count.max(0) as usize);
    for _ in 0..count.max(0) {
        let Ok(name) = body.get_nul_bytestr(charset) else { break };
        names.push(name);
    }
    (minor, names)
}

#[derive(Debug)]
pub struct RowField {
    pub name: ByteStr,
    pub table_oid: u32,
    pub column: i16,
    pub data_type_oid: u32,
    pub type_size: i16,
    pub type_modifier: i32,
    /// `Some(format)` once resolved; `None` when the backend reports `0`
    /// ("unknown") after a Describe with no prior Bind — see §9. Format
    /// code `0` is read as unresolved unconditionally, per §9's literal
    /// guidance: there is no reliable wire signal distinguishing "text" from
    /// "unresolved" at code `0` (a computed column like `SELECT 1` reports
    /// `table_oid == 0`/`column == 0` too, despite being fully resolved to
    /// text), so this codec does not invent one.
    pub format: Option<Format>,
}

#[derive(Debug)]
pub struct RowDescription {
    pub fields: Vec<RowField>,
}

impl BackendProtocol for RowDescription {
    const MSGTYPE: u8 = b'T';

    fn decode_body(mut body: Bytes, charset: Charset) -> Result<Self, ProtocolError> {
        let count = body.get_i16();
        let mut fields = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count.max(0) {
            let name = body.get_nul_bytestr(charset)?;
            let table_oid = body.get_u32();
            let column = body.get_i16();
            let data_type_oid = body.get_u32();
            let type_size = body.get_i16();
            let type_modifier = body.get_i32();
            let format_code = body.get_i16();
            let format = match format_code {
                0 => None,
                code => Some(Format::from_code(code)?),
            };
            fields.push(RowField {
                name,
                table_oid,
                column,
                data_type_oid,
                type_size,
                type_modifier,
                format,
            });
        }
        Ok(Self { fields })
    }
}

/// A single column of a [`DataRow`]: `None` for SQL NULL.
pub type DataRowColumn = Option<Bytes>;

pub struct DataRow {
    pub columns: Vec<DataRowColumn>,
}

impl std::fmt::Debug for DataRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataRow")
            .field(
                "columns",
                &self
                    .columns
                    .iter()
                    .map(|c| if c.is_some() { "<BINARY>" } else { "NULL" })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl BackendProtocol for DataRow {
    const MSGTYPE: u8 = b'D';

    fn decode_body(mut body: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        let count = body.get_i16();
        let mut columns = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count.max(0) {
            let len = body.get_i32();
            let column = match len {
                -1 => None,
                len if len < 0 => return Err(ProtocolError::MalformedColumnLength(len)),
                len => Some(body.split_to(len as usize)),
            };
            columns.push(column);
        }
        Ok(Self { columns })
    }
}

pub struct CopyData {
    pub data: Bytes,
}

impl std::fmt::Debug for CopyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyData").field("data", &"<BINARY>").finish()
    }
}

impl BackendProtocol for CopyData {
    const MSGTYPE: u8 = b'd';

    fn decode_body(body: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        Ok(Self { data: body })
    }
}

#[derive(Debug)]
pub struct CopyDone;

impl BackendProtocol for CopyDone {
    const MSGTYPE: u8 = b'c';

    fn decode_body(_: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        Ok(Self)
    }
}

/// Shared shape of `CopyInResponse` ('G'), `CopyOutResponse` ('H') and
/// `CopyBothResponse` ('W'): an overall format plus a per-column format list,
/// with the invariant that an overall Text format forbids any Binary column.
#[derive(Debug)]
pub struct CopyResponse {
    pub overall_format: Format,
    pub column_formats: Vec<Format>,
}

impl CopyResponse {
    fn decode(mut body: Bytes) -> Result<Self, ProtocolError> {
        let overall_format = match body.get_u8() {
            0 => Format::Text,
            1 => Format::Binary,
            other => return Err(ProtocolError::UnsupportedFormatType(other as i16)),
        };
        let count = body.get_i16().max(0) as u16;
        let column_formats = FieldFormats::decode(&mut body, count)?;

        if overall_format == Format::Text {
            let offending: Vec<u16> = column_formats
                .iter()
                .enumerate()
                .filter(|(_, f)| **f == Format::Binary)
                .map(|(i, _)| i as u16)
                .collect();
            if !offending.is_empty() {
                return Err(ProtocolError::UnexpectedBinaryColumnFormat { columns: offending });
            }
        }

        Ok(Self { overall_format, column_formats })
    }
}

pub struct FunctionCallResponse {
    pub value: Option<Bytes>,
}

impl std::fmt::Debug for FunctionCallResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionCallResponse")
            .field("value", &if self.value.is_some() { "<BINARY>" } else { "NULL" })
            .finish()
    }
}

impl BackendProtocol for FunctionCallResponse {
    const MSGTYPE: u8 = b'V';

    fn decode_body(mut body: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        let len = body.get_i32();
        let value = match len {
            -1 => None,
            len if len < 0 => return Err(ProtocolError::MalformedColumnLength(len)),
            len => Some(body.split_to(len as usize)),
        };
        Ok(Self { value })
    }
}

#[derive(Debug)]
pub struct NotificationResponse {
    pub process_id: i32,
    pub channel: ByteStr,
    pub payload: ByteStr,
}

impl BackendProtocol for NotificationResponse {
    const MSGTYPE: u8 = b'A';

    fn decode_body(mut body: Bytes, charset: Charset) -> Result<Self, ProtocolError> {
        Ok(Self {
            process_id: body.get_i32(),
            channel: body.get_nul_bytestr(charset)?,
            payload: body.get_nul_bytestr(charset)?,
        })
    }
}

#[derive(Debug)]
pub struct ParameterDescription {
    pub param_types: Vec<u32>,
}

impl BackendProtocol for ParameterDescription {
    const MSGTYPE: u8 = b't';

    fn decode_body(mut body: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        let count = body.get_i16();
        let param_types = (0..count.max(0)).map(|_| body.get_u32()).collect();
        Ok(Self { param_types })
    }
}

/// Current backend transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Idle,
    Open,
    Failed,
}

#[derive(Debug)]
pub struct ReadyForQuery {
    pub status: TransactionStatus,
}

impl BackendProtocol for ReadyForQuery {
    const MSGTYPE: u8 = b'Z';

    fn decode_body(mut body: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
        let status = match body.get_u8() {
            b'I' => TransactionStatus::Idle,
            b'T' => TransactionStatus::Open,
            b'E' => TransactionStatus::Failed,
            other => return Err(ProtocolError::UnsupportedTransactionStatus(other)),
        };
        Ok(Self { status })
    }
}

macro_rules! unit_msg {
    ($(
        $(#[$doc:meta])* struct $name:ident, $ty:literal;
    )*) => {$(
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name;

        impl BackendProtocol for $name {
            const MSGTYPE: u8 = $ty;

            fn decode_body(_: Bytes, _charset: Charset) -> Result<Self, ProtocolError> {
                Ok(Self)
            }
        }
    )*};
}

unit_msg! {
    /// Sent after a successful `Bind`.
    struct BindComplete, b'2';
    /// Sent after a successful `Close`.
    struct CloseComplete, b'3';
    /// Substitutes for `CommandComplete` when the query string was empty.
    struct EmptyQueryResponse, b'I';
    /// Sent instead of `RowDescription` when a statement returns no rows.
    struct NoData, b'n';
    /// Sent after a successful `Parse`.
    struct ParseComplete, b'1';
    /// Sent when an `Execute`'s row-count limit was reached before the portal was exhausted.
    struct PortalSuspended, b's';
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_for_query_decodes_idle() {
        // Scenario A
        let msg = BackendMessage::decode(b'Z', Bytes::from_static(b"I"), Charset::UTF8).unwrap();
        let BackendMessage::ReadyForQuery(rfq) = msg else { panic!("wrong variant") };
        assert_eq!(rfq.status, TransactionStatus::Idle);
    }

    #[test]
    fn command_complete_tag_variants() {
        // Scenario H
        let insert =
            CommandComplete::decode_body(Bytes::from_static(b"INSERT 1234 5\0"), Charset::UTF8).unwrap();
        assert_eq!(
            insert.tag,
            CommandTag::OidWithRows { command: ByteStr::from_static("INSERT"), oid: 1234, rows: 5 }
        );

        let select =
            CommandComplete::decode_body(Bytes::from_static(b"SELECT 7\0"), Charset::UTF8).unwrap();
        assert_eq!(select.tag, CommandTag::RowsAffected { command: ByteStr::from_static("SELECT"), rows: 7 });

        let begin = CommandComplete::decode_body(Bytes::from_static(b"BEGIN\0"), Charset::UTF8).unwrap();
        assert_eq!(begin.tag, CommandTag::NameOnly { command: ByteStr::from_static("BEGIN") });
    }

    #[test]
    fn data_row_null_sentinel() {
        let mut body = bytes::BytesMut::new();
        body.extend_from_slice(&2i16.to_be_bytes());
        body.extend_from_slice(&(-1i32).to_be_bytes());
        body.extend_from_slice(&3i32.to_be_bytes());
        body.extend_from_slice(b"abc");

        let row = DataRow::decode_body(body.freeze(), Charset::UTF8).unwrap();
        assert_eq!(row.columns[0], None);
        assert_eq!(row.columns[1].as_deref(), Some(&b"abc"[..]));
    }

    #[test]
    fn data_row_rejects_malformed_negative_length() {
        let mut body = bytes::BytesMut::new();
        body.extend_from_slice(&1i16.to_be_bytes());
        body.extend_from_slice(&(-2i32).to_be_bytes());

        let err = DataRow::decode_body(body.freeze(), Charset::UTF8).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedColumnLength(-2)));
    }

    #[test]
    fn copy_response_rejects_binary_column_under_text_overall() {
        let mut body = bytes::BytesMut::new();
        body.extend_from_slice(&[0]); // overall: Text
        body.extend_from_slice(&2i16.to_be_bytes());
        body.extend_from_slice(&0i16.to_be_bytes()); // col 0: Text
        body.extend_from_slice(&1i16.to_be_bytes()); // col 1: Binary

        let err = CopyResponse::decode(body.freeze()).unwrap_err();
        assert!(matches!(err, ProtocolError::UnexpectedBinaryColumnFormat { columns } if columns == vec![1]));
    }

    #[test]
    fn unsupported_message_type_is_reported() {
        let err = BackendMessage::decode(b'?', Bytes::new(), Charset::UTF8).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedMessageType(b'?')));
    }

    #[test]
    fn error_response_collects_recognized_fields_and_ignores_unknown() {
        let mut body = bytes::BytesMut::new();
        body.extend_from_slice(b"SERROR\0");
        body.extend_from_slice(b"Csyntax_error\0");
        body.extend_from_slice(b"Zignored\0"); // unrecognized tag
        body.extend_from_slice(&[0]);

        let fields = ResponseFields::decode(body.freeze(), Charset::UTF8).unwrap();
        assert_eq!(fields.severity().unwrap().as_ref(), "ERROR");
        assert_eq!(fields.sql_state().unwrap().as_ref(), "syntax_error");
    }

    #[test]
    fn row_description_computed_column_is_resolved_text() {
        // `SELECT 1` style computed columns report table_oid == 0 and
        // column == 0 despite being fully resolved to text format 0 — format
        // 0 alone (not the oid/column pair) decides "unresolved".
        let mut body = bytes::BytesMut::new();
        body.extend_from_slice(&1i16.to_be_bytes()); // field count
        body.extend_from_slice(b"?column?\0");
        body.extend_from_slice(&0u32.to_be_bytes()); // table_oid
        body.extend_from_slice(&0i16.to_be_bytes()); // column
        body.extend_from_slice(&23u32.to_be_bytes()); // data_type_oid (int4)
        body.extend_from_slice(&4i16.to_be_bytes()); // type_size
        body.extend_from_slice(&(-1i32).to_be_bytes()); // type_modifier
        body.extend_from_slice(&0i16.to_be_bytes()); // format code 0

        let desc = RowDescription::decode_body(body.freeze(), Charset::UTF8).unwrap();
        assert_eq!(desc.fields[0].format, None);
    }
}
