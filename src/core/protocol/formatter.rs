//! Frame codec: [`ConnectionMessage`] <-> raw WebSocket frame.
//!
//! # Wire format
//!
//! Headers are rendered as `"{name}: {value}\r\n"` in insertion order; call
//! that block `H`.
//!
//! Text frames:
//!
//! ```text
//! H \r\n body
//! ```
//!
//! Binary frames:
//!
//! ```text
//! +-----------------+----------------------+------------------+
//! | L (2 bytes)     | H as Latin-1 (L)     | body (optional)  |
//! +-----------------+----------------------+------------------+
//! ```
//!
//! On the way in, header names are lower-cased and trimmed while values are
//! trimmed. Outbound names keep whatever case the caller used, so a round
//! trip is lossy in name case only.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use super::headers::Headers;
use super::message::{ConnectionMessage, Payload};
use crate::errors::protocol_error::{ProtocolError, ProtocolResult};

/// Size of the binary header-length prefix.
pub const HEADER_LENGTH_SIZE: usize = 2;

/// Separator between the header block and the body of a text frame.
const TEXT_BODY_SEPARATOR: &str = "\r\n\r\n";

/// Byte order of the binary header-length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLengthOrder {
    BigEndian,
    LittleEndian,
}

impl HeaderLengthOrder {
    #[inline]
    fn encode(self, len: u16) -> [u8; 2] {
        match self {
            Self::BigEndian => len.to_be_bytes(),
            Self::LittleEndian => len.to_le_bytes(),
        }
    }

    #[inline]
    fn decode(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::BigEndian => u16::from_be_bytes(bytes),
            Self::LittleEndian => u16::from_le_bytes(bytes),
        }
    }
}

/// Byte order used by the service for the header-length prefix.
pub const HEADER_LENGTH_BYTE_ORDER: HeaderLengthOrder = HeaderLengthOrder::BigEndian;

/// One transport-level WebSocket frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFrame {
    Text(String),
    Binary(Bytes),
}

/// Conversion between protocol messages and transport frames.
pub trait MessageFormatter: Send + Sync {
    /// Serialize a message into a single frame.
    fn to_frame(&self, message: &ConnectionMessage) -> ProtocolResult<RawFrame>;

    /// Parse a frame back into a message. All-or-nothing.
    fn from_frame(&self, frame: &RawFrame) -> ProtocolResult<ConnectionMessage>;
}

/// The speech service frame codec.
///
/// Stateless; share one instance freely across tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebsocketMessageFormatter {
    byte_order: HeaderLengthOrder,
}

impl Default for WebsocketMessageFormatter {
    fn default() -> Self {
        Self {
            byte_order: HEADER_LENGTH_BYTE_ORDER,
        }
    }
}

impl WebsocketMessageFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different byte order for the binary header-length prefix.
    pub fn with_byte_order(byte_order: HeaderLengthOrder) -> Self {
        Self { byte_order }
    }

    pub fn byte_order(&self) -> HeaderLengthOrder {
        self.byte_order
    }

    fn encode_binary(&self, headers: &str, body: Option<&Bytes>) -> ProtocolResult<Bytes> {
        let header_bytes = latin1_encode(headers)?;
        let header_len = u16::try_from(header_bytes.len()).map_err(|_| {
            ProtocolError::format(format!(
                "Header block of {} bytes exceeds the {} byte limit",
                header_bytes.len(),
                u16::MAX
            ))
        })?;

        let body_len = body.map_or(0, |b| b.len());
        let mut frame = BytesMut::with_capacity(HEADER_LENGTH_SIZE + header_bytes.len() + body_len);
        frame.put_slice(&self.byte_order.encode(header_len));
        frame.put_slice(&header_bytes);
        if let Some(body) = body {
            frame.put_slice(body);
        }

        Ok(frame.freeze())
    }

    fn decode_binary(&self, data: &Bytes) -> ProtocolResult<ConnectionMessage> {
        if data.len() < HEADER_LENGTH_SIZE {
            return Err(ProtocolError::format(format!(
                "Header length missing: frame is {} bytes",
                data.len()
            )));
        }

        let header_len = self.byte_order.decode([data[0], data[1]]) as usize;
        let body_start = HEADER_LENGTH_SIZE + header_len;
        if data.len() < body_start {
            return Err(ProtocolError::format(format!(
                "Header content missing: expected {} header bytes, frame has {}",
                header_len,
                data.len() - HEADER_LENGTH_SIZE
            )));
        }

        let header_block = latin1_decode(&data[HEADER_LENGTH_SIZE..body_start]);
        let headers = parse_headers(&header_block);

        let body = (data.len() > body_start).then(|| data.slice(body_start..));

        Ok(ConnectionMessage::binary(headers, body))
    }
}

impl MessageFormatter for WebsocketMessageFormatter {
    fn to_frame(&self, message: &ConnectionMessage) -> ProtocolResult<RawFrame> {
        let headers = render_headers(message.headers());

        match message.payload() {
            Payload::Text(body) => {
                let body = body.as_deref().unwrap_or_default();
                let mut payload = String::with_capacity(headers.len() + 2 + body.len());
                payload.push_str(&headers);
                payload.push_str("\r\n");
                payload.push_str(body);
                Ok(RawFrame::Text(payload))
            }
            Payload::Binary(body) => self
                .encode_binary(&headers, body.as_ref())
                .map(RawFrame::Binary),
        }
    }

    fn from_frame(&self, frame: &RawFrame) -> ProtocolResult<ConnectionMessage> {
        let result = match frame {
            RawFrame::Text(text) => Ok(decode_text(text)),
            RawFrame::Binary(data) => self.decode_binary(data),
        };

        if let Err(ref e) = result {
            debug!("Rejected inbound frame: {}", e);
        }

        result
    }
}

fn decode_text(text: &str) -> ConnectionMessage {
    match text.split_once(TEXT_BODY_SEPARATOR) {
        Some((header_block, body)) => {
            ConnectionMessage::text(parse_headers(header_block), Some(body.to_string()))
        }
        None => ConnectionMessage::text(Headers::new(), None),
    }
}

/// Render headers as `"{name}: {value}\r\n"` lines in insertion order.
fn render_headers(headers: &Headers) -> String {
    let mut block = String::new();
    for (name, value) in headers.iter() {
        block.push_str(name);
        block.push_str(": ");
        block.push_str(value);
        block.push_str("\r\n");
    }
    block
}

/// Parse a header block.
///
/// Lines are split on any run of CR/LF. Each line splits on its first `:`;
/// the name is trimmed and lower-cased and the value trimmed. A line with no
/// colon becomes a header named after the whole line with an empty value.
pub(crate) fn parse_headers(block: &str) -> Headers {
    let mut headers = Headers::new();

    for line in block.split(['\r', '\n']).filter(|l| !l.is_empty()) {
        let (name, value) = line.split_once(':').unwrap_or((line, ""));
        headers.insert(name.trim().to_lowercase(), value.trim());
    }

    headers
}

fn latin1_encode(text: &str) -> ProtocolResult<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                ProtocolError::format(format!(
                    "Header character {c:?} cannot be encoded as a single byte"
                ))
            })
        })
        .collect()
}

fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
