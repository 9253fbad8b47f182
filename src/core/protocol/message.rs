//! Generic protocol message model.

use bytes::Bytes;
use uuid::Uuid;

use super::headers::Headers;

/// Frame kind a message travels as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Text,
    Binary,
}

/// Message body, tagged by kind.
///
/// `None` inside a variant means "no body", which is distinct from an empty
/// string or empty byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(Option<String>),
    Binary(Option<Bytes>),
}

impl Payload {
    #[inline]
    pub fn message_type(&self) -> MessageType {
        match self {
            Payload::Text(_) => MessageType::Text,
            Payload::Binary(_) => MessageType::Binary,
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Payload::Text(Some(body.into()))
    }

    pub fn binary(body: impl Into<Bytes>) -> Self {
        Payload::Binary(Some(body.into()))
    }
}

/// Generate a message or connection identifier: a UUID v4 without dashes.
pub fn create_no_dash_guid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Immutable snapshot of one protocol message.
///
/// The message kind is derived from the payload, so a text message can never
/// carry a binary body. The `id` is only used for correlation by callers and
/// is never put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionMessage {
    payload: Payload,
    headers: Headers,
    id: String,
}

impl ConnectionMessage {
    pub fn new(payload: Payload, headers: Headers) -> Self {
        Self {
            payload,
            headers,
            id: create_no_dash_guid(),
        }
    }

    pub fn text(headers: Headers, body: Option<String>) -> Self {
        Self::new(Payload::Text(body), headers)
    }

    pub fn binary(headers: Headers, body: Option<Bytes>) -> Self {
        Self::new(Payload::Binary(body), headers)
    }

    /// Replace the generated identifier with a caller-supplied one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[inline]
    pub fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Text body; `None` when absent or when this is a binary message.
    pub fn text_body(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(body) => body.as_deref(),
            Payload::Binary(_) => None,
        }
    }

    /// Binary body; `None` when absent or when this is a text message.
    pub fn binary_body(&self) -> Option<&Bytes> {
        match &self.payload {
            Payload::Binary(body) => body.as_ref(),
            Payload::Text(_) => None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn into_parts(self) -> (Payload, Headers, String) {
        (self.payload, self.headers, self.id)
    }
}
