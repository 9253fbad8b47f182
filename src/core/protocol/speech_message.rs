//! Speech-service specialization of [`ConnectionMessage`].
//!
//! A speech message promotes the well-known headers (`path`, `x-requestid`,
//! `x-timestamp`, `content-type`) to typed fields and keeps every other header
//! verbatim in `additional_headers`.
//!
//! # Example
//!
//! ```rust
//! use speechlink::core::protocol::{Payload, SpeechConnectionMessage};
//!
//! let message = SpeechConnectionMessage::new(
//!     Payload::text("{}"),
//!     "speech.context",
//!     "abc-123",
//!     Some("application/json"),
//! )
//! .unwrap();
//!
//! assert_eq!(message.path(), "speech.context");
//! assert!(message.timestamp().is_some());
//! ```

use bytes::Bytes;
use chrono::{SecondsFormat, Utc};

use super::headers::Headers;
use super::message::{ConnectionMessage, MessageType, Payload, create_no_dash_guid};
use crate::errors::protocol_error::{ProtocolError, ProtocolResult};

pub const PATH_HEADER: &str = "path";
pub const REQUEST_ID_HEADER: &str = "x-requestid";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2024-05-01T09:30:12.345Z`.
fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A protocol message carrying the speech-service well-known headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConnectionMessage {
    payload: Payload,
    path: String,
    request_id: String,
    timestamp: Option<String>,
    content_type: Option<String>,
    additional_headers: Headers,
    id: String,
}

impl SpeechConnectionMessage {
    /// Build an outbound speech message.
    ///
    /// `x-timestamp` is always stamped with the current time. `content-type`
    /// is only set when `content_type` is non-empty.
    ///
    /// # Errors
    ///
    /// `ProtocolError::InvalidArgument` when `path` or `request_id` is empty.
    pub fn new(
        payload: Payload,
        path: impl Into<String>,
        request_id: impl Into<String>,
        content_type: Option<&str>,
    ) -> ProtocolResult<Self> {
        let path = path.into();
        let request_id = request_id.into();

        if path.is_empty() {
            return Err(ProtocolError::InvalidArgument("path".to_string()));
        }
        if request_id.is_empty() {
            return Err(ProtocolError::InvalidArgument("requestId".to_string()));
        }

        Ok(Self {
            payload,
            path,
            request_id,
            timestamp: Some(current_timestamp()),
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .map(str::to_string),
            additional_headers: Headers::new(),
            id: create_no_dash_guid(),
        })
    }

    /// Attach extra headers, copied verbatim after the well-known ones.
    ///
    /// Names that collide with a well-known header are not rejected; on the
    /// wire they overwrite the well-known value.
    pub fn with_additional_headers(mut self, headers: Headers) -> Self {
        self.additional_headers.extend(headers);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Rebuild a speech message from a generic inbound message.
    ///
    /// Well-known headers are matched case-insensitively. Everything else
    /// lands in `additional_headers` with its original case. The timestamp is
    /// taken verbatim from `x-timestamp` and left unset when absent.
    ///
    /// # Errors
    ///
    /// `ProtocolError::MissingField` when `path` or `x-requestid` is absent.
    pub fn from_connection_message(message: ConnectionMessage) -> ProtocolResult<Self> {
        let (payload, headers, id) = message.into_parts();

        let mut path = None;
        let mut request_id = None;
        let mut timestamp = None;
        let mut content_type = None;
        let mut additional_headers = Headers::new();

        for (name, value) in headers {
            if name.eq_ignore_ascii_case(PATH_HEADER) {
                path = Some(value);
            } else if name.eq_ignore_ascii_case(REQUEST_ID_HEADER) {
                request_id = Some(value);
            } else if name.eq_ignore_ascii_case(TIMESTAMP_HEADER) {
                timestamp = Some(value);
            } else if name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER) {
                content_type = Some(value);
            } else {
                additional_headers.insert(name, value);
            }
        }

        Ok(Self {
            payload,
            path: path.ok_or(ProtocolError::MissingField(PATH_HEADER))?,
            request_id: request_id.ok_or(ProtocolError::MissingField(REQUEST_ID_HEADER))?,
            timestamp,
            content_type,
            additional_headers,
            id,
        })
    }

    /// Flatten into the generic model.
    ///
    /// Header order: `path`, `x-requestid`, `x-timestamp`, `content-type`,
    /// then additional headers in insertion order.
    pub fn to_connection_message(&self) -> ConnectionMessage {
        let mut headers = Headers::new();
        headers.insert(PATH_HEADER, self.path.as_str());
        headers.insert(REQUEST_ID_HEADER, self.request_id.as_str());
        if let Some(ref timestamp) = self.timestamp {
            headers.insert(TIMESTAMP_HEADER, timestamp.as_str());
        }
        if let Some(ref content_type) = self.content_type {
            headers.insert(CONTENT_TYPE_HEADER, content_type.as_str());
        }
        for (name, value) in self.additional_headers.iter() {
            headers.insert(name, value);
        }

        ConnectionMessage::new(self.payload.clone(), headers).with_id(self.id.as_str())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn additional_headers(&self) -> &Headers {
        &self.additional_headers
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[inline]
    pub fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    pub fn text_body(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(body) => body.as_deref(),
            Payload::Binary(_) => None,
        }
    }

    pub fn binary_body(&self) -> Option<&Bytes> {
        match &self.payload {
            Payload::Binary(body) => body.as_ref(),
            Payload::Text(_) => None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl From<&SpeechConnectionMessage> for ConnectionMessage {
    fn from(message: &SpeechConnectionMessage) -> Self {
        message.to_connection_message()
    }
}

impl TryFrom<ConnectionMessage> for SpeechConnectionMessage {
    type Error = ProtocolError;

    fn try_from(message: ConnectionMessage) -> Result<Self, Self::Error> {
        Self::from_connection_message(message)
    }
}
