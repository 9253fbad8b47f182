//! Speech service wire protocol.
//!
//! This module provides the message model and the bidirectional frame codec
//! for the speech recognition WebSocket channel:
//!
//! - [`headers`]: ordered header mapping with case-insensitive lookup
//! - [`message`]: the generic [`ConnectionMessage`] model
//! - [`speech_message`]: [`SpeechConnectionMessage`] with typed well-known headers
//! - [`formatter`]: the [`WebsocketMessageFormatter`] frame codec
//! - [`requests`]: builders for outbound `speech.config`, `audio`, ... messages
//! - [`events`]: typed inbound [`ServiceEvent`]s, including translation results
//!
//! # Example
//!
//! ```rust
//! use speechlink::core::protocol::{
//!     MessageFormatter, Payload, RawFrame, SpeechConnectionMessage, WebsocketMessageFormatter,
//! };
//!
//! let formatter = WebsocketMessageFormatter::new();
//! let outbound = SpeechConnectionMessage::new(
//!     Payload::text("{}"),
//!     "speech.context",
//!     "abc-123",
//!     Some("application/json"),
//! )
//! .unwrap();
//!
//! let frame = formatter.to_frame(&outbound.to_connection_message()).unwrap();
//! assert!(matches!(frame, RawFrame::Text(_)));
//!
//! let inbound = formatter.from_frame(&frame).unwrap();
//! let inbound = SpeechConnectionMessage::try_from(inbound).unwrap();
//! assert_eq!(inbound.request_id(), "abc-123");
//! ```

pub mod events;
pub mod formatter;
pub mod headers;
pub mod message;
pub mod requests;
pub mod speech_message;

pub use events::{
    RecognitionStatus, ServiceEvent, SpeechPhrase, SynthesisStatus, TranslationHypothesis,
    TranslationPhrase, TranslationResult, TranslationStatus, TranslationSynthesisEnd,
};
pub use formatter::{
    HEADER_LENGTH_BYTE_ORDER, HeaderLengthOrder, MessageFormatter, RawFrame,
    WebsocketMessageFormatter,
};
pub use headers::Headers;
pub use message::{ConnectionMessage, MessageType, Payload, create_no_dash_guid};
pub use requests::SpeechServiceConfig;
pub use speech_message::SpeechConnectionMessage;
