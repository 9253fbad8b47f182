//! Builders for the messages a client sends during a recognition turn.
//!
//! A turn opens with `speech.config` (once per connection), optionally
//! `speech.context`, then a sequence of `audio` chunks terminated by an
//! `audio` message without a body. `telemetry` is sent when the turn ends.

use bytes::Bytes;
use serde::Serialize;
use sysinfo::System;

use super::message::Payload;
use super::speech_message::SpeechConnectionMessage;
use crate::errors::protocol_error::{ProtocolError, ProtocolResult};

pub const SPEECH_CONFIG_PATH: &str = "speech.config";
pub const SPEECH_CONTEXT_PATH: &str = "speech.context";
pub const AUDIO_PATH: &str = "audio";
pub const TELEMETRY_PATH: &str = "telemetry";

const JSON_CONTENT_TYPE: &str = "application/json";
const UNKNOWN_OS_VERSION: &str = "unknown";

/// SDK identification sent in `context.system`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub version: String,
}

/// Host OS description sent in `context.os`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsInfo {
    pub platform: String,
    pub name: String,
    pub version: String,
}

impl OsInfo {
    /// Describe the running host.
    pub fn current() -> Self {
        Self {
            platform: std::env::consts::FAMILY.to_string(),
            name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            version: System::os_version().unwrap_or_else(|| UNKNOWN_OS_VERSION.to_string()),
        }
    }
}

/// Device description sent in `context.device`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub model: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechContext {
    pub system: SystemInfo,
    pub os: OsInfo,
    pub device: DeviceInfo,
}

/// Body of the `speech.config` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechServiceConfig {
    pub context: SpeechContext,
}

impl Default for SpeechServiceConfig {
    fn default() -> Self {
        Self {
            context: SpeechContext {
                system: SystemInfo {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                os: OsInfo::current(),
                device: DeviceInfo {
                    manufacturer: "SpeechSample".to_string(),
                    model: "SpeechSample".to_string(),
                    version: "1.0.00000".to_string(),
                },
            },
        }
    }
}

impl SpeechServiceConfig {
    pub fn to_json(&self) -> ProtocolResult<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::InvalidBody {
            path: SPEECH_CONFIG_PATH.to_string(),
            reason: e.to_string(),
        })
    }
}

/// `speech.config` for a new connection.
pub fn speech_config_message(
    request_id: &str,
    config: &SpeechServiceConfig,
) -> ProtocolResult<SpeechConnectionMessage> {
    SpeechConnectionMessage::new(
        Payload::text(config.to_json()?),
        SPEECH_CONFIG_PATH,
        request_id,
        Some(JSON_CONTENT_TYPE),
    )
}

/// `speech.context` carrying caller-provided JSON.
pub fn speech_context_message(
    request_id: &str,
    context_json: &str,
) -> ProtocolResult<SpeechConnectionMessage> {
    SpeechConnectionMessage::new(
        Payload::text(context_json),
        SPEECH_CONTEXT_PATH,
        request_id,
        Some(JSON_CONTENT_TYPE),
    )
}

/// One `audio` chunk; `None` marks the end of the audio stream.
pub fn audio_message(
    request_id: &str,
    chunk: Option<Bytes>,
) -> ProtocolResult<SpeechConnectionMessage> {
    SpeechConnectionMessage::new(Payload::Binary(chunk), AUDIO_PATH, request_id, None)
}

/// `telemetry` for a finished turn.
pub fn telemetry_message(
    request_id: &str,
    telemetry_json: &str,
) -> ProtocolResult<SpeechConnectionMessage> {
    SpeechConnectionMessage::new(
        Payload::text(telemetry_json),
        TELEMETRY_PATH,
        request_id,
        Some(JSON_CONTENT_TYPE),
    )
}
