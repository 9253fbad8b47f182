//! Typed service events decoded from inbound speech messages.
//!
//! The service answers each turn with a fixed sequence of paths:
//!
//! ```text
//! turn.start -> speech.startDetected -> speech.hypothesis* / speech.fragment*
//!            -> speech.phrase -> speech.endDetected -> turn.end
//! ```
//!
//! Translation connections replace `speech.hypothesis` / `speech.phrase`
//! with `translation.hypothesis` / `translation.phrase` and may stream
//! synthesized audio as binary `translation.synthesis` messages, closed by
//! `translation.synthesis.end`.
//!
//! Bodies are JSON with `PascalCase` keys. Offsets and durations are in
//! 100-nanosecond ticks from the start of the audio stream.

use std::convert::Infallible;

use bytes::Bytes;
use serde::Deserialize;

use super::speech_message::SpeechConnectionMessage;
use crate::errors::protocol_error::{ProtocolError, ProtocolResult};

const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// Outcome reported by `speech.phrase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionStatus {
    Success,
    NoMatch,
    InitialSilenceTimeout,
    BabbleTimeout,
    Error,
    EndOfDictation,
    /// Status this client does not know about yet.
    Unknown(String),
}

impl RecognitionStatus {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error | Self::BabbleTimeout)
    }
}

impl std::str::FromStr for RecognitionStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Success" => Self::Success,
            "NoMatch" => Self::NoMatch,
            "InitialSilenceTimeout" => Self::InitialSilenceTimeout,
            "BabbleTimeout" => Self::BabbleTimeout,
            "Error" => Self::Error,
            "EndOfDictation" => Self::EndOfDictation,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for RecognitionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserialize_from_str(deserializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnContext {
    #[serde(default)]
    pub service_tag: Option<String>,
}

/// Body of `turn.start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TurnStart {
    #[serde(default)]
    pub context: TurnContext,
}

/// Body of `speech.startDetected` and `speech.endDetected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeechBoundary {
    pub offset: u64,
}

impl SpeechBoundary {
    #[inline]
    pub fn offset_seconds(&self) -> f64 {
        self.offset as f64 / TICKS_PER_SECOND
    }
}

/// Body of `speech.hypothesis` and `speech.fragment`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeechHypothesis {
    pub text: String,
    pub offset: u64,
    pub duration: u64,
}

/// One ranked alternative of a detailed phrase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NBestEntry {
    pub confidence: f64,
    pub lexical: String,
    #[serde(rename = "ITN")]
    pub itn: String,
    #[serde(rename = "MaskedITN")]
    pub masked_itn: String,
    pub display: String,
}

/// Body of `speech.phrase`, in either simple or detailed output format.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeechPhrase {
    pub recognition_status: RecognitionStatus,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub duration: u64,
    /// Present in the simple output format.
    #[serde(default)]
    pub display_text: Option<String>,
    /// Present in the detailed output format.
    #[serde(default, rename = "NBest")]
    pub nbest: Option<Vec<NBestEntry>>,
}

impl SpeechPhrase {
    /// Best display text: `DisplayText`, else the first NBest entry.
    pub fn transcript(&self) -> Option<&str> {
        if let Some(ref text) = self.display_text {
            return Some(text.as_str());
        }

        self.nbest
            .as_ref()
            .and_then(|nbest| nbest.first())
            .map(|best| best.display.as_str())
    }

    pub fn start_seconds(&self) -> f64 {
        self.offset as f64 / TICKS_PER_SECOND
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration as f64 / TICKS_PER_SECOND
    }
}

/// Outcome of the translation step in `translation.*` bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationStatus {
    Success,
    Error,
    Unknown(String),
}

impl std::str::FromStr for TranslationStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Success" => Self::Success,
            "Error" => Self::Error,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for TranslationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserialize_from_str(deserializer)
    }
}

/// One target language of a translation result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Translation {
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranslationResult {
    pub translation_status: TranslationStatus,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

impl TranslationResult {
    /// Translated text for `language`, compared case-insensitively.
    pub fn text_for(&self, language: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.language.eq_ignore_ascii_case(language))
            .map(|t| t.text.as_str())
    }
}

/// Body of `translation.hypothesis`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranslationHypothesis {
    pub text: String,
    pub offset: u64,
    pub duration: u64,
    pub translation: TranslationResult,
}

/// Body of `translation.phrase`.
///
/// `Translation` is absent when recognition itself did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranslationPhrase {
    pub recognition_status: RecognitionStatus,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub translation: Option<TranslationResult>,
}

impl TranslationPhrase {
    pub fn is_translated(&self) -> bool {
        self.translation
            .as_ref()
            .is_some_and(|t| t.translation_status == TranslationStatus::Success)
    }
}

/// Status carried by `translation.synthesis.end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisStatus {
    Success,
    SynthesisEnd,
    Error,
    Unknown(String),
}

impl std::str::FromStr for SynthesisStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Success" => Self::Success,
            "SynthesisEnd" => Self::SynthesisEnd,
            "Error" => Self::Error,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for SynthesisStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserialize_from_str(deserializer)
    }
}

/// Body of `translation.synthesis.end`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranslationSynthesisEnd {
    pub synthesis_status: SynthesisStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr<Err = Infallible>,
{
    let s = String::deserialize(deserializer)?;
    match s.parse::<T>() {
        Ok(value) => Ok(value),
        Err(never) => match never {},
    }
}

/// A decoded inbound service message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    TurnStart(TurnStart),
    SpeechStartDetected(SpeechBoundary),
    SpeechHypothesis(SpeechHypothesis),
    SpeechFragment(SpeechHypothesis),
    SpeechPhrase(SpeechPhrase),
    SpeechEndDetected(SpeechBoundary),
    TranslationHypothesis(TranslationHypothesis),
    TranslationPhrase(TranslationPhrase),
    /// A chunk of synthesized audio; `None` when the message had no body.
    TranslationSynthesis(Option<Bytes>),
    TranslationSynthesisEnd(TranslationSynthesisEnd),
    TurnEnd,
    /// A path this client does not interpret.
    Unknown { path: String },
}

impl ServiceEvent {
    /// Decode the event carried by `message`, dispatching on its path
    /// case-insensitively.
    pub fn from_message(message: &SpeechConnectionMessage) -> ProtocolResult<Self> {
        let path = message.path();
        let body = message.text_body().unwrap_or_default();

        let event = match path.to_ascii_lowercase().as_str() {
            "translation.synthesis" => {
                ServiceEvent::TranslationSynthesis(message.binary_body().cloned())
            }
            "turn.start" => ServiceEvent::TurnStart(parse_body(path, body)?),
            "speech.startdetected" => ServiceEvent::SpeechStartDetected(parse_body(path, body)?),
            "speech.hypothesis" => ServiceEvent::SpeechHypothesis(parse_body(path, body)?),
            "speech.fragment" => ServiceEvent::SpeechFragment(parse_body(path, body)?),
            "speech.phrase" => ServiceEvent::SpeechPhrase(parse_body(path, body)?),
            "speech.enddetected" if body.trim().is_empty() => {
                ServiceEvent::SpeechEndDetected(SpeechBoundary::default())
            }
            "speech.enddetected" => ServiceEvent::SpeechEndDetected(parse_body(path, body)?),
            "translation.hypothesis" => {
                ServiceEvent::TranslationHypothesis(parse_body(path, body)?)
            }
            "translation.phrase" => ServiceEvent::TranslationPhrase(parse_body(path, body)?),
            "translation.synthesis.end" => {
                ServiceEvent::TranslationSynthesisEnd(parse_body(path, body)?)
            }
            "turn.end" => ServiceEvent::TurnEnd,
            _ => ServiceEvent::Unknown {
                path: path.to_string(),
            },
        };

        Ok(event)
    }

    /// Whether this event closes the turn.
    #[inline]
    pub fn is_turn_end(&self) -> bool {
        matches!(self, ServiceEvent::TurnEnd)
    }
}

impl TryFrom<&SpeechConnectionMessage> for ServiceEvent {
    type Error = ProtocolError;

    fn try_from(message: &SpeechConnectionMessage) -> Result<Self, Self::Error> {
        Self::from_message(message)
    }
}

fn parse_body<'a, T: Deserialize<'a>>(path: &str, body: &'a str) -> ProtocolResult<T> {
    serde_json::from_str(body).map_err(|e| ProtocolError::InvalidBody {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
