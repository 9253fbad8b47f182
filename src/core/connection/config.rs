//! Recognizer and endpoint settings that shape a connection URL.

use super::region::SpeechRegion;
use crate::core::protocol::SpeechServiceConfig;

/// Recognition mode; selects the service path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionMode {
    /// Short single-utterance requests.
    #[default]
    Interactive,
    /// Longer turns between humans.
    Conversation,
    /// Long-form dictation with explicit punctuation.
    Dictation,
}

impl RecognitionMode {
    pub const INTERACTIVE_PATH: &'static str =
        "/speech/recognition/interactive/cognitiveservices/v1";
    pub const CONVERSATION_PATH: &'static str =
        "/speech/recognition/conversation/cognitiveservices/v1";
    pub const DICTATION_PATH: &'static str = "/speech/recognition/dictation/cognitiveservices/v1";

    /// The URL path for this mode.
    #[inline]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Interactive => Self::INTERACTIVE_PATH,
            Self::Conversation => Self::CONVERSATION_PATH,
            Self::Dictation => Self::DICTATION_PATH,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::Conversation => "conversation",
            Self::Dictation => "dictation",
        }
    }
}

impl std::str::FromStr for RecognitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interactive" => Ok(Self::Interactive),
            "conversation" => Ok(Self::Conversation),
            "dictation" => Ok(Self::Dictation),
            other => Err(format!(
                "Unknown recognition mode '{other}', expected interactive, conversation or dictation"
            )),
        }
    }
}

/// Result detail level, sent as the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `DisplayText` only.
    #[default]
    Simple,
    /// `NBest` alternatives with confidence scores.
    Detailed,
}

impl OutputFormat {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Detailed => "detailed",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "detailed" => Ok(Self::Detailed),
            other => Err(format!(
                "Unknown output format '{other}', expected simple or detailed"
            )),
        }
    }
}

/// What to recognize and how results are shaped.
///
/// # Example
///
/// ```rust
/// use speechlink::core::connection::{OutputFormat, RecognitionMode, RecognizerConfig};
///
/// let config = RecognizerConfig {
///     mode: RecognitionMode::Dictation,
///     language: "en-US".to_string(),
///     format: OutputFormat::Detailed,
///     ..Default::default()
/// };
/// assert!(config.mode.path().contains("dictation"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerConfig {
    pub mode: RecognitionMode,
    /// BCP-47 language tag, e.g. `en-US`.
    pub language: String,
    pub format: OutputFormat,
    /// Body of the `speech.config` message sent after connecting.
    pub speech_config: SpeechServiceConfig,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            mode: RecognitionMode::default(),
            language: "en-US".to_string(),
            format: OutputFormat::default(),
            speech_config: SpeechServiceConfig::default(),
        }
    }
}

/// Where connections go. Passed to the factory explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// `wss` in production, `ws` for local test servers.
    pub scheme: String,
    /// Host with optional port, no path.
    pub host: String,
    /// Appends `testhooks=1` to the query string.
    pub test_hooks: bool,
}

impl EndpointConfig {
    pub const DEFAULT_SCHEME: &'static str = "wss";

    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: Self::DEFAULT_SCHEME.to_string(),
            host: host.into(),
            test_hooks: false,
        }
    }

    /// Endpoint for a region's recognition host.
    pub fn for_region(region: &SpeechRegion) -> Self {
        Self::new(region.stt_hostname())
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_test_hooks(mut self, enabled: bool) -> Self {
        self.test_hooks = enabled;
        self
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::for_region(&SpeechRegion::default())
    }
}
