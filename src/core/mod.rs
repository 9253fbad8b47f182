pub mod connection;
pub mod protocol;

// Re-export commonly used types for convenience
pub use connection::{
    ConnectionFactory, EndpointConfig, OutputFormat, RecognitionMode, RecognizerConfig,
    SpeechConnectionFactory, SpeechRegion, SpeechSocket, WebsocketConnection,
};

pub use protocol::{
    ConnectionMessage, Headers, MessageFormatter, MessageType, Payload, RawFrame, ServiceEvent,
    SpeechConnectionMessage, WebsocketMessageFormatter,
};
