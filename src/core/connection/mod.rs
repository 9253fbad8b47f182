//! Connections to the speech recognition service.
//!
//! A [`ConnectionFactory`] turns a [`RecognizerConfig`] and the credentials
//! from an [`Authentication`](crate::auth::Authentication) provider into a
//! [`WebsocketConnection`]: the target URL plus upgrade headers. Opening it
//! yields a [`SpeechSocket`] that exchanges
//! [`SpeechConnectionMessage`](crate::core::protocol::SpeechConnectionMessage)s.

pub mod config;
pub mod factory;
pub mod region;
pub mod websocket;

pub use config::{EndpointConfig, OutputFormat, RecognitionMode, RecognizerConfig};
pub use factory::{
    CONNECTION_ID_HEADER, ConnectionFactory, SpeechConnectionFactory, WebsocketConnection,
};
pub use region::SpeechRegion;
pub use websocket::{CONNECT_TIMEOUT, SpeechSocket};
