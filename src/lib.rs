//! Client SDK plumbing for a streaming speech-recognition WebSocket service.
//!
//! - [`core::protocol`]: message model and the text/binary frame codec
//! - [`core::connection`]: connection factory and WebSocket transport
//! - [`auth`]: credential providers for the upgrade request
//! - [`config`]: client configuration from environment or YAML

pub mod auth;
pub mod config;
pub mod core;
pub mod errors;

// Re-export commonly used items for convenience
pub use auth::{AuthInfo, Authentication};
pub use config::ClientConfig;
pub use crate::core::*;
pub use errors::auth_error::{AuthError, AuthResult};
pub use errors::connection_error::{ConnectionError, ConnectionResult};
pub use errors::protocol_error::{ProtocolError, ProtocolResult};
