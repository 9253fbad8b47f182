pub mod auth_error;
pub mod connection_error;
pub mod protocol_error;

pub use auth_error::{AuthError, AuthResult};
pub use connection_error::{ConnectionError, ConnectionResult};
pub use protocol_error::{ProtocolError, ProtocolResult};
