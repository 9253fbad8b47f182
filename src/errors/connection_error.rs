use super::auth_error::AuthError;
use super::protocol_error::ProtocolError;

/// Errors raised while building or driving a speech service connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// A required argument (auth header, language) was missing or empty
    #[error("Argument must not be empty: {0}")]
    ArgumentNull(String),

    /// The endpoint URL could not be assembled
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value cannot be sent on the upgrade request
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// The WebSocket upgrade could not be completed
    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    /// The service answered the upgrade with a non-101 HTTP status
    #[error("Server rejected upgrade with HTTP {status}: {reason}")]
    Rejected { status: u16, reason: String },

    /// The socket failed after the handshake
    #[error("Transport error: {0}")]
    Transport(String),

    /// The connection is already closed
    #[error("Connection closed")]
    Closed,

    /// Framing error while sending or receiving
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Credentials could not be obtained
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ConnectionError {
    /// Whether the service refused the credentials on the upgrade.
    ///
    /// A 403 usually means an expired token; refreshing it is worth one retry.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, ConnectionError::Rejected { status: 403, .. })
    }
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display_keeps_status() {
        let err = ConnectionError::Rejected {
            status: 401,
            reason: "invalid subscription key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Server rejected upgrade with HTTP 401: invalid subscription key"
        );
        assert!(!err.is_credential_rejection());
    }

    #[test]
    fn test_only_forbidden_is_credential_rejection() {
        let forbidden = ConnectionError::Rejected {
            status: 403,
            reason: "Forbidden".to_string(),
        };
        assert!(forbidden.is_credential_rejection());
        assert!(!ConnectionError::Handshake("timed out".to_string()).is_credential_rejection());
        assert!(!ConnectionError::Closed.is_credential_rejection());
    }
}
