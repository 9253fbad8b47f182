/// Errors produced while building, encoding or decoding protocol messages.
///
/// The codec never partially succeeds: any of these means no frame or
/// message was produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A required construction parameter was missing or empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The frame is malformed, or encoding failed.
    #[error("Error formatting the message: {0}")]
    Format(String),

    /// A required well-known header was absent on an inbound message.
    #[error("Missing required header: {0}")]
    MissingField(&'static str),

    /// A service message body could not be interpreted.
    #[error("Invalid message body for '{path}': {reason}")]
    InvalidBody { path: String, reason: String },
}

impl ProtocolError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ProtocolError::Format(msg.into())
    }
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_cause() {
        let err = ProtocolError::format("Header length missing");
        assert_eq!(
            err.to_string(),
            "Error formatting the message: Header length missing"
        );

        let err = ProtocolError::MissingField("path");
        assert_eq!(err.to_string(), "Missing required header: path");
    }
}
