use reqwest::StatusCode;

/// Error codes for structured error reporting
pub mod error_codes {
    pub const ARGUMENT_NULL: &str = "argument_null";
    pub const TOKEN_FETCH_FAILED: &str = "token_fetch_failed";
    pub const TOKEN_SERVICE_ERROR: &str = "token_service_error";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const CONFIG_ERROR: &str = "config_error";
}

/// Errors raised while acquiring credentials for the speech service
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required constructor argument (key, callback) was empty
    #[error("Argument must not be empty: {0}")]
    ArgumentNull(String),

    /// A token fetch callback failed
    #[error("Token fetch failed: {0}")]
    TokenFetchFailed(String),

    /// The token endpoint answered with a non-success status
    #[error("Token service error ({0}): {1}")]
    TokenServiceError(StatusCode, String),

    /// The token endpoint rejected the subscription key
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration error (missing or malformed auth settings)
    #[error("Auth configuration error: {0}")]
    ConfigError(String),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl AuthError {
    /// Get the error code for structured error reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::ArgumentNull(_) => error_codes::ARGUMENT_NULL,
            AuthError::TokenFetchFailed(_) | AuthError::HttpError(_) => {
                error_codes::TOKEN_FETCH_FAILED
            }
            AuthError::TokenServiceError(_, _) => error_codes::TOKEN_SERVICE_ERROR,
            AuthError::Unauthorized(_) => error_codes::UNAUTHORIZED,
            AuthError::ConfigError(_) => error_codes::CONFIG_ERROR,
        }
    }

    /// Whether fetching again with a forced refresh may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::TokenServiceError(status, _) => status.is_server_error(),
            AuthError::HttpError(_) | AuthError::TokenFetchFailed(_) => true,
            _ => false,
        }
    }

    /// Log the error at the appropriate level
    pub fn log(&self) {
        match self {
            AuthError::ArgumentNull(name) => {
                tracing::debug!("Missing auth argument: {}", name);
            }
            AuthError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
            }
            AuthError::TokenServiceError(code, msg) => {
                tracing::warn!("Token service error ({}): {}", code, msg);
            }
            AuthError::TokenFetchFailed(msg) => {
                tracing::error!("Token fetch failed: {}", msg);
            }
            AuthError::ConfigError(msg) => {
                tracing::error!("Auth configuration error: {}", msg);
            }
            AuthError::HttpError(err) => {
                tracing::error!("Auth HTTP error: {}", err);
            }
        }
    }
}

// Result type alias for convenience
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AuthError::ArgumentNull("subscriptionKey".to_string()).error_code(),
            error_codes::ARGUMENT_NULL
        );
        assert_eq!(
            AuthError::Unauthorized("test".to_string()).error_code(),
            error_codes::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::TokenServiceError(StatusCode::BAD_GATEWAY, "x".to_string()).error_code(),
            error_codes::TOKEN_SERVICE_ERROR
        );
    }

    #[test]
    fn test_retryable() {
        assert!(
            AuthError::TokenServiceError(StatusCode::SERVICE_UNAVAILABLE, "x".to_string())
                .is_retryable()
        );
        assert!(
            !AuthError::TokenServiceError(StatusCode::BAD_REQUEST, "x".to_string()).is_retryable()
        );
        assert!(!AuthError::Unauthorized("bad key".to_string()).is_retryable());
        assert!(!AuthError::ArgumentNull("key".to_string()).is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AuthError::ArgumentNull("subscriptionKey".to_string()).to_string(),
            "Argument must not be empty: subscriptionKey"
        );
        assert_eq!(
            AuthError::Unauthorized("invalid key".to_string()).to_string(),
            "Unauthorized: invalid key"
        );
        assert_eq!(
            AuthError::TokenServiceError(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())
                .to_string(),
            "Token service error (500 Internal Server Error): boom"
        );
    }
}
