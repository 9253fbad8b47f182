use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};

use super::{
    AUTHORIZATION_HEADER, AuthInfo, Authentication, SUBSCRIPTION_KEY_HEADER,
    build_bearer_token_header,
};
use crate::errors::auth_error::{AuthError, AuthResult};

/// Issued tokens are valid for ten minutes; refresh a minute early.
pub const TOKEN_CACHE_TTL: Duration = Duration::from_secs(9 * 60);

/// Cap on the error body carried into [`AuthError`].
const MAX_ERROR_BODY_LEN: usize = 500;

struct CachedToken {
    token: String,
    fetched_at: Instant,
}

/// Exchanges a subscription key for bearer tokens at an `issueToken`
/// endpoint and caches the result.
pub struct IssueTokenAuthentication {
    client: Client,
    token_endpoint: String,
    subscription_key: String,
    cache_ttl: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for IssueTokenAuthentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueTokenAuthentication")
            .field("token_endpoint", &self.token_endpoint)
            .field("subscription_key", &"<redacted>")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl IssueTokenAuthentication {
    /// Create a token exchange client.
    ///
    /// # Arguments
    /// * `token_endpoint` - Full `issueToken` URL, e.g. from
    ///   [`SpeechRegion::token_endpoint`](crate::core::connection::SpeechRegion::token_endpoint)
    /// * `subscription_key` - Key sent as `Ocp-Apim-Subscription-Key`
    /// * `timeout` - Per-request HTTP timeout
    pub fn new(
        token_endpoint: impl Into<String>,
        subscription_key: impl Into<String>,
        timeout: Duration,
    ) -> AuthResult<Self> {
        let token_endpoint = token_endpoint.into();
        let subscription_key = subscription_key.into();

        if token_endpoint.trim().is_empty() {
            return Err(AuthError::ArgumentNull("tokenEndpoint".to_string()));
        }
        if subscription_key.trim().is_empty() {
            return Err(AuthError::ArgumentNull("subscriptionKey".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| AuthError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token_endpoint,
            subscription_key,
            cache_ttl: TOKEN_CACHE_TTL,
            cached: Mutex::new(None),
        })
    }

    /// Override how long an issued token is reused.
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    fn cached_token(&self) -> Option<String> {
        let cached = self.cached.lock();
        cached
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.cache_ttl)
            .map(|c| c.token.clone())
    }

    /// POST to the token endpoint and return the raw token.
    async fn request_token(&self, auth_fetch_event_id: &str) -> AuthResult<String> {
        tracing::debug!(
            "Requesting speech token from {} (event {})",
            self.token_endpoint,
            auth_fetch_event_id
        );

        let response = self
            .client
            .post(&self.token_endpoint)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            let token = response.text().await?.trim().to_string();
            if token.is_empty() {
                return Err(AuthError::TokenFetchFailed(
                    "token endpoint returned an empty body".to_string(),
                ));
            }
            tracing::debug!("Speech token issued");
            return Ok(token);
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        let capped_body = if error_body.len() > MAX_ERROR_BODY_LEN {
            let cut = (0..=MAX_ERROR_BODY_LEN)
                .rev()
                .find(|&i| error_body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated)", &error_body[..cut])
        } else {
            error_body
        };

        let err = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AuthError::Unauthorized(capped_body)
            }
            _ => AuthError::TokenServiceError(status, capped_body),
        };
        err.log();
        Err(err)
    }

    async fn refresh(&self, auth_fetch_event_id: &str) -> AuthResult<AuthInfo> {
        let token = self.request_token(auth_fetch_event_id).await?;
        *self.cached.lock() = Some(CachedToken {
            token: token.clone(),
            fetched_at: Instant::now(),
        });
        Ok(AuthInfo::new(AUTHORIZATION_HEADER, build_bearer_token_header(&token)))
    }
}

#[async_trait]
impl Authentication for IssueTokenAuthentication {
    async fn fetch(&self, auth_fetch_event_id: &str) -> AuthResult<AuthInfo> {
        if let Some(token) = self.cached_token() {
            return Ok(AuthInfo::new(AUTHORIZATION_HEADER, build_bearer_token_header(&token)));
        }
        self.refresh(auth_fetch_event_id).await
    }

    async fn fetch_on_expiry(&self, auth_fetch_event_id: &str) -> AuthResult<AuthInfo> {
        self.cached.lock().take();
        self.refresh(auth_fetch_event_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    const ISSUE_TOKEN_PATH: &str = "/sts/v1.0/issueToken";

    fn auth_for(server: &MockServer) -> IssueTokenAuthentication {
        IssueTokenAuthentication::new(
            format!("{}{}", server.uri(), ISSUE_TOKEN_PATH),
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_arguments() {
        assert!(matches!(
            IssueTokenAuthentication::new("", "key", Duration::from_secs(1)),
            Err(AuthError::ArgumentNull(_))
        ));
        assert!(matches!(
            IssueTokenAuthentication::new("http://localhost/token", " ", Duration::from_secs(1)),
            Err(AuthError::ArgumentNull(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let auth = IssueTokenAuthentication::new(
            "http://localhost/token",
            "super-secret",
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{auth:?}").contains("super-secret"));
    }

    #[tokio::test]
    async fn test_fetch_exchanges_key_for_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ISSUE_TOKEN_PATH))
            .and(header(SUBSCRIPTION_KEY_HEADER, "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string("issued-token"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let info = auth.fetch("evt").await.unwrap();
        assert_eq!(info.header_name, AUTHORIZATION_HEADER);
        assert_eq!(info.token, "Bearer issued-token");
    }

    #[tokio::test]
    async fn test_fetch_reuses_cached_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("cached"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let first = auth.fetch("evt-1").await.unwrap();
        let second = auth.fetch("evt-2").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_on_expiry_forces_refresh() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("tok"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        auth.fetch("evt-1").await.unwrap();
        auth.fetch_on_expiry("evt-2").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("tok"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server).with_cache_ttl(Duration::ZERO);
        auth.fetch("evt-1").await.unwrap();
        auth.fetch("evt-2").await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_statuses() {
        for status in [401u16, 403] {
            let mock_server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status).set_body_string("bad key"))
                .mount(&mock_server)
                .await;

            let err = auth_for(&mock_server).fetch("evt").await.unwrap_err();
            assert!(matches!(err, AuthError::Unauthorized(ref body) if body == "bad key"));
        }
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&mock_server)
            .await;

        let err = auth_for(&mock_server).fetch("evt").await.unwrap_err();
        match err {
            AuthError::TokenServiceError(status, ref body) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "busy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_long_error_body_truncated() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(2000)))
            .mount(&mock_server)
            .await;

        let err = auth_for(&mock_server).fetch("evt").await.unwrap_err();
        let AuthError::TokenServiceError(_, body) = err else {
            panic!("expected token service error");
        };
        assert!(body.ends_with("... (truncated)"));
        assert!(body.len() < 600);
    }

    #[tokio::test]
    async fn test_empty_token_body_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;

        assert!(matches!(
            auth_for(&mock_server).fetch("evt").await,
            Err(AuthError::TokenFetchFailed(_))
        ));
    }
}
