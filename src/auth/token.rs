use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::{AUTHORIZATION_HEADER, AuthInfo, Authentication, build_bearer_token_header};
use crate::errors::auth_error::{AuthError, AuthResult};

/// Async callback producing a raw bearer token for a fetch event id.
pub type TokenFetchCallback =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = AuthResult<String>> + Send>> + Send + Sync>;

/// Authenticates with bearer tokens obtained by caller-supplied callbacks.
///
/// The callbacks return the raw token; the `Bearer ` prefix is added here.
#[derive(Clone)]
pub struct TokenAuthentication {
    fetch_callback: TokenFetchCallback,
    fetch_on_expiry_callback: TokenFetchCallback,
}

impl TokenAuthentication {
    pub fn new(
        fetch_callback: TokenFetchCallback,
        fetch_on_expiry_callback: TokenFetchCallback,
    ) -> Self {
        Self {
            fetch_callback,
            fetch_on_expiry_callback,
        }
    }

    async fn invoke(
        callback: &TokenFetchCallback,
        auth_fetch_event_id: &str,
    ) -> AuthResult<AuthInfo> {
        let token = callback(auth_fetch_event_id.to_string()).await?;
        if token.is_empty() {
            return Err(AuthError::TokenFetchFailed(
                "token callback returned an empty token".to_string(),
            ));
        }
        Ok(AuthInfo::new(AUTHORIZATION_HEADER, build_bearer_token_header(&token)))
    }
}

#[async_trait]
impl Authentication for TokenAuthentication {
    async fn fetch(&self, auth_fetch_event_id: &str) -> AuthResult<AuthInfo> {
        Self::invoke(&self.fetch_callback, auth_fetch_event_id).await
    }

    async fn fetch_on_expiry(&self, auth_fetch_event_id: &str) -> AuthResult<AuthInfo> {
        Self::invoke(&self.fetch_on_expiry_callback, auth_fetch_event_id).await
    }
}
