//! Credentials for the speech service WebSocket handshake.
//!
//! The service accepts either a subscription key or a short-lived bearer
//! token. Both are modelled as an [`Authentication`] provider returning the
//! header name and value to put on the upgrade request:
//!
//! - [`SubscriptionKeyAuthentication`]: `Ocp-Apim-Subscription-Key: <key>`
//! - [`TokenAuthentication`]: `Authorization: Bearer <token>` from caller
//!   supplied fetch callbacks
//! - [`IssueTokenAuthentication`]: exchanges a subscription key for a bearer
//!   token at the region's `issueToken` endpoint and caches it
//!
//! # Example
//!
//! ```rust
//! use speechlink::auth::{Authentication, SubscriptionKeyAuthentication};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = SubscriptionKeyAuthentication::new("your-subscription-key")?;
//! let info = auth.fetch("fetch-event-id").await?;
//! assert_eq!(info.header_name, "Ocp-Apim-Subscription-Key");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod subscription_key;
pub mod token;

use async_trait::async_trait;

use crate::errors::auth_error::AuthResult;

pub use client::IssueTokenAuthentication;
pub use subscription_key::SubscriptionKeyAuthentication;
pub use token::{TokenAuthentication, TokenFetchCallback};

/// The HTTP header name for subscription key authentication.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// The HTTP header name for bearer token authentication.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header name and value to authenticate one connection.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthInfo {
    pub header_name: String,
    pub token: String,
}

impl AuthInfo {
    pub fn new(header_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInfo")
            .field("header_name", &self.header_name)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Format a token as a bearer `Authorization` value.
#[inline]
pub fn build_bearer_token_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// Source of credentials for new connections.
///
/// Both methods may be called any number of times. `fetch` may return a
/// cached credential; `fetch_on_expiry` is used after the service rejected
/// the previous one and must not return it again.
#[async_trait]
pub trait Authentication: Send + Sync {
    /// Credentials for a new connection.
    ///
    /// `auth_fetch_event_id` correlates the fetch with connection telemetry.
    async fn fetch(&self, auth_fetch_event_id: &str) -> AuthResult<AuthInfo>;

    /// Fresh credentials after the previous ones were rejected.
    async fn fetch_on_expiry(&self, auth_fetch_event_id: &str) -> AuthResult<AuthInfo>;
}
