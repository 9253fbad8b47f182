use async_trait::async_trait;

use super::{AuthInfo, Authentication, SUBSCRIPTION_KEY_HEADER};
use crate::errors::auth_error::{AuthError, AuthResult};

/// Authenticates with a static subscription key.
#[derive(Clone)]
pub struct SubscriptionKeyAuthentication {
    auth_info: AuthInfo,
}

impl SubscriptionKeyAuthentication {
    pub fn new(subscription_key: impl Into<String>) -> AuthResult<Self> {
        let subscription_key = subscription_key.into();
        if subscription_key.trim().is_empty() {
            return Err(AuthError::ArgumentNull("subscriptionKey".to_string()));
        }

        Ok(Self {
            auth_info: AuthInfo::new(SUBSCRIPTION_KEY_HEADER, subscription_key),
        })
    }
}

impl std::fmt::Debug for SubscriptionKeyAuthentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionKeyAuthentication")
            .field("subscription_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authentication for SubscriptionKeyAuthentication {
    async fn fetch(&self, _auth_fetch_event_id: &str) -> AuthResult<AuthInfo> {
        Ok(self.auth_info.clone())
    }

    // A key does not expire; hand back the same one.
    async fn fetch_on_expiry(&self, _auth_fetch_event_id: &str) -> AuthResult<AuthInfo> {
        Ok(self.auth_info.clone())
    }
}
