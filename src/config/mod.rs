//! Client configuration
//!
//! Settings for connecting to the speech service, loaded from environment
//! variables or from a YAML file. Environment variables always override YAML
//! values.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable names and loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use speechlink::config::ClientConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ClientConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config = ClientConfig::from_file(&PathBuf::from("speech.yaml"))?;
//!
//! let endpoint = config.endpoint_config()?;
//! println!("Connecting to {}://{}", endpoint.scheme, endpoint.host);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    Authentication, IssueTokenAuthentication, SubscriptionKeyAuthentication, TokenAuthentication,
    TokenFetchCallback,
};
use crate::core::connection::{
    EndpointConfig, OutputFormat, RecognitionMode, RecognizerConfig, SpeechConnectionFactory,
    SpeechRegion,
};
use crate::errors::auth_error::{AuthError, AuthResult};

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use env::keys;

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_AUTH_TIMEOUT_SECONDS: u64 = 10;

/// Client configuration
///
/// Contains everything needed to reach the speech service:
/// - Endpoint (region or explicit host, scheme, test hooks)
/// - Credentials (subscription key, static token, token exchange)
/// - Recognition settings (mode, language, output format)
#[derive(Clone)]
pub struct ClientConfig {
    // Endpoint
    pub region: Option<SpeechRegion>,
    pub host: Option<String>,
    pub scheme: String,
    pub test_hooks: bool,

    // Credentials
    pub subscription_key: Option<String>,
    pub auth_token: Option<String>,
    pub use_token_exchange: bool,
    pub auth_timeout_seconds: u64,

    // Recognition
    pub language: String,
    pub output_format: OutputFormat,
    pub recognition_mode: RecognitionMode,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("region", &self.region)
            .field("host", &self.host)
            .field("scheme", &self.scheme)
            .field("test_hooks", &self.test_hooks)
            .field(
                "subscription_key",
                &self.subscription_key.as_ref().map(|_| "<redacted>"),
            )
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("use_token_exchange", &self.use_token_exchange)
            .field("auth_timeout_seconds", &self.auth_timeout_seconds)
            .field("language", &self.language)
            .field("output_format", &self.output_format)
            .field("recognition_mode", &self.recognition_mode)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: None,
            host: None,
            scheme: EndpointConfig::DEFAULT_SCHEME.to_string(),
            test_hooks: false,
            subscription_key: None,
            auth_token: None,
            use_token_exchange: false,
            auth_timeout_seconds: DEFAULT_AUTH_TIMEOUT_SECONDS,
            language: DEFAULT_LANGUAGE.to_string(),
            output_format: OutputFormat::default(),
            recognition_mode: RecognitionMode::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file with environment variable overrides
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables
    /// 2. YAML file values
    /// 3. Default values
    ///
    /// The merged configuration is validated before it is returned.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        // Only real environment variables override the file; .env is not read here.
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;

        tracing::debug!("Loaded speech client configuration from {}", path.display());
        Ok(config)
    }

    /// Whether connections authenticate with bearer tokens.
    pub fn uses_bearer_token(&self) -> bool {
        self.auth_token.is_some() || self.use_token_exchange
    }

    /// Host and scheme for new connections.
    ///
    /// An explicit host wins over the region's host.
    pub fn endpoint_config(&self) -> Result<EndpointConfig, Box<dyn std::error::Error>> {
        let host = match (&self.host, &self.region) {
            (Some(host), _) => host.clone(),
            (None, Some(region)) => region.stt_hostname(),
            (None, None) => {
                return Err(
                    format!("Either {} or {} must be set", keys::HOST, keys::REGION).into(),
                );
            }
        };

        Ok(EndpointConfig::new(host)
            .with_scheme(self.scheme.clone())
            .with_test_hooks(self.test_hooks))
    }

    pub fn recognizer_config(&self) -> RecognizerConfig {
        RecognizerConfig {
            mode: self.recognition_mode,
            language: self.language.clone(),
            format: self.output_format,
            ..Default::default()
        }
    }

    /// Connection factory bound to [`ClientConfig::endpoint_config`].
    pub fn connection_factory(
        &self,
    ) -> Result<SpeechConnectionFactory, Box<dyn std::error::Error>> {
        Ok(SpeechConnectionFactory::new(self.endpoint_config()?))
    }

    /// Credential provider for the configured auth method.
    ///
    /// A static token takes precedence, then token exchange, then the plain
    /// subscription key.
    pub fn authentication(&self) -> AuthResult<Arc<dyn Authentication>> {
        if let Some(token) = &self.auth_token {
            let token = token.clone();
            let callback: TokenFetchCallback = Arc::new(move |_id| {
                let token = token.clone();
                Box::pin(async move { Ok(token) })
            });
            return Ok(Arc::new(TokenAuthentication::new(callback.clone(), callback)));
        }

        let subscription_key = self.subscription_key.clone().ok_or_else(|| {
            AuthError::ConfigError(format!(
                "{} or {} must be set",
                keys::SUBSCRIPTION_KEY,
                keys::AUTH_TOKEN
            ))
        })?;

        if self.use_token_exchange {
            let region = self.region.as_ref().ok_or_else(|| {
                AuthError::ConfigError(format!(
                    "{} is required when {} is enabled",
                    keys::REGION,
                    keys::USE_TOKEN_EXCHANGE
                ))
            })?;
            let auth = IssueTokenAuthentication::new(
                region.token_endpoint(),
                subscription_key,
                Duration::from_secs(self.auth_timeout_seconds),
            )?;
            return Ok(Arc::new(auth));
        }

        Ok(Arc::new(SubscriptionKeyAuthentication::new(subscription_key)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AUTHORIZATION_HEADER, SUBSCRIPTION_KEY_HEADER};

    fn base_config() -> ClientConfig {
        ClientConfig {
            region: Some(SpeechRegion::WestEurope),
            subscription_key: Some("key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_from_region() {
        let endpoint = base_config().endpoint_config().unwrap();
        assert_eq!(endpoint.host, "westeurope.stt.speech.microsoft.com");
        assert_eq!(endpoint.scheme, "wss");
        assert!(!endpoint.test_hooks);
    }

    #[test]
    fn test_explicit_host_wins_over_region() {
        let config = ClientConfig {
            host: Some("localhost:8080".to_string()),
            scheme: "ws".to_string(),
            test_hooks: true,
            ..base_config()
        };
        let endpoint = config.endpoint_config().unwrap();
        assert_eq!(endpoint.host, "localhost:8080");
        assert_eq!(endpoint.scheme, "ws");
        assert!(endpoint.test_hooks);
    }

    #[test]
    fn test_endpoint_requires_host_or_region() {
        let config = ClientConfig {
            region: None,
            ..base_config()
        };
        assert!(config.endpoint_config().is_err());
        assert!(config.connection_factory().is_err());
    }

    #[test]
    fn test_recognizer_config() {
        let config = ClientConfig {
            language: "de-DE".to_string(),
            output_format: OutputFormat::Detailed,
            recognition_mode: RecognitionMode::Conversation,
            ..base_config()
        };
        let recognizer = config.recognizer_config();
        assert_eq!(recognizer.language, "de-DE");
        assert_eq!(recognizer.format, OutputFormat::Detailed);
        assert_eq!(recognizer.mode, RecognitionMode::Conversation);
    }

    #[tokio::test]
    async fn test_subscription_key_authentication() {
        let auth = base_config().authentication().unwrap();
        let info = auth.fetch("evt").await.unwrap();
        assert_eq!(info.header_name, SUBSCRIPTION_KEY_HEADER);
        assert_eq!(info.token, "key");
    }

    #[tokio::test]
    async fn test_static_token_takes_precedence() {
        let config = ClientConfig {
            auth_token: Some("static".to_string()),
            ..base_config()
        };
        assert!(config.uses_bearer_token());

        let auth = config.authentication().unwrap();
        let info = auth.fetch_on_expiry("evt").await.unwrap();
        assert_eq!(info.header_name, AUTHORIZATION_HEADER);
        assert_eq!(info.token, "Bearer static");
    }

    #[test]
    fn test_token_exchange_requires_region() {
        let config = ClientConfig {
            region: None,
            host: Some("localhost".to_string()),
            use_token_exchange: true,
            ..base_config()
        };
        assert!(matches!(config.authentication(), Err(AuthError::ConfigError(_))));
    }

    #[test]
    fn test_missing_credentials() {
        let config = ClientConfig {
            subscription_key: None,
            ..base_config()
        };
        assert!(matches!(config.authentication(), Err(AuthError::ConfigError(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig {
            auth_token: Some("very-secret-token".to_string()),
            ..base_config()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret-token"));
        assert!(!debug.contains("\"key\""));
    }
}
