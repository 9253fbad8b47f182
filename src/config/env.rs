use super::ClientConfig;
use super::merge::merge_config;
use super::validation::validate;

/// Environment variable names read by [`ClientConfig`].
pub mod keys {
    pub const REGION: &str = "SPEECH_REGION";
    pub const HOST: &str = "SPEECH_HOST";
    pub const SCHEME: &str = "SPEECH_SCHEME";
    pub const SUBSCRIPTION_KEY: &str = "SPEECH_SUBSCRIPTION_KEY";
    pub const AUTH_TOKEN: &str = "SPEECH_AUTH_TOKEN";
    pub const LANGUAGE: &str = "SPEECH_LANGUAGE";
    pub const OUTPUT_FORMAT: &str = "SPEECH_OUTPUT_FORMAT";
    pub const RECOGNITION_MODE: &str = "SPEECH_RECOGNITION_MODE";
    pub const TEST_HOOKS: &str = "SPEECH_TEST_HOOKS";
    pub const USE_TOKEN_EXCHANGE: &str = "SPEECH_USE_TOKEN_EXCHANGE";
    pub const AUTH_TIMEOUT_SECONDS: &str = "SPEECH_AUTH_TIMEOUT_SECONDS";

    pub const ALL: [&str; 11] = [
        REGION,
        HOST,
        SCHEME,
        SUBSCRIPTION_KEY,
        AUTH_TOKEN,
        LANGUAGE,
        OUTPUT_FORMAT,
        RECOGNITION_MODE,
        TEST_HOOKS,
        USE_TOKEN_EXCHANGE,
        AUTH_TIMEOUT_SECONDS,
    ];
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Reads the `SPEECH_*` variables, with defaults for everything except
    /// credentials and the endpoint. Also loads a `.env` file if present
    /// using dotenvy.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A variable is malformed (unknown mode or format, bad number)
    /// - No credentials or no endpoint are configured
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = merge_config(None)?;
        validate(&config)?;

        tracing::debug!("Loaded speech client configuration from environment");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connection::{OutputFormat, RecognitionMode, SpeechRegion};
    use serial_test::serial;
    use std::env;

    fn cleanup_env_vars() {
        unsafe {
            for key in keys::ALL {
                env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        unsafe {
            env::set_var(keys::REGION, "eastus");
            env::set_var(keys::SUBSCRIPTION_KEY, "env-key");
        }

        let config = ClientConfig::from_env().expect("Should load config");
        assert_eq!(config.region, Some(SpeechRegion::EastUS));
        assert_eq!(config.subscription_key.as_deref(), Some("env-key"));
        assert_eq!(config.scheme, "wss");
        assert_eq!(config.language, "en-US");
        assert_eq!(config.output_format, OutputFormat::Simple);
        assert_eq!(config.recognition_mode, RecognitionMode::Interactive);
        assert_eq!(config.auth_timeout_seconds, 10);
        assert!(!config.test_hooks);
        assert!(!config.use_token_exchange);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_all_values() {
        cleanup_env_vars();

        unsafe {
            env::set_var(keys::HOST, "localhost:9000");
            env::set_var(keys::SCHEME, "ws");
            env::set_var(keys::AUTH_TOKEN, "tok");
            env::set_var(keys::LANGUAGE, "fr-FR");
            env::set_var(keys::OUTPUT_FORMAT, "detailed");
            env::set_var(keys::RECOGNITION_MODE, "dictation");
            env::set_var(keys::TEST_HOOKS, "yes");
            env::set_var(keys::AUTH_TIMEOUT_SECONDS, "3");
        }

        let config = ClientConfig::from_env().expect("Should load config");
        assert_eq!(config.host.as_deref(), Some("localhost:9000"));
        assert_eq!(config.scheme, "ws");
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert_eq!(config.language, "fr-FR");
        assert_eq!(config.output_format, OutputFormat::Detailed);
        assert_eq!(config.recognition_mode, RecognitionMode::Dictation);
        assert!(config.test_hooks);
        assert_eq!(config.auth_timeout_seconds, 3);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_without_credentials_fails() {
        cleanup_env_vars();

        unsafe {
            env::set_var(keys::REGION, "westus");
        }

        let result = ClientConfig::from_env();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains(keys::SUBSCRIPTION_KEY)
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_mode_fails() {
        cleanup_env_vars();

        unsafe {
            env::set_var(keys::REGION, "westus");
            env::set_var(keys::SUBSCRIPTION_KEY, "key");
            env::set_var(keys::RECOGNITION_MODE, "batch");
        }

        let result = ClientConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("batch"));

        cleanup_env_vars();
    }
}
