use serde::Deserialize;
use std::path::Path;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Environment
/// variables override any values specified here.
///
/// # Example YAML structure
/// ```yaml
/// endpoint:
///   region: "westeurope"
///   host: "localhost:9000"   # overrides the region's host
///   scheme: "wss"
///   test_hooks: false
///
/// auth:
///   subscription_key: "your-subscription-key"
///   token: "pre-issued-bearer-token"
///   use_token_exchange: true
///   timeout_seconds: 10
///
/// recognition:
///   language: "en-US"
///   output_format: "detailed"
///   mode: "conversation"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub endpoint: Option<EndpointYaml>,
    pub auth: Option<AuthYaml>,
    pub recognition: Option<RecognitionYaml>,
}

/// Endpoint configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EndpointYaml {
    pub region: Option<String>,
    pub host: Option<String>,
    pub scheme: Option<String>,
    pub test_hooks: Option<bool>,
}

/// Credentials from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub subscription_key: Option<String>,
    pub token: Option<String>,
    pub use_token_exchange: Option<bool>,
    pub timeout_seconds: Option<u64>,
}

/// Recognition settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RecognitionYaml {
    pub language: Option<String>,
    pub output_format: Option<String>,
    pub mode: Option<String>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is malformed, or
    /// a field has the wrong type.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
