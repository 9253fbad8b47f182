use std::env;

use super::env::keys;
use super::utils::parse_bool;
use super::yaml::YamlConfig;
use super::{ClientConfig, DEFAULT_AUTH_TIMEOUT_SECONDS, DEFAULT_LANGUAGE};
use crate::core::connection::{EndpointConfig, OutputFormat, RecognitionMode, SpeechRegion};

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. Environment variables
/// 2. YAML configuration values
/// 3. Default values
///
/// Does not validate; callers run [`super::validation::validate`] on the result.
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();
    let endpoint = yaml.endpoint.unwrap_or_default();
    let auth = yaml.auth.unwrap_or_default();
    let recognition = yaml.recognition.unwrap_or_default();

    // Priority: ENV > YAML > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            env::var($env_var)
                .ok()
                .or($yaml_value)
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Priority: ENV > YAML
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            env::var($env_var).ok().or($yaml_value)
        };
    }

    // Boolean flags: ENV (parsed) > YAML > Default
    macro_rules! get_flag {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            match env::var($env_var) {
                Ok(raw) => parse_bool(&raw).ok_or_else(|| {
                    format!("Invalid {} value '{}': expected true/false", $env_var, raw)
                })?,
                Err(_) => $yaml_value.unwrap_or($default),
            }
        };
    }

    // Endpoint
    let region = get_optional!(keys::REGION, endpoint.region)
        .filter(|r| !r.trim().is_empty())
        .map(|r| r.parse::<SpeechRegion>())
        .transpose()?;
    let host = get_optional!(keys::HOST, endpoint.host).filter(|h| !h.trim().is_empty());
    let scheme = get_value!(
        keys::SCHEME,
        endpoint.scheme,
        EndpointConfig::DEFAULT_SCHEME
    )
    .to_lowercase();
    let test_hooks = get_flag!(keys::TEST_HOOKS, endpoint.test_hooks, false);

    // Credentials
    let subscription_key = get_optional!(keys::SUBSCRIPTION_KEY, auth.subscription_key);
    let auth_token = get_optional!(keys::AUTH_TOKEN, auth.token);
    let use_token_exchange = get_flag!(keys::USE_TOKEN_EXCHANGE, auth.use_token_exchange, false);
    let auth_timeout_seconds = match env::var(keys::AUTH_TIMEOUT_SECONDS) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| format!("Invalid {} value '{raw}': {e}", keys::AUTH_TIMEOUT_SECONDS))?,
        Err(_) => auth.timeout_seconds.unwrap_or(DEFAULT_AUTH_TIMEOUT_SECONDS),
    };

    // Recognition
    let language = get_value!(keys::LANGUAGE, recognition.language, DEFAULT_LANGUAGE);
    let output_format = get_optional!(keys::OUTPUT_FORMAT, recognition.output_format)
        .map(|f| f.parse::<OutputFormat>())
        .transpose()?
        .unwrap_or_default();
    let recognition_mode = get_optional!(keys::RECOGNITION_MODE, recognition.mode)
        .map(|m| m.parse::<RecognitionMode>())
        .transpose()?
        .unwrap_or_default();

    Ok(ClientConfig {
        region,
        host,
        scheme,
        test_hooks,
        subscription_key,
        auth_token,
        use_token_exchange,
        auth_timeout_seconds,
        language,
        output_format,
        recognition_mode,
    })
}
