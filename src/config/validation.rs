use super::ClientConfig;
use super::env::keys;

/// Run every check against a merged configuration.
pub fn validate(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_auth_method(&config.subscription_key, &config.auth_token)?;
    validate_token_exchange(config)?;
    validate_endpoint(config)?;
    validate_language(&config.language)?;
    Ok(())
}

/// At least one credential must be configured.
pub fn validate_auth_method(
    subscription_key: &Option<String>,
    auth_token: &Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let has_key = subscription_key
        .as_ref()
        .is_some_and(|k| !k.trim().is_empty());
    let has_token = auth_token.as_ref().is_some_and(|t| !t.trim().is_empty());

    if !has_key && !has_token {
        return Err(format!(
            "Either {} or {} must be configured",
            keys::SUBSCRIPTION_KEY,
            keys::AUTH_TOKEN
        )
        .into());
    }

    Ok(())
}

/// Token exchange needs a subscription key and a region for the token endpoint.
pub fn validate_token_exchange(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.use_token_exchange || config.auth_token.is_some() {
        return Ok(());
    }

    if config.subscription_key.is_none() {
        return Err(format!(
            "{} is required when {} is enabled",
            keys::SUBSCRIPTION_KEY,
            keys::USE_TOKEN_EXCHANGE
        )
        .into());
    }
    if config.region.is_none() {
        return Err(format!(
            "{} is required when {} is enabled",
            keys::REGION,
            keys::USE_TOKEN_EXCHANGE
        )
        .into());
    }

    Ok(())
}

/// A host or a region must be set, and the scheme must be a WebSocket scheme.
pub fn validate_endpoint(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.host.is_none() && config.region.is_none() {
        return Err(format!("Either {} or {} must be set", keys::HOST, keys::REGION).into());
    }

    if let Some(host) = &config.host
        && (host.contains("://") || host.contains('/'))
    {
        return Err(format!("{} must be a bare host[:port], got '{host}'", keys::HOST).into());
    }

    match config.scheme.as_str() {
        "ws" | "wss" => Ok(()),
        other => Err(format!("{} must be 'ws' or 'wss', got '{other}'", keys::SCHEME).into()),
    }
}

pub fn validate_language(language: &str) -> Result<(), Box<dyn std::error::Error>> {
    if language.trim().is_empty() {
        return Err(format!("{} cannot be empty", keys::LANGUAGE).into());
    }
    Ok(())
}
