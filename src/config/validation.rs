use crate::config::types::{CollectorConfig, Config, OrchestratorConfig, SitesConfig, VrPornEntry};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_collector_config(&config.collector)?;
    validate_orchestrator_config(&config.orchestrator)?;
    validate_sites_config(&config.sites)?;
    validate_vrporn_entries(&config.vrporn)?;
    Ok(())
}

/// Validates collector configuration
fn validate_collector_config(config: &CollectorConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.request_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request-delay-ms must be <= 60000ms, got {}ms",
            config.request_delay_ms
        )));
    }

    Ok(())
}

/// Validates orchestrator configuration
fn validate_orchestrator_config(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if config.channel_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "channel-capacity must be >= 1, got {}",
            config.channel_capacity
        )));
    }

    Ok(())
}

/// Validates built-in site base URLs
fn validate_sites_config(config: &SitesConfig) -> Result<(), ConfigError> {
    validate_base_url("vrporn-base-url", &config.vrporn_base_url)?;
    validate_base_url("javlibrary-base-url", &config.javlibrary_base_url)?;
    Ok(())
}

fn validate_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use HTTP or HTTPS",
            key, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            key, value
        )));
    }

    Ok(())
}

/// Validates VRPorn studio entries
fn validate_vrporn_entries(entries: &[VrPornEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in entries {
        validate_source_id(&entry.id)?;

        if !seen.insert(entry.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "VRPorn studio '{}' is listed more than once",
                entry.id
            )));
        }

        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "VRPorn studio '{}' must have a name",
                entry.id
            )));
        }

        if !entry.avatar_url.is_empty() {
            Url::parse(&entry.avatar_url).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Invalid avatar-url for '{}': {}",
                    entry.id, e
                ))
            })?;
        }
    }

    Ok(())
}

/// Validates a source id: non-empty, lowercase alphanumerics, hyphens and
/// underscores only
fn validate_source_id(id: &str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::Validation(
            "source id cannot be empty".to_string(),
        ));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "source id '{}' must contain only lowercase letters, digits, '-' and '_'",
            id
        )));
    }

    Ok(())
}
