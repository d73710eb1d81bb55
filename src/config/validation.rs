use crate::config::types::{Config, HarvestConfig, OutputConfig, ProxyConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvest_config(&config.harvest)?;
    validate_output_config(&config.output)?;
    if let Some(proxy) = &config.proxy {
        validate_proxy_config(proxy)?;
    }
    Ok(())
}

/// Validates harvest configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.listings.is_empty() {
        return Err(ConfigError::Validation(
            "at least one listing must be configured".to_string(),
        ));
    }

    for listing in &config.listings {
        if listing.is_empty() || !listing.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(ConfigError::Validation(format!(
                "listing names must be non-empty and alphanumeric, got '{}'",
                listing
            )));
        }
    }

    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page-limit must be >= 1, got {}",
            config.page_limit
        )));
    }

    if config.batch_size < 1 || config.batch_size > 100 {
        return Err(ConfigError::Validation(format!(
            "batch-size must be between 1 and 100, got {}",
            config.batch_size
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates proxy configuration
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy base-url: {}", e)))?;

    if config.api_key.is_empty() {
        return Err(ConfigError::Validation(
            "proxy api-key cannot be empty".to_string(),
        ));
    }

    if config.country.is_empty() {
        return Err(ConfigError::Validation(
            "proxy country cannot be empty".to_string(),
        ));
    }

    Ok(())
}
