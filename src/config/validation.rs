//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected so a
//! broken file is reported in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.request_timeout_secs must be greater than zero")]
    RequestTimeout,

    #[error("site_config.base_url '{0}' must be an absolute http(s) URL")]
    BaseUrl(String),

    #[error("site_config.timeout_secs must be greater than zero")]
    FetchTimeout,

    #[error("site_config.default_domain_config must not be empty")]
    DefaultDomainConfig,

    #[error("enrichment.fallback_country '{0}' must be a two-letter upper-case code")]
    FallbackCountry(String),

    #[error("observability.log_level '{0}' is not a known level")]
    LogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, returning every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    let site = &config.site_config;
    match url::Url::parse(&site.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
        _ => errors.push(ValidationError::BaseUrl(site.base_url.clone())),
    }
    if site.timeout_secs == 0 {
        errors.push(ValidationError::FetchTimeout);
    }
    if site.default_domain_config.trim().is_empty() {
        errors.push(ValidationError::DefaultDomainConfig);
    }

    let country = &config.enrichment.fallback_country;
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::FallbackCountry(country.clone()));
    }

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(obs.log_level.clone()));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(obs.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.site_config.base_url = "ftp://crouton.odb.org".into();
        config.site_config.timeout_secs = 0;
        config.enrichment.fallback_country = "usa".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::FetchTimeout));
        assert!(errors.contains(&ValidationError::FallbackCountry("usa".into())));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::MetricsAddress("bad".into())]
        );
    }
}
