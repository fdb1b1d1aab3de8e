//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote site-config service used for route translation.
    pub site_config: SiteConfigSettings,

    /// Edge enrichment fallbacks.
    pub enrichment: EnrichmentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Site-config service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfigSettings {
    /// Base URL of the service, without the stage subdomain.
    pub base_url: String,

    /// Deployment stage. `None` or `"prod"` talks to the base host directly.
    pub stage: Option<String>,

    /// Domain config used when a caller does not name one.
    pub default_domain_config: String,

    /// Fetch timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SiteConfigSettings {
    fn default() -> Self {
        Self {
            base_url: "https://crouton.odb.org".to_string(),
            stage: None,
            default_domain_config: "odb".to_string(),
            timeout_secs: 10,
        }
    }
}

/// What to emit when the viewer time zone signal is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneFallback {
    /// Keep the country pair as the only derived headers; no time zone headers.
    #[default]
    Country,
    /// Emit `+00:00` time zone headers.
    Utc,
}

/// Edge enrichment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Country code used when the viewer country signal is missing.
    pub fallback_country: String,

    /// Behaviour when the viewer time zone signal is missing.
    pub timezone_fallback: TimezoneFallback,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            fallback_country: "US".to_string(),
            timezone_fallback: TimezoneFallback::Country,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.site_config.default_domain_config, "odb");
        assert_eq!(config.enrichment.fallback_country, "US");
        assert_eq!(config.enrichment.timezone_fallback, TimezoneFallback::Country);
        assert!(config.site_config.stage.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [enrichment]
            timezone_fallback = "utc"

            [site_config]
            stage = "dev"
            "#,
        )
        .unwrap();

        assert_eq!(config.enrichment.timezone_fallback, TimezoneFallback::Utc);
        assert_eq!(config.enrichment.fallback_country, "US");
        assert_eq!(config.site_config.stage.as_deref(), Some("dev"));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
