//! Site-config service client.
//!
//! # Responsibilities
//! - Build the stage-aware `site-config` URL for a domain config
//! - Fetch and decode `{data: {routes: {...}}}`
//! - Map every transport, status and decode failure to one error kind

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::SiteConfigSettings;
use crate::routing::table::RouteTable;

/// Stage that talks to the base host without a subdomain.
pub const PRODUCTION_STAGE: &str = "prod";

/// The route table for a domain config could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("site config for '{domain_config}' unavailable: {reason}")]
pub struct RemoteConfigUnavailableError {
    pub domain_config: String,
    pub reason: String,
}

impl RemoteConfigUnavailableError {
    pub fn new(domain_config: &str, reason: impl Into<String>) -> Self {
        Self {
            domain_config: domain_config.to_string(),
            reason: reason.into(),
        }
    }
}

/// Anything that can produce a route table for a domain config.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn fetch_routes(&self, domain_config: &str) -> Result<RouteTable, RemoteConfigUnavailableError>;
}

#[derive(Debug, Deserialize)]
struct SiteConfigResponse {
    data: SiteConfigData,
}

#[derive(Debug, Deserialize)]
struct SiteConfigData {
    #[serde(default)]
    routes: RouteTable,
}

/// HTTP client for the site-config service.
#[derive(Debug, Clone)]
pub struct SiteConfigClient {
    client: reqwest::Client,
    base_url: Url,
    stage: Option<String>,
}

impl SiteConfigClient {
    /// Create a client from settings.
    pub fn new(settings: &SiteConfigSettings) -> Result<Self, RemoteConfigUnavailableError> {
        let invalid = |reason: String| RemoteConfigUnavailableError::new(&settings.default_domain_config, reason);

        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| invalid(format!("invalid base URL '{}': {}", settings.base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| invalid(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            stage: settings.stage.clone(),
        })
    }

    /// URL of the site config for `domain_config`.
    pub fn url_for(&self, domain_config: &str) -> Result<Url, RemoteConfigUnavailableError> {
        site_config_url(&self.base_url, self.stage.as_deref(), domain_config)
    }
}

/// `{scheme}://[{stage}.]{host}/site-config?override={domain_config}`.
pub fn site_config_url(
    base_url: &Url,
    stage: Option<&str>,
    domain_config: &str,
) -> Result<Url, RemoteConfigUnavailableError> {
    let mut url = base_url.clone();

    if let Some(stage) = stage.map(str::trim).filter(|s| !s.is_empty() && *s != PRODUCTION_STAGE) {
        let host = base_url
            .host_str()
            .ok_or_else(|| RemoteConfigUnavailableError::new(domain_config, "base URL has no host"))?;
        url.set_host(Some(&format!("{}.{}", stage, host)))
            .map_err(|e| RemoteConfigUnavailableError::new(domain_config, format!("invalid stage '{}': {}", stage, e)))?;
    }

    url.set_path("site-config");
    url.query_pairs_mut().clear().append_pair("override", domain_config);
    Ok(url)
}

#[async_trait]
impl RouteSource for SiteConfigClient {
    async fn fetch_routes(&self, domain_config: &str) -> Result<RouteTable, RemoteConfigUnavailableError> {
        let url = self.url_for(domain_config)?;
        let unavailable = |reason: String| RemoteConfigUnavailableError::new(domain_config, reason);

        tracing::debug!(url = %url, domain_config, "Fetching site config");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| unavailable(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("{} returned status {}", url, status)));
        }

        let body: SiteConfigResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("invalid site config body: {}", e)))?;

        tracing::info!(domain_config, routes = body.data.routes.len(), "Site config fetched");
        Ok(body.data.routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://crouton.odb.org").unwrap()
    }

    #[test]
    fn test_url_without_stage() {
        let url = site_config_url(&base(), None, "odb").unwrap();
        assert_eq!(url.as_str(), "https://crouton.odb.org/site-config?override=odb");
    }

    #[test]
    fn test_url_with_stage() {
        let url = site_config_url(&base(), Some("dev"), "kids").unwrap();
        assert_eq!(url.as_str(), "https://dev.crouton.odb.org/site-config?override=kids");
    }

    #[test]
    fn test_prod_stage_uses_base_host() {
        for stage in ["prod", " prod ", ""] {
            let url = site_config_url(&base(), Some(stage), "odb").unwrap();
            assert_eq!(url.host_str(), Some("crouton.odb.org"));
        }
    }

    #[test]
    fn test_domain_config_is_encoded() {
        let url = site_config_url(&base(), None, "a b&c").unwrap();
        assert_eq!(url.query(), Some("override=a+b%26c"));
    }

    #[test]
    fn test_response_shape() {
        let body: SiteConfigResponse =
            serde_json::from_str(r#"{"data":{"routes":{"/content":"/c"}},"meta":{}}"#).unwrap();
        assert_eq!(body.data.routes.apply("/content/foo"), "/c/foo");
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = SiteConfigSettings {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let err = SiteConfigClient::new(&settings).unwrap_err();
        assert_eq!(err.domain_config, "odb");
    }
}
