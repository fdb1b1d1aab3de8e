//! URL pattern to cache tier wiring.

use serde::{Deserialize, Serialize};

use crate::policies::tiers::CacheTier;
use crate::routing::{RemoteConfigUnavailableError, RouteTranslationCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedMethods {
    /// GET, HEAD.
    #[default]
    GetHead,
    /// Every method, including POST/PUT/PATCH/DELETE.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerProtocolPolicy {
    #[default]
    AllowAll,
    RedirectToHttps,
}

/// Which viewer data is forwarded to origin on a cache miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginRequestPolicy {
    #[default]
    AllViewer,
}

/// Edge hook stage at which the enricher runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeEventType {
    OriginRequest,
}

/// Cache behavior attached to one path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Behavior {
    pub tier: CacheTier,
    pub origin_request_policy: OriginRequestPolicy,
    pub allowed_methods: AllowedMethods,
    pub viewer_protocol: ViewerProtocolPolicy,
    /// Set when the country/time zone enricher runs for this pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EdgeEventType>,
}

impl Behavior {
    /// Build a behavior for `tier`.
    ///
    /// Attaching the enricher or allowing everything both open all methods and
    /// redirect viewers to HTTPS.
    pub fn generate(tier: CacheTier, with_enrichment: bool, allow_all: bool) -> Self {
        let mut behavior = Self {
            tier,
            origin_request_policy: OriginRequestPolicy::AllViewer,
            allowed_methods: AllowedMethods::GetHead,
            viewer_protocol: ViewerProtocolPolicy::AllowAll,
            enrichment: None,
        };

        if with_enrichment {
            behavior.enrichment = Some(EdgeEventType::OriginRequest);
        }
        if with_enrichment || allow_all {
            behavior.allowed_methods = AllowedMethods::All;
            behavior.viewer_protocol = ViewerProtocolPolicy::RedirectToHttps;
        }
        behavior
    }
}

/// A path pattern and its behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathBehavior {
    pub path_pattern: String,
    #[serde(flatten)]
    pub behavior: Behavior,
}

/// Default behavior plus ordered path-specific behaviors of a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBehaviors {
    pub default_behavior: Behavior,
    pub additional_behaviors: Vec<PathBehavior>,
}

impl DistributionBehaviors {
    /// Standard WordPress wiring.
    pub fn wordpress() -> Self {
        let path = |pattern: &str, tier, with_enrichment, allow_all| PathBehavior {
            path_pattern: pattern.to_string(),
            behavior: Behavior::generate(tier, with_enrichment, allow_all),
        };

        Self {
            default_behavior: Behavior::generate(CacheTier::NoCache, true, true),
            additional_behaviors: vec![
                path("/wp-content/*", CacheTier::Static, false, false),
                path("/wp-includes/css/*", CacheTier::Static, false, false),
                path("/wp-includes/js/*", CacheTier::Static, false, false),
                path("/", CacheTier::HomePage, true, true),
                path("/content/*", CacheTier::NoCache, true, true),
                path("/wp-json/*", CacheTier::Api, true, true),
                path("/wp-login.php", CacheTier::NoCache, false, true),
                path("/wp-admin/*", CacheTier::NoCache, true, true),
            ],
        }
    }

    /// Behavior for an exact pattern.
    pub fn get(&self, pattern: &str) -> Option<&Behavior> {
        self.additional_behaviors
            .iter()
            .find(|b| b.path_pattern == pattern)
            .map(|b| &b.behavior)
    }

    /// Rewrite every path pattern through the site's route table.
    pub async fn translated(
        &self,
        routes: &RouteTranslationCache,
        domain_config: Option<&str>,
    ) -> Result<Self, RemoteConfigUnavailableError> {
        let mut additional_behaviors = Vec::with_capacity(self.additional_behaviors.len());
        for entry in &self.additional_behaviors {
            additional_behaviors.push(PathBehavior {
                path_pattern: routes.translate(&entry.path_pattern, domain_config).await?,
                behavior: entry.behavior.clone(),
            });
        }

        Ok(Self {
            default_behavior: self.default_behavior.clone(),
            additional_behaviors,
        })
    }
}
