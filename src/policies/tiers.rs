//! Cache tier definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cookie patterns forwarded to WordPress and included in cache keys.
pub const WORDPRESS_COOKIES: [&str; 7] = [
    "comment_author_*",
    "jetpack*",
    "jpp*",
    "test_case",
    "woocommerce_*",
    "wordpress_*",
    "wp*",
];

/// Headers that vary WordPress responses, including the derived geo headers.
pub const WORDPRESS_HEADERS: [&str; 9] = [
    "Authorization",
    "Cloudfront-Viewer-Country",
    "Cloudfront-Viewer-Time-Zone",
    "Host",
    "X-Time-Zone",
    "X-Country",
    "HTTP_X_TIME_ZONE",
    "HTTP_X_COUNTRY",
    "Origin",
];

/// Named cache tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheTier {
    NoCache,
    Default,
    Static,
    Api,
    HomePage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "behavior", content = "items", rename_all = "snake_case")]
pub enum CookieBehavior {
    All,
    None,
    AllowList(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "behavior", content = "items", rename_all = "snake_case")]
pub enum HeaderBehavior {
    None,
    AllowList(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "behavior", content = "items", rename_all = "snake_case")]
pub enum QueryStringBehavior {
    All,
    None,
    AllowList(Vec<String>),
}

fn allow_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// TTL ordering violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cache policy '{name}' requires min_ttl <= default_ttl <= max_ttl")]
pub struct InvalidTtlError {
    pub name: String,
}

/// Freshness and cache-key policy for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    pub name: String,
    pub tier: CacheTier,
    pub min_ttl: Duration,
    pub default_ttl: Duration,
    pub max_ttl: Duration,
    pub cookies: CookieBehavior,
    pub headers: HeaderBehavior,
    pub query_strings: QueryStringBehavior,
    pub brotli: bool,
    pub gzip: bool,
}

impl CachePolicy {
    pub fn validate(&self) -> Result<(), InvalidTtlError> {
        if self.min_ttl <= self.default_ttl && self.default_ttl <= self.max_ttl {
            Ok(())
        } else {
            Err(InvalidTtlError { name: self.name.clone() })
        }
    }
}

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

fn ttl(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

/// The five tiers of one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicies {
    pub no_cache: CachePolicy,
    pub default: CachePolicy,
    pub r#static: CachePolicy,
    pub api: CachePolicy,
    pub home_page: CachePolicy,
}

impl CachePolicies {
    /// Standard WordPress tiers, named for `site`.
    pub fn for_site(site: &str) -> Self {
        let scoped = |text: &str| format!("{}-{}", text, site).replace('.', "_");

        Self {
            no_cache: CachePolicy {
                name: scoped("NoCachey"),
                tier: CacheTier::NoCache,
                min_ttl: ttl(MINUTE),
                default_ttl: ttl(MINUTE),
                max_ttl: ttl(MINUTE),
                cookies: CookieBehavior::All,
                headers: HeaderBehavior::None,
                query_strings: QueryStringBehavior::None,
                brotli: false,
                gzip: false,
            },
            default: CachePolicy {
                name: scoped("WordPressDefaultCache"),
                tier: CacheTier::Default,
                min_ttl: ttl(0),
                default_ttl: ttl(MINUTE),
                max_ttl: ttl(MINUTE),
                cookies: CookieBehavior::All,
                headers: HeaderBehavior::AllowList(allow_list(&WORDPRESS_HEADERS)),
                query_strings: QueryStringBehavior::All,
                brotli: true,
                gzip: true,
            },
            r#static: CachePolicy {
                name: scoped("WordPressStatic"),
                tier: CacheTier::Static,
                min_ttl: ttl(HOUR),
                default_ttl: ttl(HOUR),
                max_ttl: ttl(DAY),
                cookies: CookieBehavior::None,
                headers: HeaderBehavior::AllowList(allow_list(&["Host"])),
                query_strings: QueryStringBehavior::AllowList(allow_list(&["file"])),
                brotli: true,
                gzip: true,
            },
            api: CachePolicy {
                name: scoped("WordPressAPI"),
                tier: CacheTier::Api,
                min_ttl: ttl(0),
                default_ttl: ttl(HOUR),
                max_ttl: ttl(HOUR),
                cookies: CookieBehavior::AllowList(allow_list(&WORDPRESS_COOKIES)),
                headers: HeaderBehavior::AllowList(allow_list(&WORDPRESS_HEADERS)),
                query_strings: QueryStringBehavior::All,
                brotli: true,
                gzip: true,
            },
            home_page: CachePolicy {
                name: scoped("WordPressHome"),
                tier: CacheTier::HomePage,
                min_ttl: ttl(5 * MINUTE),
                default_ttl: ttl(3 * HOUR),
                max_ttl: ttl(3 * HOUR),
                cookies: CookieBehavior::AllowList(allow_list(&WORDPRESS_COOKIES)),
                headers: HeaderBehavior::AllowList(allow_list(&WORDPRESS_HEADERS)),
                query_strings: QueryStringBehavior::All,
                brotli: true,
                gzip: true,
            },
        }
    }

    pub fn get(&self, tier: CacheTier) -> &CachePolicy {
        match tier {
            CacheTier::NoCache => &self.no_cache,
            CacheTier::Default => &self.default,
            CacheTier::Static => &self.r#static,
            CacheTier::Api => &self.api,
            CacheTier::HomePage => &self.home_page,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachePolicy> {
        [&self.no_cache, &self.default, &self.r#static, &self.api, &self.home_page].into_iter()
    }
}
