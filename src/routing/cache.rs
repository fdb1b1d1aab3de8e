//! Memoized route tables keyed by domain config.
//!
//! Tables live for the lifetime of the cache; there is no eviction or
//! invalidation. Concurrent first lookups for one key share a single fetch.
//! A failed fetch leaves the key empty, so the next lookup tries again.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::observability::metrics;
use crate::routing::site_config::{RemoteConfigUnavailableError, RouteSource};
use crate::routing::table::RouteTable;

/// Domain config used when the caller names none.
pub const DEFAULT_DOMAIN_CONFIG: &str = "odb";

type Slot = Arc<OnceCell<Arc<RouteTable>>>;

/// Route translation with a per-key get-or-fetch cache.
#[derive(Clone)]
pub struct RouteTranslationCache {
    source: Arc<dyn RouteSource>,
    default_domain_config: String,
    tables: Arc<DashMap<String, Slot>>,
}

impl RouteTranslationCache {
    pub fn new(source: Arc<dyn RouteSource>) -> Self {
        Self::with_default_domain_config(source, DEFAULT_DOMAIN_CONFIG)
    }

    pub fn with_default_domain_config(source: Arc<dyn RouteSource>, default_domain_config: impl Into<String>) -> Self {
        Self {
            source,
            default_domain_config: default_domain_config.into(),
            tables: Arc::new(DashMap::new()),
        }
    }

    pub fn default_domain_config(&self) -> &str {
        &self.default_domain_config
    }

    /// Cached table for `domain_config`, fetching it on first use.
    pub async fn routes(&self, domain_config: &str) -> Result<Arc<RouteTable>, RemoteConfigUnavailableError> {
        // Clone the slot out so no map shard lock is held across the fetch.
        let slot = self
            .tables
            .entry(domain_config.to_string())
            .or_default()
            .value()
            .clone();

        if let Some(table) = slot.get() {
            metrics::record_route_cache_hit();
            return Ok(table.clone());
        }

        let fetched = slot
            .get_or_try_init(|| async {
                match self.source.fetch_routes(domain_config).await {
                    Ok(table) => {
                        metrics::record_route_fetch("ok");
                        Ok(Arc::new(table))
                    }
                    Err(e) => {
                        tracing::error!(domain_config, error = %e, "Route table fetch failed");
                        metrics::record_route_fetch("error");
                        Err(e)
                    }
                }
            })
            .await;

        match fetched {
            Ok(table) => Ok(table.clone()),
            Err(e) => {
                self.tables.remove_if(domain_config, |_, slot| !slot.initialized());
                Err(e)
            }
        }
    }

    /// Rewrite `pattern` with the routes of `domain_config` (or the default).
    pub async fn translate(
        &self,
        pattern: &str,
        domain_config: Option<&str>,
    ) -> Result<String, RemoteConfigUnavailableError> {
        let domain_config = domain_config.unwrap_or(self.default_domain_config.as_str());
        let table = self.routes(domain_config).await?;
        let translated = table.apply(pattern);

        if translated != pattern {
            tracing::debug!(domain_config, pattern, translated = %translated, "Pattern translated");
        }
        Ok(translated)
    }

    /// Domain configs whose tables are loaded.
    pub fn cached_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tables
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for RouteTranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTranslationCache")
            .field("default_domain_config", &self.default_domain_config)
            .field("cached_keys", &self.cached_keys())
            .finish()
    }
}
