//! Edge cache policy service.
//!
//! ```text
//!   CDN event ──▶ /edge/origin-request ──▶ RequestEnricher ──▶ enriched request
//!   deploy    ──▶ /translate, /behaviors ──▶ RouteTranslationCache ──▶ site-config service
//! ```
//!
//! Configuration is read from the TOML file named by `EDGE_CONFIG`; defaults
//! apply when it is unset.

use std::path::PathBuf;

use tokio::net::TcpListener;

use edge_cache_policies::config::{load_config, AppConfig};
use edge_cache_policies::observability::{logging, metrics};
use edge_cache_policies::HttpServer;

const CONFIG_ENV: &str = "EDGE_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        Some(path) => load_config(&path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("edge-cache-policies v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        site_config = %config.site_config.base_url,
        stage = ?config.site_config.stage,
        default_domain_config = %config.site_config.default_domain_config,
        timezone_fallback = ?config.enrichment.timezone_fallback,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
