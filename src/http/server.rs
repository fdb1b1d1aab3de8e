//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::edge::RequestEnricher;
use crate::http::handlers;
use crate::policies::DistributionBehaviors;
use crate::routing::{RemoteConfigUnavailableError, RouteSource, RouteTranslationCache, SiteConfigClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<RequestEnricher>,
    pub routes: RouteTranslationCache,
    pub behaviors: Arc<DistributionBehaviors>,
}

/// HTTP front end for enrichment and route translation.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server that fetches route tables from the configured site-config service.
    pub fn new(config: AppConfig) -> Result<Self, RemoteConfigUnavailableError> {
        let client = SiteConfigClient::new(&config.site_config)?;
        Ok(Self::with_route_source(config, Arc::new(client)))
    }

    /// Create a server with an explicit route source.
    pub fn with_route_source(config: AppConfig, source: Arc<dyn RouteSource>) -> Self {
        let state = AppState {
            enricher: Arc::new(RequestEnricher::new(config.enrichment.clone())),
            routes: RouteTranslationCache::with_default_domain_config(
                source,
                config.site_config.default_domain_config.clone(),
            ),
            behaviors: Arc::new(DistributionBehaviors::wordpress()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/edge/origin-request", post(handlers::origin_request))
            .route("/translate", get(handlers::translate))
            .route("/behaviors", get(handlers::behaviors))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
