//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_enrichment_total` (counter): enrichment results by `outcome`
//! - `edge_fallback_total` (counter): fallback headers by `signal`
//! - `route_table_fetch_total` (counter): site-config fetches by `result`
//! - `route_cache_hits_total` (counter): route lookups served from memory

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_enrichment(outcome: &'static str) {
    counter!("edge_enrichment_total", "outcome" => outcome).increment(1);
}

pub fn record_fallback(signal: &'static str) {
    counter!("edge_fallback_total", "signal" => signal).increment(1);
}

pub fn record_route_fetch(result: &'static str) {
    counter!("route_table_fetch_total", "result" => result).increment(1);
}

pub fn record_route_cache_hit() {
    counter!("route_cache_hits_total").increment(1);
}
