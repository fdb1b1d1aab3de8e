//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! edge enricher, route cache, HTTP server
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, optional Prometheus scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - Fallback paths log distribution id, event type and URI as fields
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
