//! Edge caching policies for a WordPress content platform behind a CDN.
//!
//! - [`edge`]: origin-request enrichment with viewer country and UTC offset
//! - [`routing`]: path pattern translation against remote route tables
//! - [`policies`]: cache tiers and their URL pattern wiring
//! - [`http`]: service front end for the above

pub mod config;
pub mod edge;
pub mod http;
pub mod observability;
pub mod policies;
pub mod routing;

pub use config::AppConfig;
pub use edge::RequestEnricher;
pub use http::HttpServer;
pub use routing::RouteTranslationCache;
