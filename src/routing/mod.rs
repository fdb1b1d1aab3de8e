//! Route translation subsystem.
//!
//! # Data Flow
//! ```text
//! translate(pattern, domain_config)
//!     → cache.rs (get-or-fetch per domain config)
//!     → site_config.rs (GET site-config on first use)
//!     → table.rs (ordered substring rewrite)
//!     → rewritten pattern
//! ```
//!
//! # Design Decisions
//! - Runs at configuration time, not on the request path
//! - Fetch failures propagate (fail closed) instead of yielding a wrong pattern
//! - The remote client is injected, so the cache is testable without a network

pub mod cache;
pub mod site_config;
pub mod table;

pub use cache::{RouteTranslationCache, DEFAULT_DOMAIN_CONFIG};
pub use site_config::{site_config_url, RemoteConfigUnavailableError, RouteSource, SiteConfigClient};
pub use table::RouteTable;
