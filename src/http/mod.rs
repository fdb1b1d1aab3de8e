//! HTTP front end.
//!
//! # Data Flow
//! ```text
//! POST /edge/origin-request → handlers.rs → edge::RequestEnricher::handle
//! GET  /translate           → handlers.rs → routing::RouteTranslationCache
//! GET  /behaviors           → handlers.rs → policies (translated patterns)
//! GET  /health              → handlers.rs
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
