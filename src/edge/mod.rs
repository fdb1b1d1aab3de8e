//! Edge request enrichment subsystem.
//!
//! # Data Flow
//! ```text
//! EdgeEvent (Records[0].cf.request + config)
//!     → headers.rs (read viewer signals from multi-value headers)
//!     → timezone.rs (zone name → minutes east of UTC)
//!     → offset.rs (minutes → ±HH:MM)
//!     → enricher.rs (attach country/time zone pairs, fail open)
//!     → InboundRequest forwarded to origin
//! ```
//!
//! # Design Decisions
//! - Pure per-request transformation, no shared mutable state
//! - Errors are values inside the enricher; only the boundary swallows them
//! - Zone offsets come from the bundled IANA database, evaluated at call time

pub mod enricher;
pub mod event;
pub mod headers;
pub mod offset;
pub mod timezone;

pub use enricher::{Derivation, EnrichError, EnrichmentContext, EnrichmentOutcome, RequestEnricher};
pub use event::{DistributionConfig, EdgeEvent, InboundRequest};
pub use headers::{EdgeHeaders, HeaderEntry};
pub use offset::format_offset;
pub use timezone::{TimezoneOffsetMinutes, TimezoneOffsetResolver, UnknownZoneError};
