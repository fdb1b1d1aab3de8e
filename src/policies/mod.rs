//! Cache tiers and their wiring to URL patterns.
//!
//! Static data describing how the distribution caches each class of URL.
//! Path patterns can be rewritten per site through the route translation cache
//! before they are handed to deployment.

pub mod behaviors;
pub mod tiers;

pub use behaviors::{AllowedMethods, Behavior, DistributionBehaviors, EdgeEventType, PathBehavior, ViewerProtocolPolicy};
pub use tiers::{CachePolicies, CachePolicy, CacheTier, CookieBehavior, HeaderBehavior, QueryStringBehavior};
