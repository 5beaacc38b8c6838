//! The API layer, containing the exposition endpoint and routing.

pub mod exposition;
pub mod handlers;
pub mod router;

pub use router::{RateLimitConfig, create_router, create_router_with_rate_limit};
