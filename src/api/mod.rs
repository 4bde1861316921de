//! API Module
//!
//! Demo HTTP routes served through the response cache.
//!
//! # Endpoints
//! - `GET /time` - Current server time, memoized by the response cache
//! - `GET /health` - Health check endpoint (never cached)

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
