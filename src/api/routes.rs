//! API Routes
//!
//! Configures the Axum router for the demo server.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, time_handler};
use crate::http::ResponseCache;

/// Creates the demo router.
///
/// # Endpoints
/// - `GET /time` - Served through the response cache
/// - `GET /health` - Always served live
///
/// # Middleware
/// - Response cache on the cached routes
/// - Tracing: Logs all requests for debugging
pub fn create_router(cache: ResponseCache) -> Router {
    let engine = Arc::clone(cache.engine());
    let cached = cache.wrap(Router::new().route("/time", get(time_handler)));

    Router::new()
        .route("/health", get(health_handler))
        .with_state(engine)
        .merge(cached)
        .layer(TraceLayer::new_for_http())
}
