//! API Handlers
//!
//! HTTP request handlers for the demo server endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::CacheEngine;
use crate::models::{HealthResponse, TimeResponse};

/// Handler for GET /time
///
/// Returns the time the handler ran, so a replayed response is easy to spot.
pub async fn time_handler() -> Json<TimeResponse> {
    Json(TimeResponse::now())
}

/// Handler for GET /health
///
/// Returns health status and the number of cached responses.
pub async fn health_handler(State(engine): State<Arc<CacheEngine>>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(engine.len().await))
}
