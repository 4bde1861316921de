//! Response Cache Middleware
//!
//! axum middleware serving repeatable requests from the cache engine.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{debug, error, warn};

use crate::cache::CacheEngine;
use crate::error::CacheError;
use crate::http::RequestIdentifier;
use crate::models::{CachedResponse, WriteRequest};

/// Shared state of the response cache middleware.
#[derive(Clone)]
pub struct ResponseCache {
    engine: Arc<CacheEngine>,
    identifier: Arc<dyn RequestIdentifier>,
}

impl ResponseCache {
    /// Creates a response cache storing into `engine`.
    ///
    /// The engine should already be started so stored responses expire.
    pub fn new(engine: Arc<CacheEngine>, identifier: impl RequestIdentifier + 'static) -> Self {
        Self {
            engine,
            identifier: Arc::new(identifier),
        }
    }

    /// Returns the backing engine.
    pub fn engine(&self) -> &Arc<CacheEngine> {
        &self.engine
    }

    /// Applies the middleware to every route of `router`.
    pub fn wrap<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(middleware::from_fn_with_state(self, cache_responses))
    }

    /// Runs the inner handler, replays its response, and stores a copy.
    async fn capture(&self, key: String, response: Response) -> Response {
        let (mut parts, body) = response.into_parts();
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to buffer response body for '{}': {}", key, e);
                parts.headers.remove(header::CONTENT_LENGTH);
                return Response::from_parts(parts, Body::empty());
            }
        };

        let captured = CachedResponse::from_parts(&parts, &bytes);
        let request = WriteRequest::new(key.clone(), captured).expires_in(self.identifier.item_ttl());
        match self.engine.write(request).await {
            Ok(()) => debug!("Cached response for '{}'", key),
            Err(e) => error!("Failed to cache response for '{}': {}", key, e),
        }

        Response::from_parts(parts, Body::from(bytes))
    }
}

/// Middleware function; install with [`ResponseCache::wrap`] or
/// `axum::middleware::from_fn_with_state`.
pub async fn cache_responses(
    State(cache): State<ResponseCache>,
    request: Request,
    next: Next,
) -> Response {
    let key = match cache.identifier.identify(&request) {
        Some(key) if !key.is_empty() => key,
        _ => return next.run(request).await,
    };

    match cache.engine.read(&key).await {
        Ok(item) => match item.decode::<CachedResponse>().await {
            Ok(cached) => {
                debug!("Serving cached response for '{}'", key);
                cached.into_response()
            }
            Err(e) => {
                error!("Failed to decode cached response for '{}': {}", key, e);
                next.run(request).await
            }
        },
        Err(CacheError::NotFound(_)) => {
            let response = next.run(request).await;
            cache.capture(key, response).await
        }
        Err(e) => {
            error!("Response cache read failed for '{}': {}", key, e);
            next.run(request).await
        }
    }
}
