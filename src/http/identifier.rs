//! Request Identifiers
//!
//! Key derivation and TTL policy for the response cache.

use std::time::Duration;

use axum::extract::Request;
use axum::http::{header, Method};

/// Decides which requests are cached, under which key, and for how long.
pub trait RequestIdentifier: Send + Sync {
    /// Derives the cache key for a request. `None` or an empty key bypasses the cache.
    fn identify(&self, request: &Request) -> Option<String>;

    /// Time-to-live of responses cached under keys from this identifier.
    fn item_ttl(&self) -> Duration;
}

/// A [`RequestIdentifier`] built from a key function and a fixed TTL.
#[derive(Debug, Clone)]
pub struct FnIdentifier<F> {
    item_ttl: Duration,
    identify: F,
}

impl<F> FnIdentifier<F>
where
    F: Fn(&Request) -> Option<String> + Send + Sync,
{
    /// Creates an identifier caching responses for `item_ttl`.
    pub fn new(item_ttl: Duration, identify: F) -> Self {
        Self { item_ttl, identify }
    }
}

impl<F> RequestIdentifier for FnIdentifier<F>
where
    F: Fn(&Request) -> Option<String> + Send + Sync,
{
    fn identify(&self, request: &Request) -> Option<String> {
        (self.identify)(request)
    }

    fn item_ttl(&self) -> Duration {
        self.item_ttl
    }
}

/// Keys GET requests by URI and cookies; every other method bypasses the cache.
pub fn get_request_key(request: &Request) -> Option<String> {
    if request.method() != Method::GET {
        return None;
    }

    let mut key = format!("GET {}", request.uri());
    for cookie in request.headers().get_all(header::COOKIE) {
        key.push('|');
        key.push_str(&String::from_utf8_lossy(cookie.as_bytes()));
    }
    Some(key)
}
