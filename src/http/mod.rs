//! HTTP Response Cache Module
//!
//! Memoizes responses to repeatable requests in a [`CacheEngine`](crate::cache::CacheEngine).
//!
//! A [`RequestIdentifier`] maps each request to a cache key and a TTL. Requests
//! without a key pass straight through. On a miss the inner handler runs and
//! its status, headers (cookies included) and body are stored; on a hit the
//! stored response is replayed without invoking the handler. Engine failures
//! other than a miss are logged and the request is served live.

mod identifier;
mod middleware;

pub use identifier::{get_request_key, FnIdentifier, RequestIdentifier};
pub use middleware::{cache_responses, ResponseCache};
