//! Mini Cache - An embeddable time-bounded key/value cache
//!
//! Stores encoded values under caller-chosen identifiers with optional expiry.
//! Oversized values are kept in files, expired items are swept in the
//! background, and an axum middleware memoizes HTTP responses on top.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
mod tasks;

pub use cache::{CacheEngine, Item, Payload};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
pub use http::{FnIdentifier, RequestIdentifier, ResponseCache};
pub use models::WriteRequest;
