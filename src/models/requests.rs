//! Request models for cache operations
//!
//! Defines the shape of a write: identifier, value and optional expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Request to store `value` under `id`.
///
/// Writes never check for an existing item: an item already stored under
/// `id` is replaced.
///
/// # Fields
/// - `id`: The identifier to store the value under
/// - `value`: Any serializable value
/// - `expiry`: When the item becomes eligible for sweeping (`None` = never)
#[derive(Debug, Clone)]
pub struct WriteRequest<T> {
    /// The item identifier
    pub id: String,
    /// The value to encode and store
    pub value: T,
    /// Optional expiry instant
    pub expiry: Option<DateTime<Utc>>,
}

impl<T> WriteRequest<T> {
    /// Creates a write request for a value that never expires.
    pub fn new(id: impl Into<String>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
            expiry: None,
        }
    }

    /// Sets an absolute expiry instant.
    pub fn expires_at(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Sets the expiry to `ttl` from now.
    ///
    /// A TTL too large to represent leaves the item without expiry.
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.expiry = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        self
    }
}
