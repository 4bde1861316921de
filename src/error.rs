//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The item table is full; nothing is admitted until an item is removed
    #[error("Maximum number of items reached: {max_items}")]
    CapacityExceeded { max_items: usize },

    /// No item stored under the identifier
    #[error("ID not found: {0}")]
    NotFound(String),

    /// The item carries no encoded data
    #[error("Item is empty, no data or file associated with it: {0}")]
    EmptyItem(String),

    /// Storage directory or blob I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error (a blocking storage task failed to complete)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Returns true for the cache-miss signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
