//! Request and Response models
//!
//! Defines the write request accepted by the cache engine and the response
//! bodies produced or replayed over HTTP.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::WriteRequest;
pub use responses::{CachedResponse, HealthResponse, TimeResponse};
