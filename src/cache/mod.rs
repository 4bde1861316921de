//! Cache Module
//!
//! Provides the item store with expiry sweeping, size-based storage tiering,
//! and the codec that turns values into stored bytes.

pub mod codec;
mod engine;
mod item;
mod storage;


// Re-export public types
pub use engine::CacheEngine;
pub use item::{Item, Payload};
pub use storage::Blob;

pub(crate) use engine::{remove_expired, ItemTable};
pub(crate) use storage::StorageDir;
