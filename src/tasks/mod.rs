//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache engine is
//! running.
//!
//! # Tasks
//! - Expiry Sweeper: Removes expired cache items at the configured interval

mod sweeper;

pub(crate) use sweeper::spawn_sweeper;
