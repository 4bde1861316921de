//! Cache Item Module
//!
//! Defines a single stored entity: its encoded payload, in memory or in an
//! on-disk blob, plus an optional expiry.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use crate::cache::{codec, Blob};
use crate::error::{CacheError, Result};

// == Payload ==
/// Storage tier of an item's encoded value.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Encoded bytes held in memory
    Memory(Arc<[u8]>),
    /// Encoded bytes held in a blob file inside the engine's storage directory.
    /// The file is deleted when the last reference is dropped.
    File(Arc<Blob>),
}

impl Payload {
    /// Returns the blob path for file-backed payloads.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Payload::Memory(_) => None,
            Payload::File(blob) => Some(blob.path()),
        }
    }
}

// == Item ==
/// A stored value with its identifier and expiry.
///
/// Clones share the payload, so handing an item out of the engine is cheap.
#[derive(Debug, Clone)]
pub struct Item {
    id: String,
    payload: Payload,
    /// `None` = never expires
    expiry: Option<DateTime<Utc>>,
}

impl Item {
    // == Constructor ==
    pub(crate) fn new(id: String, payload: Payload, expiry: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            payload,
            expiry,
        }
    }

    /// Returns the identifier the item is stored under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the storage payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the expiry instant, if any.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Returns true if the encoded value lives in a blob file.
    pub fn is_file_backed(&self) -> bool {
        matches!(self.payload, Payload::File(_))
    }

    // == Is Expired ==
    /// Checks if the item has expired at the given instant.
    ///
    /// An item expires once `now` is strictly past its expiry. Items without
    /// an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now > expiry,
            None => false,
        }
    }

    /// Checks if the item has expired now.
    ///
    /// The engine's read path never calls this; expired items stay readable
    /// until the next sweep removes them.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    // == Decode ==
    /// Decodes the stored value.
    ///
    /// File-backed items are read from disk first. Fails with
    /// [`CacheError::EmptyItem`] when there is no encoded data.
    pub async fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.payload {
            Payload::Memory(bytes) => self.decode_bytes(bytes),
            Payload::File(blob) => {
                let bytes = tokio::fs::read(blob.path()).await?;
                self.decode_bytes(&bytes)
            }
        }
    }

    /// Decodes the stored value into an existing destination.
    pub async fn decode_into<T: DeserializeOwned>(&self, destination: &mut T) -> Result<()> {
        *destination = self.decode().await?;
        Ok(())
    }

    fn decode_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        if bytes.is_empty() {
            return Err(CacheError::EmptyItem(self.id.clone()));
        }
        codec::decode(bytes)
    }
}
