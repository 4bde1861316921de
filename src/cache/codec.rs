//! Codec Module
//!
//! Encodes values to the cache's byte format and back: one JSON document
//! terminated by a newline.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

// == Encode ==
/// Serializes a value into its stored byte representation.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    serde_json::to_writer(&mut buf, value)?;
    buf.push(b'\n');
    Ok(buf)
}

// == Decode ==
/// Deserializes stored bytes into a value of type `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}
