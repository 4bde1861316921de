//! Response models
//!
//! Defines the captured HTTP response stored by the response cache, and the
//! bodies returned by the demo server.

use axum::{
    body::Body,
    http::{response::Parts, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A response captured from a handler, replayable on later requests.
///
/// Cookies travel as `set-cookie` entries in `headers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// HTTP status code
    pub status: u16,
    /// Header name/value pairs in their original order
    pub headers: Vec<(String, Vec<u8>)>,
    /// Response body, stored as base64
    #[serde(with = "base64_body")]
    pub body: Vec<u8>,
}

impl CachedResponse {
    /// Captures the status, headers and buffered body of a response.
    pub fn from_parts(parts: &Parts, body: &[u8]) -> Self {
        Self {
            status: parts.status.as_u16(),
            headers: parts
                .headers
                .iter()
                .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
                .collect(),
            body: body.to_vec(),
        }
    }

    /// Returns the raw `set-cookie` values of the captured response.
    pub fn cookies(&self) -> impl Iterator<Item = &[u8]> {
        self.headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
            .map(|(_, value)| value.as_slice())
    }
}

mod base64_body {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_bytes(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => warn!("Skipping invalid cached header '{}'", name),
            }
        }

        response
    }
}

/// Response body for the demo time endpoint (GET /time)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeResponse {
    /// Fixed message
    pub message: String,
    /// When the handler produced this response
    pub sent_at: DateTime<Utc>,
}

impl TimeResponse {
    /// Creates a response stamped with the current time
    pub fn now() -> Self {
        Self {
            message: "current server time".to_string(),
            sent_at: Utc::now(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Number of live cache items
    pub cached_items: usize,
}

impl HealthResponse {
    /// Creates a healthy response
    pub fn healthy(cached_items: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            cached_items,
        }
    }
}
