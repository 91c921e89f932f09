//! Helix API access
//!
//! The layers, bottom up:
//!
//! - [`transport`] - raw HTTP GET with credential headers
//! - [`client`] - rate-limited request issuance with response classification
//! - [`resolver`] - handle to numeric id resolution
//! - [`follows`] - paginated follow-edge fetching with a bounded edge cap

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod client;
pub mod follows;
pub mod resolver;
pub mod transport;

pub use client::HelixClient;
pub use follows::{EdgeSet, FollowPage, FollowsFetcher};
pub use resolver::Resolver;

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network error (connect failure, timeout, broken transfer)
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response body could not be parsed as the expected JSON shape
    #[error("parse error: {0}")]
    ParseError(String),

    /// Response was structurally valid but unusable
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Cursor container nested under `pagination` in Helix responses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Pagination {
    /// Opaque continuation token; absent on the last page
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Generic Helix response envelope.
///
/// Successful responses carry `data` (plus `pagination` and `total` on the
/// follows endpoint); error responses carry `error`, `status`, and `message`
/// instead. Both shapes deserialize into this one struct so classification
/// happens after parsing, not during.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Result records; absent on error responses
    #[serde(default = "none")]
    pub data: Option<Vec<T>>,
    /// Continuation cursor for paginated endpoints
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Total matching records, when the endpoint reports it
    #[serde(default)]
    pub total: Option<u64>,
    /// Error name, e.g. "Bad Request" or "Too Many Requests"
    #[serde(default)]
    pub error: Option<String>,
    /// HTTP status mirrored into the body on errors
    #[serde(default)]
    pub status: Option<u16>,
    /// Human-readable error detail
    #[serde(default)]
    pub message: Option<String>,
}

fn none<T>() -> Option<Vec<T>> {
    None
}

impl<T> Envelope<T> {
    /// Records, or `None` when the response carried no usable data.
    pub fn records(&self) -> Option<&[T]> {
        match self.data.as_deref() {
            Some(records) if !records.is_empty() => Some(records),
            _ => None,
        }
    }

    /// Take ownership of the records, or `None` when there are none.
    pub fn into_records(self) -> Option<Vec<T>> {
        match self.data {
            Some(records) if !records.is_empty() => Some(records),
            _ => None,
        }
    }

    /// Continuation cursor, flattened out of the `pagination` object.
    pub fn cursor(&self) -> Option<&str> {
        self.pagination.as_ref()?.cursor.as_deref()
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse an envelope out of a raw JSON body.
    pub fn from_value(body: serde_json::Value) -> ApiResult<Self> {
        serde_json::from_value(body).map_err(|e| ApiError::ParseError(e.to_string()))
    }
}
