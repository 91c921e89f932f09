//! HTTP transport layer
//!
//! Isolates the raw GET-and-parse step behind a trait so the client's rate
//! limiting and retry behavior can be exercised against scripted responses.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::api::{ApiError, ApiResult};
use crate::crawler::Credentials;

/// HTTP connect timeout - time to establish the TCP connection
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// HTTP request timeout - overall time for the entire request
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues one HTTP GET and returns the parsed JSON body.
///
/// The Helix API mirrors errors into the body with a 200-parseable JSON
/// shape, so implementations return the body for any response that yields
/// JSON; only transport-level failures become errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with credential headers attached, parsing the body as JSON.
    async fn get_json(&self, url: &str) -> ApiResult<serde_json::Value>;
}

/// Production transport backed by a dedicated `reqwest::Client`.
///
/// Each worker constructs its own transport so sockets and connection pools
/// are never shared across worker boundaries.
pub struct ReqwestTransport {
    client: Client,
    credentials: Credentials,
}

impl ReqwestTransport {
    /// Build a transport with its own connection pool and explicit timeouts.
    pub fn new(credentials: Credentials) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> ApiResult<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .header("Client-Id", &self.credentials.client_id)
            .header(
                "Authorization",
                format!("Bearer {}", self.credentials.bearer_token),
            )
            .header("User-Agent", &self.credentials.user_agent)
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::ParseError(format!("response body is not JSON: {e}")))
    }
}
