//! Rate-limited Helix client
//!
//! One client per worker. Every request is followed by a fixed sleep that
//! enforces the worker's share of the global rate budget, and rate-limit
//! rejections are absorbed locally with a single cooled-down retry.

use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::api::transport::{ReqwestTransport, Transport};
use crate::api::{ApiResult, Envelope};
use crate::crawler::config::{CrawlConfig, RATE_LIMIT_COOLDOWN};

/// Rate-limited HTTP client for the Helix API.
pub struct HelixClient {
    transport: Box<dyn Transport>,
    base_url: String,
    sleep_time: Duration,
}

impl HelixClient {
    /// Build a client with its own HTTP session, paced for `config`'s rate
    /// budget.
    pub fn new(config: &CrawlConfig) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(config.credentials.clone())?;
        Ok(Self::with_transport(
            Box::new(transport),
            config.base_url.clone(),
            config.sleep_time(),
        ))
    }

    /// Build a client over an explicit transport.
    pub fn with_transport(
        transport: Box<dyn Transport>,
        base_url: impl Into<String>,
        sleep_time: Duration,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            sleep_time,
        }
    }

    /// Execute a GET against `path`, classify the response, and enforce the
    /// inter-request spacing.
    ///
    /// Classification, applied when the body carries no `data` field:
    /// - `"bad request"`: returned as-is with no retry; the caller observes
    ///   an envelope without records
    /// - `"too many requests"`: 60 second cool-down, then the request is
    ///   reissued exactly once and the retry's envelope is returned as-is
    /// - anything else: returned as parsed
    pub async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> ApiResult<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(path, params);
        let envelope = self.issue::<T>(&url).await?;

        if envelope.data.is_none() {
            if let Some(error) = envelope.error.as_deref() {
                match error.to_lowercase().as_str() {
                    "bad request" => {
                        debug!(url = %url, "Bad request; treating as no data");
                    }
                    "too many requests" => {
                        warn!(
                            cooldown_secs = RATE_LIMIT_COOLDOWN.as_secs(),
                            "Too many requests; cooling down before one retry"
                        );
                        sleep(RATE_LIMIT_COOLDOWN).await;
                        return self.issue::<T>(&url).await;
                    }
                    other => {
                        debug!(error = other, "Unclassified API error; returning as parsed");
                    }
                }
            }
        }

        Ok(envelope)
    }

    /// Issue one GET and parse the envelope, sleeping `sleep_time` afterward
    /// whether the request succeeded or not.
    async fn issue<T>(&self, url: &str) -> ApiResult<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let result = self
            .transport
            .get_json(url)
            .await
            .and_then(Envelope::from_value);
        sleep(self.sleep_time).await;
        result
    }

    fn build_url(&self, path: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return format!("{}{}", self.base_url, path);
        }
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}{}?{}", self.base_url, path, query.join("&"))
    }
}
