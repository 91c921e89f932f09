//! Crawl configuration and rate-budget derivation

use crate::crawler::CrawlError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of parallel crawl workers.
pub const DEFAULT_WORKERS: usize = 5;

/// Default global request ceiling, requests per minute across all workers.
pub const DEFAULT_RATE_LIMIT_PER_MIN: u32 = 800;

/// Default (and maximum) page size accepted by the follows endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Per-entity edge ceiling: 10 full pages. Bounds worst-case work per entity
/// to 10 API calls regardless of true graph size.
pub const DEFAULT_EDGE_CAP: usize = 1000;

/// Safety margin applied to the derived inter-request spacing, absorbing
/// clock drift and burst timing across workers.
pub const RATE_SAFETY_MARGIN: f64 = 1.15;

/// Cool-down applied when the API answers "Too Many Requests".
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);

/// Default Helix API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/helix";

/// API credentials, read-only for the duration of a run.
///
/// Injected as request headers (`Client-Id`, `Authorization`, `User-Agent`),
/// never as query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Registered application client id
    pub client_id: String,
    /// OAuth bearer token
    pub bearer_token: String,
    /// User-agent string identifying the crawler
    pub user_agent: String,
}

impl Credentials {
    /// Create credentials from explicit values.
    pub fn new(
        client_id: impl Into<String>,
        bearer_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            bearer_token: bearer_token.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Read credentials from `TWITCH_CLIENT_ID`, `TWITCH_BEARER_TOKEN`, and
    /// `TWITCH_USER_AGENT`.
    pub fn from_env() -> Result<Self, CrawlError> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| CrawlError::Config(format!("missing environment variable {name}")))
        };

        Ok(Self {
            client_id: var("TWITCH_CLIENT_ID")?,
            bearer_token: var("TWITCH_BEARER_TOKEN")?,
            user_agent: var("TWITCH_USER_AGENT")?,
        })
    }
}

/// Crawl run configuration.
///
/// Immutable once the dispatcher starts; workers receive clones.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of parallel workers in the pool
    pub workers: usize,
    /// Global request ceiling, requests per minute across all workers
    pub rate_limit_per_min: u32,
    /// Records requested per page, in `[1, 100]`
    pub page_size: u32,
    /// Per-entity edge cap
    pub edge_cap: usize,
    /// API base URL
    pub base_url: String,
    /// Request credentials
    pub credentials: Credentials,
}

impl CrawlConfig {
    /// Create a configuration with the standard crawl parameters.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            rate_limit_per_min: DEFAULT_RATE_LIMIT_PER_MIN,
            page_size: DEFAULT_PAGE_SIZE,
            edge_cap: DEFAULT_EDGE_CAP,
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
        }
    }

    /// Set the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the global requests-per-minute ceiling.
    pub fn with_rate_limit(mut self, requests_per_min: u32) -> Self {
        self.rate_limit_per_min = requests_per_min.max(1);
        self
    }

    /// Set the page size, clamped to the endpoint's `[1, 100]` range.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    /// Set the per-entity edge cap.
    pub fn with_edge_cap(mut self, edge_cap: usize) -> Self {
        self.edge_cap = edge_cap;
        self
    }

    /// Override the API base URL (test servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-worker spacing between consecutive requests.
    ///
    /// With `W` workers under a global ceiling of `R` requests/minute, each
    /// worker must space its own requests by `1.15 * (W * 60) / R` seconds.
    /// The spacing applies between any two consecutive requests issued by a
    /// worker - identity resolution followed by a page fetch counts as two
    /// spaced requests, not one per-entity tick.
    pub fn sleep_time(&self) -> Duration {
        let secs =
            RATE_SAFETY_MARGIN * (self.workers as f64 * 60.0) / self.rate_limit_per_min as f64;
        Duration::from_secs_f64(secs)
    }
}
