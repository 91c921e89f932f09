//! Crawl job definitions and execution

use async_trait::async_trait;

use crate::api::{ApiResult, FollowsFetcher, HelixClient, Resolver};
use crate::crawler::config::CrawlConfig;
use crate::{Direction, EntityRecord};

/// One unit of crawl work: a single entity in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlJob {
    /// Collect the followers of a streamer known by handle.
    ///
    /// The handle is resolved to a numeric id first; spaces are stripped for
    /// the query but the shard key keeps the handle exactly as given.
    Followers {
        /// Streamer handle, possibly containing spaces
        handle: String,
    },
    /// Collect the accounts an already-resolved user follows.
    Following {
        /// Resolved numeric user id
        id: u64,
    },
}

impl CrawlJob {
    /// Followers job for `handle`.
    pub fn followers(handle: impl Into<String>) -> Self {
        CrawlJob::Followers {
            handle: handle.into(),
        }
    }

    /// Following job for an already-resolved `id`.
    pub fn following(id: u64) -> Self {
        CrawlJob::Following { id }
    }

    /// Shard key this job's result would be stored under.
    pub fn key(&self) -> String {
        match self {
            CrawlJob::Followers { handle } => handle.clone(),
            CrawlJob::Following { id } => id.to_string(),
        }
    }
}

impl std::fmt::Display for CrawlJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrawlJob::Followers { handle } => write!(f, "followers({handle})"),
            CrawlJob::Following { id } => write!(f, "following({id})"),
        }
    }
}

/// Executes one job against the API.
///
/// The dispatcher constructs one runner per worker, so each worker carries
/// its own HTTP session and rate pacing. Tests substitute scripted runners.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run one job to completion.
    ///
    /// Resolves to `Ok(Some((key, record)))` for a populated result,
    /// `Ok(None)` when the entity could not be resolved or fetched, and
    /// `Err` only for faults worth logging at the worker.
    async fn run(&self, job: &CrawlJob) -> ApiResult<Option<(String, EntityRecord)>>;
}

/// Production runner backed by one rate-limited [`HelixClient`].
pub struct HelixJobRunner {
    client: HelixClient,
    page_size: u32,
    edge_cap: usize,
}

impl HelixJobRunner {
    /// Build a runner with its own HTTP session, paced for `config`.
    pub fn new(config: &CrawlConfig) -> ApiResult<Self> {
        Ok(Self {
            client: HelixClient::new(config)?,
            page_size: config.page_size,
            edge_cap: config.edge_cap,
        })
    }

    /// Build a runner over an existing client (alternate transports).
    pub fn with_client(client: HelixClient, page_size: u32, edge_cap: usize) -> Self {
        Self {
            client,
            page_size,
            edge_cap,
        }
    }

    async fn run_followers(&self, handle: &str) -> ApiResult<Option<(String, EntityRecord)>> {
        let Some(id) = Resolver::new(&self.client).resolve(handle).await? else {
            return Ok(None);
        };

        let fetcher = FollowsFetcher::new(&self.client, self.page_size, self.edge_cap);
        let Some(edges) = fetcher.fetch_all(id, Direction::Followers).await? else {
            return Ok(None);
        };

        let followers = edges
            .records
            .iter()
            .map(|r| r.opposing_id(Direction::Followers).to_string())
            .collect();

        Ok(Some((
            handle.to_string(),
            EntityRecord::Followers { id, followers },
        )))
    }

    async fn run_following(&self, id: u64) -> ApiResult<Option<(String, EntityRecord)>> {
        let fetcher = FollowsFetcher::new(&self.client, self.page_size, self.edge_cap);
        let Some(edges) = fetcher.fetch_all(id, Direction::Following).await? else {
            return Ok(None);
        };

        let following: Vec<(String, String)> = edges
            .records
            .iter()
            .map(|r| {
                (
                    r.opposing_name(Direction::Following).to_string(),
                    r.followed_at.clone().unwrap_or_default(),
                )
            })
            .collect();

        let total = edges.total.unwrap_or(following.len() as u64);

        Ok(Some((
            id.to_string(),
            EntityRecord::Following { total, following },
        )))
    }
}

#[async_trait]
impl JobRunner for HelixJobRunner {
    async fn run(&self, job: &CrawlJob) -> ApiResult<Option<(String, EntityRecord)>> {
        match job {
            CrawlJob::Followers { handle } => self.run_followers(handle).await,
            CrawlJob::Following { id } => self.run_following(*id).await,
        }
    }
}
