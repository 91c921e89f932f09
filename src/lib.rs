//! # Follow Graph Crawler Library
//!
//! A library for crawling follower/following relationships from the Twitch
//! Helix API under a global rate budget, and merging the per-run shard files
//! into a single dataset for downstream model training.
//!
//! ## Features
//!
//! - **Rate Limiting**: per-worker request spacing derived from a global
//!   requests-per-minute ceiling, with automatic 429 cool-down handling
//! - **Bounded Pagination**: cursor-based page walking capped at 1000 edges
//!   (10 pages) per entity for a predictable per-entity cost
//! - **Parallel Crawling**: a fixed pool of isolated workers, each with its
//!   own HTTP session, streaming completions back to a single controller
//! - **Shard Merging**: last-write-wins aggregation of per-run JSON shards
//!
//! ## Quick Start
//!
//! ```no_run
//! use follow_graph_crawler::crawler::{CrawlConfig, CrawlJob, Credentials, Dispatcher};
//! use follow_graph_crawler::crawler::job::HelixJobRunner;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CrawlConfig::new(Credentials::from_env()?);
//! let jobs: Vec<CrawlJob> = vec![
//!     CrawlJob::followers("some_streamer"),
//!     CrawlJob::following(44322889),
//! ];
//!
//! let dispatcher = Dispatcher::new(config.clone());
//! let runner_config = config.clone();
//! let results = dispatcher
//!     .run(jobs, move |_worker| HelixJobRunner::new(&runner_config))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`api`] - Helix client, identity resolution, and paginated edge fetching
//! - [`crawler`] - crawl jobs, worker pool dispatch, and configuration
//! - [`output`] - shard files and dataset merging
//! - [`cli`] - command implementations for the binary

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Helix API access: client, resolver, and edge fetcher
pub mod api;

/// CLI command implementations
pub mod cli;

/// Crawl orchestration
pub mod crawler;

/// Shard output and merging
pub mod output;

// Re-export commonly used types
pub use crawler::{CrawlConfig, Credentials};

/// Direction of a follow relation relative to the queried entity.
///
/// The Helix follows endpoint is symmetric: `to_id=<entity>` lists the
/// entity's followers, `from_id=<entity>` lists who the entity follows. The
/// opposing side of each returned record carries the ids/names that populate
/// the edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Accounts following the queried entity (`to_id` query role)
    #[serde(rename = "followers")]
    Followers,
    /// Accounts the queried entity follows (`from_id` query role)
    #[serde(rename = "following")]
    Following,
}

impl Direction {
    /// Query parameter naming the queried entity (`to_id` / `from_id`).
    pub fn query_param(&self) -> &'static str {
        match self {
            Direction::Followers => "to_id",
            Direction::Following => "from_id",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Followers => "followers",
            Direction::Following => "following",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "followers" => Ok(Direction::Followers),
            "following" => Ok(Direction::Following),
            _ => Err(format!("Invalid direction: {s}")),
        }
    }
}

/// One follow edge as returned by the Helix follows endpoint.
///
/// `followed_at` is present when fetching the "following" direction and
/// absent for "followers".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowRecord {
    /// Id of the follower side of the edge
    pub from_id: String,
    /// Display name of the follower side
    #[serde(default)]
    pub from_name: String,
    /// Id of the followed side of the edge
    pub to_id: String,
    /// Display name of the followed side
    #[serde(default)]
    pub to_name: String,
    /// RFC 3339 timestamp of when the follow happened, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed_at: Option<String>,
}

impl FollowRecord {
    /// Id of the side opposing the queried entity for `direction`.
    pub fn opposing_id(&self, direction: Direction) -> &str {
        match direction {
            Direction::Followers => &self.from_id,
            Direction::Following => &self.to_id,
        }
    }

    /// Display name of the side opposing the queried entity.
    pub fn opposing_name(&self, direction: Direction) -> &str {
        match direction {
            Direction::Followers => &self.from_name,
            Direction::Following => &self.to_name,
        }
    }
}

/// One entity's crawled result in one of the supported output shapes.
///
/// Serialized untagged so shard files keep the exact JSON layout the
/// downstream training pipeline expects:
///
/// 1. `{"id": 123, "followers": ["456", ...]}` keyed by handle
/// 2. `{"total": 3500, "following": [["name", "2020-01-01T00:00:00Z"], ...]}`
///    keyed by the decimal id
/// 3. `["456", ...]` as a bare id list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EntityRecord {
    /// Followers of a streamer, keyed by the streamer's handle
    Followers {
        /// Resolved numeric id of the streamer
        id: u64,
        /// Ids of the accounts following the streamer
        followers: Vec<String>,
    },
    /// Accounts a user follows, keyed by the user's id
    Following {
        /// Total follow count reported by the API (may exceed the crawled cap)
        total: u64,
        /// `[name, followed_at]` pairs in page order
        following: Vec<(String, String)>,
    },
    /// Generic list of opposing-side ids
    Ids(Vec<String>),
}

impl EntityRecord {
    /// Number of edges held by this record.
    pub fn edge_count(&self) -> usize {
        match self {
            EntityRecord::Followers { followers, .. } => followers.len(),
            EntityRecord::Following { following, .. } => following.len(),
            EntityRecord::Ids(ids) => ids.len(),
        }
    }
}
