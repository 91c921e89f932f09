//! Crawl orchestration
//!
//! 1. **Configuration**: rate budget and credentials via [`config::CrawlConfig`]
//! 2. **Jobs**: one entity per [`job::CrawlJob`], run through a [`job::JobRunner`]
//! 3. **Dispatch**: a fixed pool of isolated workers in [`dispatcher::Dispatcher`]
//!
//! Errors never cross a job boundary into the dispatcher: a job resolves to
//! either a populated record or an empty completion, and a failed entity is
//! simply absent from the run's shard.

pub mod config;
pub mod dispatcher;
pub mod job;

pub use config::{CrawlConfig, Credentials};
pub use dispatcher::Dispatcher;
pub use job::CrawlJob;

use crate::api::ApiError;

/// Crawl errors
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// API error surfaced while constructing a worker's client
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Worker task failed to join
    #[error("worker join error: {0}")]
    Join(String),
}
