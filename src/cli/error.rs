//! CLI error types and conversions

use crate::api::ApiError;
use crate::crawler::CrawlError;
use crate::output::OutputError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// API error
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Crawl error
    #[error("crawl error: {0}")]
    Crawl(#[from] CrawlError),

    /// Output error
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Input file error
    #[error("input error: {0}")]
    Input(#[from] std::io::Error),

    /// CSV parsing error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
