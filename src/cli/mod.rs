//! CLI command implementations

pub mod crawl;
pub mod error;

pub use crawl::{Cli, Commands};
pub use error::CliError;
