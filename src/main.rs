//! Main entry point for the follow-graph-crawler CLI

use clap::Parser;
use follow_graph_crawler::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    // Check if JSON output is requested via environment variable
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("follow_graph_crawler=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Followers(ref args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
        Commands::Following(ref args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
        Commands::Merge(ref args) => args.execute().await.map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
