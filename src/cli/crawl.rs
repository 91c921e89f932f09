//! Crawl and merge command implementations

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

use super::CliError;
use crate::crawler::job::HelixJobRunner;
use crate::crawler::{CrawlConfig, CrawlJob, Credentials, Dispatcher};
use crate::output::{collect_shard, merge_shards, write_shard};
use crate::EntityRecord;

/// Upper bound on the worker pool, guarding against configurations that
/// would drive the per-worker spacing below practical HTTP latency.
const MAX_WORKERS: usize = 32;

fn parse_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value == 0 {
        return Err("workers must be at least 1".to_string());
    }
    if value > MAX_WORKERS {
        return Err(format!("workers {value} exceeds maximum of {MAX_WORKERS}"));
    }
    Ok(value)
}

/// Follow Graph Crawler CLI
#[derive(Parser, Debug)]
#[command(name = "follow-graph-crawler")]
#[command(about = "Crawl follower/following graphs and merge shard files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Number of parallel workers
    #[arg(long, global = true, default_value = "5", value_parser = parse_workers)]
    pub workers: usize,

    /// Global request ceiling, requests per minute across all workers
    #[arg(long, global = true, default_value = "800")]
    pub rate_limit: u32,

    /// Records per page (1-100)
    #[arg(long, global = true, default_value = "100")]
    pub page_size: u32,

    /// Per-entity edge cap
    #[arg(long, global = true, default_value = "1000")]
    pub edge_cap: usize,
}

impl Cli {
    fn crawl_config(&self) -> Result<CrawlConfig, CliError> {
        let credentials = Credentials::from_env()?;
        Ok(CrawlConfig::new(credentials)
            .with_workers(self.workers)
            .with_rate_limit(self.rate_limit)
            .with_page_size(self.page_size)
            .with_edge_cap(self.edge_cap))
    }
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the followers of each handle in the input list
    Followers(FollowersArgs),

    /// Crawl who each user id in the input follows
    Following(FollowingArgs),

    /// Merge shard files into one dataset
    Merge(MergeArgs),
}

/// Arguments for the followers crawl
#[derive(Parser, Debug)]
pub struct FollowersArgs {
    /// Handle list: a CSV with a `name` column, or one handle per line
    #[arg(long)]
    pub input: PathBuf,

    /// Shard file to write
    #[arg(long)]
    pub output: PathBuf,
}

/// Arguments for the following crawl
#[derive(Parser, Debug)]
pub struct FollowingArgs {
    /// Followers shard whose collected follower ids become the entity list
    #[arg(long)]
    pub input: PathBuf,

    /// Skip this many ids from the front of the deduplicated list
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Crawl at most this many ids (0 = no limit)
    #[arg(long, default_value = "0")]
    pub limit: usize,

    /// Shard file to write
    #[arg(long)]
    pub output: PathBuf,
}

/// Arguments for shard merging
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Shard files, in precedence order (later shards win collisions)
    #[arg(long, required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Dataset file to write
    #[arg(long)]
    pub output: PathBuf,
}

impl FollowersArgs {
    /// Crawl followers for every handle in the input list.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let handles = read_handles(&self.input)?;
        info!(handles = handles.len(), "Starting followers crawl");

        let jobs = handles.into_iter().map(CrawlJob::followers).collect();
        run_and_write(cli, jobs, &self.output).await
    }
}

impl FollowingArgs {
    /// Crawl follows for the follower ids aggregated from a followers shard.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let ids = follower_ids_from_shard(&self.input)?;
        let ids = slice_ids(ids, self.offset, self.limit);
        info!(
            ids = ids.len(),
            offset = self.offset,
            "Starting following crawl"
        );

        let jobs = ids.into_iter().map(CrawlJob::following).collect();
        run_and_write(cli, jobs, &self.output).await
    }
}

impl MergeArgs {
    /// Merge the input shards and write the dataset.
    pub async fn execute(&self) -> Result<(), CliError> {
        let dataset = merge_shards(&self.inputs)?;
        write_shard(&self.output, &dataset)?;
        info!(
            shards = self.inputs.len(),
            entities = dataset.len(),
            output = %self.output.display(),
            "Dataset written"
        );
        Ok(())
    }
}

async fn run_and_write(cli: &Cli, jobs: Vec<CrawlJob>, output: &Path) -> Result<(), CliError> {
    let config = cli.crawl_config()?;
    let runner_config = config.clone();

    let results = Dispatcher::new(config)
        .run(jobs, move |_worker| HelixJobRunner::new(&runner_config))
        .await?;

    let shard = collect_shard(results);
    write_shard(output, &shard)?;
    info!(entities = shard.len(), output = %output.display(), "Shard written");
    Ok(())
}

/// Read handles from a CSV `name` column, or one per line for non-CSV files.
fn read_handles(path: &Path) -> Result<Vec<String>, CliError> {
    if path.extension().is_some_and(|ext| ext == "csv") {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let name_idx = headers
            .iter()
            .position(|h| h == "name")
            .ok_or_else(|| CliError::InvalidArgument("CSV has no `name` column".to_string()))?;

        let mut handles = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(name) = record.get(name_idx) {
                if !name.is_empty() {
                    handles.push(name.to_string());
                }
            }
        }
        return Ok(handles);
    }

    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Aggregate the unique follower ids out of a followers shard.
fn follower_ids_from_shard(path: &Path) -> Result<Vec<u64>, CliError> {
    let shard = crate::output::read_shard(path)?;

    let mut ids = BTreeSet::new();
    for record in shard.values() {
        if let EntityRecord::Followers { followers, .. } = record {
            for id in followers {
                if let Ok(id) = id.parse::<u64>() {
                    ids.insert(id);
                }
            }
        }
    }

    Ok(ids.into_iter().collect())
}

/// Window the id list so one large crawl can be split across runs.
fn slice_ids(ids: Vec<u64>, offset: usize, limit: usize) -> Vec<u64> {
    let iter = ids.into_iter().skip(offset);
    if limit == 0 {
        iter.collect()
    } else {
        iter.take(limit).collect()
    }
}
