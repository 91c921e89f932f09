//! Worker pool dispatch
//!
//! Jobs are partitioned round-robin across a fixed pool of spawned workers.
//! Each worker owns its own [`JobRunner`] (and therefore its own HTTP
//! session), and sends one completion message per job over an mpsc channel.
//! The controller is the channel's only consumer and the sole writer of the
//! result collection, so no locking is needed anywhere in the pipeline.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::ApiResult;
use crate::crawler::job::{CrawlJob, JobRunner};
use crate::crawler::{CrawlConfig, CrawlError};
use crate::EntityRecord;

/// One per-job completion message from a worker.
struct Completion {
    job: CrawlJob,
    result: Option<(String, EntityRecord)>,
}

/// Runs crawl jobs across a fixed pool of isolated workers.
pub struct Dispatcher {
    config: CrawlConfig,
}

impl Dispatcher {
    /// Create a dispatcher for `config`.
    pub fn new(config: CrawlConfig) -> Self {
        Self { config }
    }

    /// Run every job in `jobs`, collecting non-empty results in completion
    /// order.
    ///
    /// `make_runner` is invoked once per worker slot so each worker gets its
    /// own runner. A job error is logged and degrades to an empty completion;
    /// it never aborts sibling jobs. Callers must not depend on positional
    /// correspondence between `jobs` and the returned collection.
    pub async fn run<R, F>(
        &self,
        jobs: Vec<CrawlJob>,
        make_runner: F,
    ) -> Result<Vec<(String, EntityRecord)>, CrawlError>
    where
        R: JobRunner + Send + 'static,
        F: Fn(usize) -> ApiResult<R>,
    {
        let total = jobs.len();
        let workers = self.config.workers.min(total.max(1));

        // Round-robin partition: worker w owns jobs w, w+W, w+2W, ...
        let mut chunks: Vec<Vec<CrawlJob>> = (0..workers).map(|_| Vec::new()).collect();
        for (i, job) in jobs.into_iter().enumerate() {
            chunks[i % workers].push(job);
        }

        let (tx, mut rx) = mpsc::channel::<Completion>(workers.max(1));

        let mut handles = Vec::with_capacity(workers);
        for (worker, chunk) in chunks.into_iter().enumerate() {
            let runner = make_runner(worker)?;
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                for job in chunk {
                    let result = match runner.run(&job).await {
                        Ok(result) => result,
                        Err(e) => {
                            warn!(worker, job = %job, error = %e, "Job failed");
                            None
                        }
                    };
                    if tx.send(Completion { job, result }).await.is_err() {
                        // Controller is gone; nothing left to report to.
                        return;
                    }
                }
            }));
        }
        drop(tx);

        info!(jobs = total, workers, "Dispatching crawl jobs");
        let progress = ProgressBar::new(total as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} entities ({elapsed} elapsed, eta {eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let started = Instant::now();
        let mut results = Vec::new();
        let mut empty = 0usize;

        // Single-writer accumulation: only this loop touches `results`.
        while let Some(completion) = rx.recv().await {
            progress.inc(1);
            match completion.result {
                Some(entry) => results.push(entry),
                None => {
                    empty += 1;
                    warn!(job = %completion.job, "No data collected for entity");
                }
            }
        }
        progress.finish_and_clear();

        for handle in handles {
            if let Err(e) = handle.await {
                // A panicked worker already dropped its sender; its remaining
                // jobs are simply absent from the results.
                warn!(error = %e, "Worker task did not complete cleanly");
            }
        }

        info!(
            collected = results.len(),
            empty,
            elapsed_secs = started.elapsed().as_secs(),
            "Crawl run complete"
        );

        Ok(results)
    }
}
