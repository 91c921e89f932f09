//! Shard output
//!
//! A shard is one run's results as a JSON object mapping entity key to
//! [`EntityRecord`]. Shards from different runs (covering disjoint entity
//! partitions) are merged into one dataset by [`merge`].

use std::collections::BTreeMap;
use std::path::Path;

use crate::EntityRecord;

pub mod merge;

pub use merge::merge_shards;

/// One run's results: entity key mapped to its crawled record.
pub type Shard = BTreeMap<String, EntityRecord>;

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Write a shard to `path` as a single JSON object.
pub fn write_shard(path: &Path, shard: &Shard) -> Result<(), OutputError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer(std::io::BufWriter::new(file), shard)?;
    Ok(())
}

/// Read a shard back from `path`.
pub fn read_shard(path: &Path) -> Result<Shard, OutputError> {
    let file = std::fs::File::open(path)?;
    let shard = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(shard)
}

/// Collect completion-ordered results into a shard.
///
/// Duplicate keys keep the later completion, mirroring the merge policy.
pub fn collect_shard(results: Vec<(String, EntityRecord)>) -> Shard {
    results.into_iter().collect()
}
