//! Shard aggregation
//!
//! Folds per-run shard files into one dataset. Collisions keep the later
//! shard's value; shards are expected to cover disjoint entity partitions,
//! so collisions should be rare to absent in practice.

use std::path::Path;
use tracing::info;

use crate::output::{read_shard, OutputError, Shard};

/// Merge shards in path order with last-write-wins per key.
pub fn merge_shards<P: AsRef<Path>>(paths: &[P]) -> Result<Shard, OutputError> {
    let mut dataset = Shard::new();

    for path in paths {
        let shard = read_shard(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            entities = shard.len(),
            "Merging shard"
        );
        // BTreeMap::extend overwrites existing keys with the later value.
        dataset.extend(shard);
    }

    info!(entities = dataset.len(), "Merge complete");
    Ok(dataset)
}
