//! Shard merging over real files.

use follow_graph_crawler::output::{merge_shards, read_shard, write_shard, Shard};
use follow_graph_crawler::EntityRecord;
use std::path::PathBuf;

fn followers(id: u64, followers: &[&str]) -> EntityRecord {
    EntityRecord::Followers {
        id,
        followers: followers.iter().map(|s| s.to_string()).collect(),
    }
}

fn write(dir: &tempfile::TempDir, name: &str, entries: &[(&str, EntityRecord)]) -> PathBuf {
    let path = dir.path().join(name);
    let shard: Shard = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    write_shard(&path, &shard).unwrap();
    path
}

#[test]
fn test_later_shard_wins_key_collisions() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        &dir,
        "run1.json",
        &[
            ("alice", followers(1, &["10"])),
            ("bob", followers(2, &["20"])),
        ],
    );
    let second = write(
        &dir,
        "run2.json",
        &[
            ("bob", followers(2, &["20", "21"])),
            ("carol", followers(3, &["30"])),
        ],
    );

    let dataset = merge_shards(&[first, second]).unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.get("alice"), Some(&followers(1, &["10"])));
    assert_eq!(dataset.get("bob"), Some(&followers(2, &["20", "21"])));
    assert_eq!(dataset.get("carol"), Some(&followers(3, &["30"])));
}

#[test]
fn test_merged_dataset_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let followers_shard = write(&dir, "followers.json", &[("alice", followers(1, &["10"]))]);
    let following_shard = write(
        &dir,
        "following.json",
        &[(
            "10",
            EntityRecord::Following {
                total: 2,
                following: vec![("alice".to_string(), "2020-01-01T00:00:00Z".to_string())],
            },
        )],
    );

    let dataset = merge_shards(&[followers_shard, following_shard]).unwrap();
    let out = dir.path().join("dataset.json");
    write_shard(&out, &dataset).unwrap();

    assert_eq!(read_shard(&out).unwrap(), dataset);
}

#[test]
fn test_missing_shard_fails_the_merge() {
    let dir = tempfile::tempdir().unwrap();
    let present = write(&dir, "run1.json", &[("alice", followers(1, &["10"]))]);
    let absent = dir.path().join("does-not-exist.json");

    assert!(merge_shards(&[present, absent]).is_err());
}
