//! The merge subcommand driven through the compiled binary.

use assert_cmd::Command;
use follow_graph_crawler::output::{read_shard, write_shard, Shard};
use follow_graph_crawler::EntityRecord;
use std::path::PathBuf;

fn write(dir: &tempfile::TempDir, name: &str, entries: Vec<(String, EntityRecord)>) -> PathBuf {
    let path = dir.path().join(name);
    let shard: Shard = entries.into_iter().collect();
    write_shard(&path, &shard).unwrap();
    path
}

fn followers(id: u64, ids: &[&str]) -> EntityRecord {
    EntityRecord::Followers {
        id,
        followers: ids.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_merge_command_writes_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        &dir,
        "run1.json",
        vec![
            ("alice".to_string(), followers(1, &["10"])),
            ("bob".to_string(), followers(2, &["20"])),
        ],
    );
    let second = write(
        &dir,
        "run2.json",
        vec![("bob".to_string(), followers(2, &["20", "21"]))],
    );
    let output = dir.path().join("dataset.json");

    Command::cargo_bin("follow-graph-crawler")
        .unwrap()
        .arg("merge")
        .arg("--inputs")
        .arg(&first)
        .arg(&second)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let dataset = read_shard(&output).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.get("bob"), Some(&followers(2, &["20", "21"])));
}

#[test]
fn test_merge_command_fails_on_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dataset.json");

    Command::cargo_bin("follow-graph-crawler")
        .unwrap()
        .arg("merge")
        .arg("--inputs")
        .arg(dir.path().join("nope.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .failure();

    assert!(!output.exists());
}

#[test]
fn test_merge_command_requires_inputs() {
    Command::cargo_bin("follow-graph-crawler")
        .unwrap()
        .arg("merge")
        .arg("--output")
        .arg("dataset.json")
        .assert()
        .failure();
}
