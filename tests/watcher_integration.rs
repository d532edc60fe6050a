//! Integration tests for the watcher public API.
//! Creates watchers on temp directories and checks which changes surface.

use listaudit::loader::is_listing_file;
use listaudit::watcher::ListingWatcher;
use std::path::Path;
use std::time::Duration;

#[test]
fn listing_files_are_json_only() {
    assert!(is_listing_file(Path::new("catalog/mug.json")));
    assert!(is_listing_file(Path::new("catalog/MUG.JSON")));
    assert!(!is_listing_file(Path::new("catalog/mug.yaml")));
    assert!(!is_listing_file(Path::new("catalog/.listauditrc.json")));
    assert!(!is_listing_file(Path::new(".listaudit-history.json")));
}

#[test]
fn watcher_watch_temp_dir_succeeds() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = ListingWatcher::watch(dir.path());
    assert!(
        result.is_ok(),
        "watch on temp dir should succeed: {:?}",
        result.err()
    );
}

#[test]
fn watcher_without_changes_times_out_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let watcher = ListingWatcher::watch(dir.path()).unwrap();
    assert!(watcher
        .next_changes_timeout(Duration::from_millis(100))
        .is_empty());
}

#[test]
fn watcher_ignores_non_listing_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let watcher = ListingWatcher::watch(dir.path()).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "draft").unwrap();

    let changes = watcher.next_changes_timeout(Duration::from_secs(2));
    assert!(changes.iter().all(|p| is_listing_file(p)));
}

#[test]
fn single_file_watch_skips_sibling_listings() {
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("mug.json");
    std::fs::write(&target, "{}").unwrap();
    let watcher = ListingWatcher::watch(&target).unwrap();

    std::fs::write(dir.path().join("bowl.json"), "{}").unwrap();
    let changes = watcher.next_changes_timeout(Duration::from_secs(2));
    assert!(
        changes.iter().all(|p| p.file_name() == target.file_name()),
        "sibling change surfaced: {:?}",
        changes
    );
}
