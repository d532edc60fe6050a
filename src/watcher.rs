//! File system watcher for watch mode

use crate::loader::is_listing_file;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a catalog directory for listing file changes
pub struct ListingWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    /// File name to follow when watching a single listing file
    only: Option<OsString>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Listing files created or modified by `event`, limited to `only` when set
fn changed_listings(event: &notify::Event, only: Option<&OsStr>) -> Vec<PathBuf> {
    if !is_create_or_modify(&event.kind) {
        return vec![];
    }
    event
        .paths
        .iter()
        .filter(|p| is_listing_file(p))
        .filter(|p| only.map_or(true, |name| p.file_name() == Some(name)))
        .cloned()
        .collect()
}

impl ListingWatcher {
    /// Start watching the given path (file or directory)
    pub fn watch(path: &Path) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        let mut only = None;
        if path.is_dir() {
            watcher.watch(path, RecursiveMode::Recursive)?;
        } else {
            // The parent is watched so editors that replace the file are seen
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
            only = path.file_name().map(OsStr::to_os_string);
        }

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            only,
        })
    }

    fn paths_from_event(&self, event: &notify::Event) -> Vec<PathBuf> {
        changed_listings(event, self.only.as_deref())
    }

    /// Block until a listing file changes, then drain further events for
    /// DEBOUNCE_MS. Returns an empty list when `timeout` passes first.
    pub fn next_changes_timeout(&self, timeout: Duration) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        match self.receiver.recv_timeout(timeout) {
            Ok(Ok(event)) => all.extend(self.paths_from_event(&event)),
            Ok(Err(_)) | Err(_) => return vec![],
        }

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(self.paths_from_event(&event));
            }
        }

        let mut paths: Vec<PathBuf> = all.into_iter().collect();
        paths.sort();
        paths
    }

    /// Wait for the next batch of changes (debounced)
    pub fn next_changes(&self) -> Vec<PathBuf> {
        self.next_changes_timeout(Duration::from_secs(3600))
    }
}
