//! Trend tracking - persist scores to .listaudit-history.json

use crate::{Grade, ScoreResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const HISTORY_FILENAME: &str = ".listaudit-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRun {
    pub timestamp: String,
    pub listings: HashMap<String, ListingScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingScore {
    pub score: u8,
    pub grade: Grade,
    pub issues: usize,
}

/// History key for a listing: source file plus listing id
pub fn listing_key(source: &Path, id: &str) -> String {
    format!("{}:{}", source.display(), id)
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history).context("Failed to serialize history")?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write history to {}", path.display()))
}

/// Score a listing had in the latest recorded run
pub fn previous_score(history: &HistoryFile, key: &str) -> Option<u8> {
    history.runs.last()?.listings.get(key).map(|l| l.score)
}

/// Record a run of scored listings, keeping the last `MAX_RUNS`
pub fn append_run(history: &mut HistoryFile, results: &[(String, ScoreResult)]) {
    let listings = results
        .iter()
        .map(|(key, result)| {
            (
                key.clone(),
                ListingScore {
                    score: result.overall_score,
                    grade: result.grade,
                    issues: result.issues.len(),
                },
            )
        })
        .collect();

    history.runs.push(HistoryRun {
        timestamp: chrono::Utc::now().to_rfc3339(),
        listings,
    });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Format delta for console: "[was 82, down 4]" or "[was 82, up 2]" or ""
pub fn format_delta(previous: Option<u8>, current: u8) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    match current as i16 - prev as i16 {
        0 => format!(" [unchanged at {}]", current),
        diff if diff > 0 => format!(" [was {}, up {}]", prev, diff),
        diff => format!(" [was {}, down {}]", prev, -diff),
    }
}
