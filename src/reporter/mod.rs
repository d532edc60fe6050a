//! Reporter module for output formatting

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::ScoreResult;
use serde::Serialize;
use std::path::PathBuf;

/// A scored listing as shown to the user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredListing {
    pub id: String,
    pub source: PathBuf,
    /// Score from the last recorded run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<u8>,
    #[serde(flatten)]
    pub result: ScoreResult,
}

impl ScoredListing {
    pub fn new(id: impl Into<String>, source: impl Into<PathBuf>, result: ScoreResult) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            previous_score: None,
            result,
        }
    }

    pub fn with_previous(mut self, previous: Option<u8>) -> Self {
        self.previous_score = previous;
        self
    }
}
