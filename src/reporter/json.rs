//! JSON reporter for machine-readable output

use super::ScoredListing;
use crate::BatchStats;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single scored listing
    pub fn report(&self, listing: &ScoredListing) -> String {
        self.render(listing, "{}")
    }

    /// Report a batch as `{results, stats}`
    pub fn report_with_summary(&self, listings: &[ScoredListing], stats: &BatchStats) -> String {
        self.render(
            &JsonOutput {
                results: listings,
                stats,
            },
            "{}",
        )
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    results: &'a [ScoredListing],
    stats: &'a BatchStats,
}
