//! Category scorers for listing quality
//!
//! Each scorer is a plain function over an immutable [`ListingInput`] that
//! returns a finished [`CategoryScore`](crate::CategoryScore).

pub mod description;
pub mod images;
pub mod meta;
pub mod structure;
pub mod title;

pub use description::score_description;
pub use images::score_images;
pub use meta::score_meta;
pub use structure::score_structure;
pub use title::score_title;

use crate::{CategoryBreakdown, ListingInput};

/// Run all five scorers
pub fn score_categories(input: &ListingInput) -> CategoryBreakdown {
    CategoryBreakdown {
        title: score_title(input),
        description: score_description(input),
        meta: score_meta(input),
        images: score_images(input),
        structure: score_structure(input),
    }
}

/// Length in characters, not bytes
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Whitespace-separated, non-empty tokens
pub(crate) fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Trimmed value of an optional text field, `None` when absent or blank
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
