//! Description scoring - length, depth, sentence structure and originality

use super::{char_len, word_count};
use crate::analyzer::scoring::ScoreCalculator;
use crate::{
    Category, CategoryScore, Effort, Impact, Issue, ListingInput, Recommendation, Rule, Severity,
};
use regex::Regex;
use std::sync::LazyLock;

const IDEAL_MIN: usize = 150;
const IDEAL_MAX: usize = 500;
const SHORT_MIN: usize = 50;

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Remove markup tags and surrounding whitespace
pub fn strip_markup(description: &str) -> String {
    MARKUP_TAG.replace_all(description, "").trim().to_string()
}

/// Score the listing description (0-100)
pub fn score_description(input: &ListingInput) -> CategoryScore {
    let text = strip_markup(&input.description);
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if text.is_empty() {
        issues.push(Issue::new(
            Rule::DescMissing,
            Severity::Error,
            Impact::Critical,
            "Listing has no description",
        ));
        recommendations.push(Recommendation::new(
            Category::Description,
            Impact::Critical,
            Effort::Medium,
            "Write a description of 150-500 characters covering features and benefits",
        ));
        return ScoreCalculator::category_score(Category::Description, 0, issues, recommendations);
    }

    let mut score = 0;

    let length = char_len(&text);
    if length >= IDEAL_MIN {
        // Anything past IDEAL_MAX keeps full length credit
        score += 35;
    } else if length >= SHORT_MIN {
        score += 20;
        issues.push(
            Issue::new(
                Rule::DescShort,
                Severity::Warning,
                Impact::High,
                format!("Description is short ({} characters)", length),
            )
            .with_current(length)
            .with_recommended("150-500"),
        );
        recommendations.push(Recommendation::new(
            Category::Description,
            Impact::High,
            Effort::Medium,
            format!(
                "Expand the description to {}-{} characters with usage and material details",
                IDEAL_MIN, IDEAL_MAX
            ),
        ));
    } else {
        score += 10;
        issues.push(
            Issue::new(
                Rule::DescVeryShort,
                Severity::Error,
                Impact::Critical,
                format!("Description is far too short ({} characters)", length),
            )
            .with_current(length),
        );
    }

    let words = word_count(&text);
    if words >= 25 {
        score += 20;
    } else if words >= 10 {
        score += 10;
    }

    if text.contains(['.', '!', '?']) {
        score += 15;
    } else {
        recommendations.push(Recommendation::new(
            Category::Description,
            Impact::Medium,
            Effort::Low,
            "Structure the description into complete sentences",
        ));
    }

    if text.chars().any(|c| c.is_ascii_digit()) {
        score += 10;
    }

    if text.to_lowercase() == input.title.trim().to_lowercase() {
        issues.push(Issue::new(
            Rule::DescSameAsTitle,
            Severity::Warning,
            Impact::High,
            "Description only repeats the title",
        ));
    } else {
        score += 20;
    }

    ScoreCalculator::category_score(Category::Description, score, issues, recommendations)
}
