//! Title scoring - length, wording, capitalization, spam and repetition

use super::{char_len, word_count};
use crate::analyzer::scoring::ScoreCalculator;
use crate::{
    Category, CategoryScore, Effort, Impact, Issue, ListingInput, Recommendation, Rule, Severity,
};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const MIN_LENGTH: usize = 20;
const MAX_LENGTH: usize = 70;
const MIN_WORDS: usize = 3;
const MIN_UNIQUE_RATIO: f64 = 0.7;
const MAX_CHAR_RUN: usize = 5;

static EXCLAMATION_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!{2,}").expect("valid regex"));
static SHOUTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}{10,}").expect("valid regex"));

/// Score the listing title (0-100)
pub fn score_title(input: &ListingInput) -> CategoryScore {
    let title = input.title.trim();
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if title.is_empty() {
        issues.push(Issue::new(
            Rule::TitleMissing,
            Severity::Error,
            Impact::Critical,
            "Listing has no title",
        ));
        recommendations.push(Recommendation::new(
            Category::Title,
            Impact::Critical,
            Effort::Low,
            "Add a descriptive title of 20-70 characters",
        ));
        return ScoreCalculator::category_score(Category::Title, 0, issues, recommendations);
    }

    let mut score = 0;

    let length = char_len(title);
    if (MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        score += 35;
    } else if length < MIN_LENGTH {
        score += 10;
        issues.push(
            Issue::new(
                Rule::TitleShort,
                Severity::Warning,
                Impact::High,
                format!("Title is too short ({} characters)", length),
            )
            .with_current(length)
            .with_recommended("20-70"),
        );
        recommendations.push(Recommendation::new(
            Category::Title,
            Impact::High,
            Effort::Low,
            "Lengthen the title with brand, product type and a key attribute",
        ));
    } else {
        score += 20;
        issues.push(
            Issue::new(
                Rule::TitleLong,
                Severity::Warning,
                Impact::Medium,
                format!("Title is too long ({} characters) and may be truncated", length),
            )
            .with_current(length)
            .with_recommended(MAX_LENGTH),
        );
    }

    let words = word_count(title);
    if words >= MIN_WORDS {
        score += 25;
    } else {
        score += 10;
        recommendations.push(Recommendation::new(
            Category::Title,
            Impact::High,
            Effort::Low,
            format!("Use at least {} descriptive words in the title", MIN_WORDS),
        ));
    }

    if title.chars().next().is_some_and(char::is_uppercase) {
        score += 10;
    }

    if is_spammy(title) {
        issues.push(Issue::new(
            Rule::TitleSpam,
            Severity::Warning,
            Impact::Medium,
            "Title looks like spam (repeated punctuation, shouting or repeated characters)",
        ));
    } else {
        score += 15;
    }

    if unique_word_ratio(title) >= MIN_UNIQUE_RATIO {
        score += 15;
    } else {
        issues.push(Issue::new(
            Rule::TitleRepetitive,
            Severity::Info,
            Impact::Low,
            "Title repeats the same words",
        ));
    }

    ScoreCalculator::category_score(Category::Title, score, issues, recommendations)
}

/// `!!`, ten or more uppercase letters in a row, or any character repeated
/// five or more times in a row
fn is_spammy(title: &str) -> bool {
    EXCLAMATION_RUN.is_match(title) || SHOUTING.is_match(title) || has_char_run(title, MAX_CHAR_RUN)
}

// The regex crate has no backreferences, so repeated-character runs are scanned by hand.
fn has_char_run(text: &str, min_run: usize) -> bool {
    let mut prev = None;
    let mut run = 0;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= min_run {
            return true;
        }
    }
    false
}

/// Distinct lower-cased words divided by total words
fn unique_word_ratio(title: &str) -> f64 {
    let words: Vec<String> = title.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&String> = words.iter().collect();
    distinct.len() as f64 / words.len() as f64
}
