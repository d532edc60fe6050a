//! SEO metadata scoring - meta title, meta description, tags and category

use super::{char_len, present};
use crate::analyzer::scoring::ScoreCalculator;
use crate::{
    Category, CategoryScore, Effort, Impact, Issue, ListingInput, Recommendation, Rule, Severity,
};

const SEO_TITLE_MIN: usize = 10;
const SEO_TITLE_MAX: usize = 60;
const SEO_DESC_MIN: usize = 50;
const SEO_DESC_MAX: usize = 160;

/// Number of tags that carry text
pub(crate) fn tag_count(input: &ListingInput) -> usize {
    input.tags.iter().filter(|t| !t.trim().is_empty()).count()
}

/// Score SEO metadata (0-100)
pub fn score_meta(input: &ListingInput) -> CategoryScore {
    let mut score = 0;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    let seo_title_len = present(input.seo_title.as_deref()).map(char_len).unwrap_or(0);
    if seo_title_len >= SEO_TITLE_MIN {
        score += 20;
        if seo_title_len <= SEO_TITLE_MAX {
            score += 15;
        } else {
            issues.push(
                Issue::new(
                    Rule::MetaTitleLong,
                    Severity::Warning,
                    Impact::Medium,
                    format!(
                        "Meta title is {} characters and will be cut off in search results",
                        seo_title_len
                    ),
                )
                .with_current(seo_title_len)
                .with_recommended(SEO_TITLE_MAX),
            );
        }
    } else {
        issues.push(Issue::new(
            Rule::MetaTitleMissing,
            Severity::Warning,
            Impact::High,
            "Meta title is missing or too short",
        ));
        recommendations.push(Recommendation::new(
            Category::Meta,
            Impact::High,
            Effort::Low,
            "Write a meta title of 10-60 characters with the main keyword",
        ));
    }

    let seo_desc_len = present(input.seo_description.as_deref())
        .map(char_len)
        .unwrap_or(0);
    if seo_desc_len >= SEO_DESC_MIN {
        score += 20;
        if seo_desc_len <= SEO_DESC_MAX {
            score += 15;
        } else {
            issues.push(
                Issue::new(
                    Rule::MetaDescLong,
                    Severity::Info,
                    Impact::Low,
                    format!("Meta description is {} characters long", seo_desc_len),
                )
                .with_current(seo_desc_len)
                .with_recommended(SEO_DESC_MAX),
            );
        }
    } else {
        issues.push(Issue::new(
            Rule::MetaDescMissing,
            Severity::Warning,
            Impact::High,
            "Meta description is missing or too short",
        ));
        recommendations.push(Recommendation::new(
            Category::Meta,
            Impact::High,
            Effort::Low,
            "Write a meta description of 50-160 characters that invites the click",
        ));
    }

    let tags = tag_count(input);
    if tags >= 5 {
        score += 15;
    } else if tags >= 2 {
        score += 8;
    } else {
        recommendations.push(Recommendation::new(
            Category::Meta,
            Impact::Medium,
            Effort::Low,
            "Add 3-5 relevant tags",
        ));
    }

    if input.has_real_category() {
        score += 15;
    } else {
        recommendations.push(Recommendation::new(
            Category::Meta,
            Impact::Medium,
            Effort::Low,
            "Assign the listing to a category",
        ));
    }

    ScoreCalculator::category_score(Category::Meta, score, issues, recommendations)
}
