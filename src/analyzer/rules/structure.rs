//! Structural completeness - SKU, price, category, URL slug, tags

use super::present;
use super::meta::tag_count;
use crate::analyzer::scoring::ScoreCalculator;
use crate::{
    Category, CategoryScore, Effort, Impact, Issue, ListingInput, Recommendation, Rule, Severity,
};

/// Score structural completeness (0-100)
pub fn score_structure(input: &ListingInput) -> CategoryScore {
    let mut score = 0;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if present(input.sku.as_deref()).is_some() {
        score += 25;
    } else {
        recommendations.push(Recommendation::new(
            Category::Structure,
            Impact::Medium,
            Effort::Low,
            "Add a SKU so the listing can be tracked across channels",
        ));
    }

    match input.price {
        Some(price) if price.is_finite() && price > 0.0 => score += 25,
        _ => issues.push(Issue::new(
            Rule::NoPrice,
            Severity::Error,
            Impact::Critical,
            "Listing has no valid price",
        )),
    }

    if input.has_real_category() {
        score += 25;
    }

    if present(input.url_slug.as_deref()).is_some() {
        score += 15;
    } else {
        recommendations.push(Recommendation::new(
            Category::Structure,
            Impact::Medium,
            Effort::Low,
            "Set a readable URL slug",
        ));
    }

    if tag_count(input) > 0 {
        score += 10;
    }

    ScoreCalculator::category_score(Category::Structure, score, issues, recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ListingInput {
        ListingInput {
            sku: Some("HP-100".to_string()),
            price: Some(79.99),
            category: Some("Audio".to_string()),
            url_slug: Some("wireless-headphones".to_string()),
            tags: vec!["audio".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_structure() {
        let score = score_structure(&complete());
        assert_eq!(score.score, 100);
        assert_eq!(score.weighted_score, 15);
        assert!(score.issues.is_empty());
        assert!(score.recommendations.is_empty());
    }

    #[test]
    fn test_empty_structure() {
        let score = score_structure(&ListingInput::default());
        assert_eq!(score.score, 0);
        assert_eq!(score.issues.len(), 1);
        assert_eq!(score.issues[0].rule, Rule::NoPrice);
        assert_eq!(score.issues[0].impact, Impact::Critical);
        assert_eq!(score.recommendations.len(), 2);
    }

    #[test]
    fn test_zero_and_negative_price_flagged() {
        for price in [0.0, -5.0, f64::NAN] {
            let mut input = complete();
            input.price = Some(price);
            let score = score_structure(&input);
            assert_eq!(score.score, 75, "price {}", price);
            assert_eq!(score.issues[0].rule, Rule::NoPrice);
        }
    }

    #[test]
    fn test_uncategorized_sentinel_gets_no_credit() {
        let mut input = complete();
        input.category = Some("UNCATEGORIZED".to_string());
        assert_eq!(score_structure(&input).score, 75);
    }

    #[test]
    fn test_blank_sku_is_missing() {
        let mut input = complete();
        input.sku = Some("  ".to_string());
        let score = score_structure(&input);
        assert_eq!(score.score, 75);
        assert_eq!(score.recommendations.len(), 1);
    }
}
