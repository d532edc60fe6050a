//! Score calculation for listing quality

use crate::{
    Category, CategoryBreakdown, CategoryScore, Grade, Issue, Recommendation, ScoreResult, Status,
};

/// Fixed category weights as whole percentages (sum to exactly 100).
///
/// Declared once; every scorer and the aggregator read weights from here.
pub const CATEGORY_WEIGHTS: [(Category, u8); 5] = [
    (Category::Title, 25),
    (Category::Description, 25),
    (Category::Meta, 20),
    (Category::Images, 15),
    (Category::Structure, 15),
];

/// Weight of a category as a whole percentage
pub fn weight_pct(category: Category) -> u8 {
    CATEGORY_WEIGHTS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, pct)| *pct)
        .unwrap_or(0)
}

/// Weight of a category as a fraction (0.25, 0.20, ...)
pub fn weight(category: Category) -> f64 {
    weight_pct(category) as f64 / 100.0
}

/// round(part / whole x points), rounding half up. Zero when `whole` is zero.
pub fn round_ratio(part: usize, whole: usize, points: u32) -> i32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((2 * part * points as u64 + whole) / (2 * whole)) as i32
}

/// Calculator for listing quality scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Clamp a raw accumulated score to 0-100 and attach its weighted contribution
    pub fn category_score(
        category: Category,
        raw: i32,
        issues: Vec<Issue>,
        recommendations: Vec<Recommendation>,
    ) -> CategoryScore {
        let score = raw.clamp(0, 100) as u8;
        CategoryScore {
            score,
            weight: weight(category),
            weighted_score: Self::weighted(score, weight_pct(category)),
            issues,
            recommendations,
        }
    }

    /// round(score x pct / 100), rounding half up
    pub fn weighted(score: u8, pct: u8) -> u8 {
        ((score as u32 * pct as u32 + 50) / 100) as u8
    }

    /// Combine the five category scores into a full result.
    ///
    /// The overall score is the sum of the already-rounded weighted scores,
    /// not a single rounding of the raw weighted sum.
    pub fn aggregate(categories: CategoryBreakdown) -> ScoreResult {
        let total: u32 = categories
            .iter()
            .map(|(_, c)| c.weighted_score as u32)
            .sum();
        let overall_score = total.min(100) as u8;

        let mut issues: Vec<Issue> = categories
            .iter()
            .flat_map(|(_, c)| c.issues.iter().cloned())
            .collect();
        let mut recommendations: Vec<Recommendation> = categories
            .iter()
            .flat_map(|(_, c)| c.recommendations.iter().cloned())
            .collect();

        // Stable sorts: equal-impact items keep category encounter order
        issues.sort_by_key(|i| i.impact.rank());
        recommendations.sort_by_key(|r| r.impact.rank());

        ScoreResult {
            overall_score,
            grade: Grade::from_score(overall_score),
            status: Status::from_score(overall_score),
            categories,
            issues,
            recommendations,
            scored_at: chrono::Utc::now(),
        }
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::A => "Excellent - Listing is complete and well optimized",
            Grade::B => "Good - Listing is solid with a few gaps",
            Grade::C => "Fair - Listing covers the basics but needs enrichment",
            Grade::D => "Poor - Listing has significant content gaps",
            Grade::F => "Failing - Listing is missing essential content",
        }
    }

    /// Get a description of the status bucket
    pub fn status_description(status: Status) -> &'static str {
        match status {
            Status::Optimized => "Ready to publish",
            Status::NeedsWork => "Needs work before it converts well",
            Status::Critical => "Fix critical gaps first",
        }
    }
}
