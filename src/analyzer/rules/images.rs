//! Image scoring - gallery size, alt text coverage and URL validity

use crate::analyzer::scoring::{round_ratio, ScoreCalculator};
use crate::{
    Category, CategoryScore, Effort, Impact, Issue, ListingImage, ListingInput, Recommendation,
    Rule, Severity,
};
use url::Url;

const MIN_IMAGES: usize = 3;
const IDEAL_IMAGES: usize = 5;
const ALT_POINTS: u32 = 35;
const URL_POINTS: u32 = 25;

/// True when the image URL parses as an absolute URL
pub fn is_valid_url(image: &ListingImage) -> bool {
    Url::parse(image.url.trim()).is_ok()
}

/// Score the image gallery (0-100)
pub fn score_images(input: &ListingInput) -> CategoryScore {
    let images = &input.images;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if images.is_empty() {
        issues.push(Issue::new(
            Rule::NoImages,
            Severity::Error,
            Impact::Critical,
            "Listing has no images",
        ));
        recommendations.push(Recommendation::new(
            Category::Images,
            Impact::Critical,
            Effort::Medium,
            format!("Add at least {} images", MIN_IMAGES),
        ));
        return ScoreCalculator::category_score(Category::Images, 0, issues, recommendations);
    }

    let total = images.len();
    let mut score = 0;

    if total >= IDEAL_IMAGES {
        score += 40;
    } else if total >= MIN_IMAGES {
        score += 30;
    } else {
        score += 15;
        recommendations.push(Recommendation::new(
            Category::Images,
            Impact::High,
            Effort::Medium,
            format!("Add more images ({}/{})", total, MIN_IMAGES),
        ));
    }

    let with_alt = images.iter().filter(|i| i.has_alt()).count();
    score += round_ratio(with_alt, total, ALT_POINTS);
    if with_alt < total {
        issues.push(
            Issue::new(
                Rule::MissingAlt,
                Severity::Warning,
                Impact::High,
                format!("{} of {} images have no alt text", total - with_alt, total),
            )
            .with_current(with_alt)
            .with_recommended(total),
        );
        recommendations.push(Recommendation::new(
            Category::Images,
            Impact::High,
            Effort::Low,
            "Describe every image with alt text",
        ));
    }

    let valid_urls = images.iter().filter(|i| is_valid_url(i)).count();
    score += round_ratio(valid_urls, total, URL_POINTS);

    ScoreCalculator::category_score(Category::Images, score, issues, recommendations)
}
