//! listaudit: Listing Quality Analyzer
//!
//! This library scores a product listing's textual and structural metadata and
//! produces a deterministic quality score, a letter grade and a prioritized list
//! of issues and recommendations.
//!
//! Scoring itself is pure: [`score_listing`] and [`score_batch`] never touch the
//! filesystem, the network or any shared state. Loading listings, caching
//! results and tracking history live in the surrounding modules.

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod history;
pub mod loader;
pub mod reporter;
pub mod watcher;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use analyzer::engine::{BatchReport, BatchStats, GradeDistribution, IssueFrequency};

/// Category label treated as "no category". Compared case-insensitively.
///
/// If the upstream catalog changes its placeholder label, the category checks
/// in the meta and structure scorers stop recognizing it.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A product listing as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingInput {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// May contain HTML markup; tags are stripped before scoring
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(alias = "seo_title", skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(alias = "seo_description", skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<ListingImage>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(alias = "url_slug", skip_serializing_if = "Option::is_none")]
    pub url_slug: Option<String>,
}

impl ListingInput {
    /// True when a category is set and is not the placeholder label
    pub fn has_real_category(&self) -> bool {
        match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => !c.eq_ignore_ascii_case(UNCATEGORIZED),
            _ => false,
        }
    }
}

/// One image attached to a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingImage {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ListingImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}

/// The five independently scored facets of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Title,
    Description,
    Meta,
    Images,
    Structure,
}

impl Category {
    /// All categories in encounter order
    pub const ALL: [Category; 5] = [
        Category::Title,
        Category::Description,
        Category::Meta,
        Category::Images,
        Category::Structure,
    ];

    /// Human-readable name for reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::Title => "Title",
            Category::Description => "Description",
            Category::Meta => "SEO Metadata",
            Category::Images => "Images",
            Category::Structure => "Structure",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Title => write!(f, "title"),
            Category::Description => write!(f, "description"),
            Category::Meta => write!(f, "meta"),
            Category::Images => write!(f, "images"),
            Category::Structure => write!(f, "structure"),
        }
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            40..=59 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Coarse triage bucket derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Optimized,
    NeedsWork,
    Critical,
}

impl Status {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Status::Optimized,
            50..=79 => Status::NeedsWork,
            _ => Status::Critical,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Optimized => write!(f, "optimized"),
            Status::NeedsWork => write!(f, "needs_work"),
            Status::Critical => write!(f, "critical"),
        }
    }
}

/// Severity levels for issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Business importance of an issue or recommendation.
///
/// Variants are declared in rank order, so the derived `Ord` sorts
/// critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Critical,
    High,
    Medium,
    Low,
}

impl Impact {
    /// Sort rank: critical=0, high=1, medium=2, low=3
    pub fn rank(&self) -> u8 {
        match self {
            Impact::Critical => 0,
            Impact::High => 1,
            Impact::Medium => 2,
            Impact::Low => 3,
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Critical => write!(f, "critical"),
            Impact::High => write!(f, "high"),
            Impact::Medium => write!(f, "medium"),
            Impact::Low => write!(f, "low"),
        }
    }
}

/// Estimated work needed to act on a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Effort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effort::Low => write!(f, "low"),
            Effort::Medium => write!(f, "medium"),
            Effort::High => write!(f, "high"),
        }
    }
}

/// Scoring rules that can raise an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    TitleMissing,
    TitleShort,
    TitleLong,
    TitleSpam,
    TitleRepetitive,
    DescMissing,
    DescShort,
    DescVeryShort,
    DescSameAsTitle,
    MetaTitleMissing,
    MetaTitleLong,
    MetaDescMissing,
    MetaDescLong,
    NoImages,
    MissingAlt,
    NoPrice,
}

impl Rule {
    /// Category whose scorer raises this rule
    pub fn category(&self) -> Category {
        use Rule::*;
        match self {
            TitleMissing | TitleShort | TitleLong | TitleSpam | TitleRepetitive => {
                Category::Title
            }
            DescMissing | DescShort | DescVeryShort | DescSameAsTitle => Category::Description,
            MetaTitleMissing | MetaTitleLong | MetaDescMissing | MetaDescLong => Category::Meta,
            NoImages | MissingAlt => Category::Images,
            NoPrice => Category::Structure,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::TitleMissing => write!(f, "title_missing"),
            Rule::TitleShort => write!(f, "title_short"),
            Rule::TitleLong => write!(f, "title_long"),
            Rule::TitleSpam => write!(f, "title_spam"),
            Rule::TitleRepetitive => write!(f, "title_repetitive"),
            Rule::DescMissing => write!(f, "desc_missing"),
            Rule::DescShort => write!(f, "desc_short"),
            Rule::DescVeryShort => write!(f, "desc_very_short"),
            Rule::DescSameAsTitle => write!(f, "desc_same_as_title"),
            Rule::MetaTitleMissing => write!(f, "meta_title_missing"),
            Rule::MetaTitleLong => write!(f, "meta_title_long"),
            Rule::MetaDescMissing => write!(f, "meta_desc_missing"),
            Rule::MetaDescLong => write!(f, "meta_desc_long"),
            Rule::NoImages => write!(f, "no_images"),
            Rule::MissingAlt => write!(f, "missing_alt"),
            Rule::NoPrice => write!(f, "no_price"),
        }
    }
}

/// A measured or expected value attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueValue {
    Number(u64),
    Text(String),
}

impl From<usize> for IssueValue {
    fn from(n: usize) -> Self {
        IssueValue::Number(n as u64)
    }
}

impl From<&str> for IssueValue {
    fn from(s: &str) -> Self {
        IssueValue::Text(s.to_string())
    }
}

impl std::fmt::Display for IssueValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueValue::Number(n) => write!(f, "{}", n),
            IssueValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A concrete defect tied to one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub category: Category,
    /// Rule that found this issue
    pub rule: Rule,
    /// Human-readable message
    pub message: String,
    pub severity: Severity,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<IssueValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_value: Option<IssueValue>,
}

impl Issue {
    pub fn new(rule: Rule, severity: Severity, impact: Impact, message: impl Into<String>) -> Self {
        Self {
            category: rule.category(),
            rule,
            message: message.into(),
            severity,
            impact,
            current_value: None,
            recommended_value: None,
        }
    }

    pub fn with_current(mut self, value: impl Into<IssueValue>) -> Self {
        self.current_value = Some(value.into());
        self
    }

    pub fn with_recommended(mut self, value: impl Into<IssueValue>) -> Self {
        self.recommended_value = Some(value.into());
        self
    }
}

/// An actionable improvement, not necessarily tied to a defect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: Category,
    pub message: String,
    pub impact: Impact,
    pub effort: Effort,
}

impl Recommendation {
    pub fn new(category: Category, impact: Impact, effort: Effort, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            impact,
            effort,
        }
    }
}

/// Score for a single category together with its findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    /// Raw score (0-100)
    pub score: u8,
    /// Fixed weight fraction for this category
    pub weight: f64,
    /// round(score x weight)
    pub weighted_score: u8,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
}

/// Category scores keyed by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub title: CategoryScore,
    pub description: CategoryScore,
    pub meta: CategoryScore,
    pub images: CategoryScore,
    pub structure: CategoryScore,
}

impl CategoryBreakdown {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Title => &self.title,
            Category::Description => &self.description,
            Category::Meta => &self.meta,
            Category::Images => &self.images,
            Category::Structure => &self.structure,
        }
    }

    /// Categories with their scores, in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryScore)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// The result of scoring one listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Overall quality score (0-100)
    pub overall_score: u8,
    pub grade: Grade,
    pub status: Status,
    pub categories: CategoryBreakdown,
    /// All issues, sorted by impact
    pub issues: Vec<Issue>,
    /// All recommendations, sorted by impact
    pub recommendations: Vec<Recommendation>,
    /// Informational only; excluded from equality
    pub scored_at: DateTime<Utc>,
}

impl PartialEq for ScoreResult {
    fn eq(&self, other: &Self) -> bool {
        self.overall_score == other.overall_score
            && self.grade == other.grade
            && self.status == other.status
            && self.categories == other.categories
            && self.issues == other.issues
            && self.recommendations == other.recommendations
    }
}

impl ScoreResult {
    pub fn has_issue(&self, rule: Rule) -> bool {
        self.issues.iter().any(|i| i.rule == rule)
    }
}

/// Public API: score a single listing. Pure and total.
pub fn score_listing(input: &ListingInput) -> ScoreResult {
    analyzer::ScoringEngine::new().score(input)
}

/// Public API: score a collection of listings and compute batch statistics.
pub fn score_batch(inputs: &[ListingInput]) -> BatchReport {
    analyzer::ScoringEngine::new().score_batch(inputs)
}
