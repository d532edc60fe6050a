//! Scoring engine - runs the category scorers and batch statistics

use super::rules::score_categories;
use super::ScoreCalculator;
use crate::cache::{cache_key, ResultCache};
use crate::{Grade, ListingInput, Rule, ScoreResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Batches larger than this are scored in parallel
const PARALLEL_THRESHOLD: usize = 10;

/// Maximum number of entries in `BatchStats::top_issues`
pub const TOP_ISSUES_LIMIT: usize = 10;

/// Main scoring engine
pub struct ScoringEngine {
    /// Force parallel batch scoring regardless of batch size
    parallel: bool,
}

impl ScoringEngine {
    /// Create a new scoring engine
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Always fan batch scoring out over the rayon pool
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// Score one listing
    pub fn score(&self, input: &ListingInput) -> ScoreResult {
        ScoreCalculator::aggregate(score_categories(input))
    }

    /// Score one listing, consulting the cache first
    pub fn score_cached<C: ResultCache + ?Sized>(
        &self,
        input: &ListingInput,
        cache: &mut C,
    ) -> ScoreResult {
        let key = cache_key(input);
        if let Some(hit) = cache.get(&key) {
            return hit;
        }
        let result = self.score(input);
        cache.put(&key, result.clone());
        result
    }

    /// Score a collection; results keep input order
    pub fn score_batch(&self, inputs: &[ListingInput]) -> BatchReport {
        let parallel = self.parallel || inputs.len() > PARALLEL_THRESHOLD;
        debug!(listings = inputs.len(), parallel, "scoring batch");
        let results: Vec<ScoreResult> = if parallel {
            inputs.par_iter().map(|input| self.score(input)).collect()
        } else {
            inputs.iter().map(|input| self.score(input)).collect()
        };
        let stats = Self::aggregate_stats(&results);
        BatchReport { results, stats }
    }

    /// Compute batch statistics over already scored listings
    pub fn aggregate_stats(results: &[ScoreResult]) -> BatchStats {
        if results.is_empty() {
            return BatchStats::default();
        }

        let n = results.len() as u64;
        let total_score: u64 = results.iter().map(|r| r.overall_score as u64).sum();
        // round(mean), half up
        let avg_score = ((2 * total_score + n) / (2 * n)) as u8;

        let mut by_grade = GradeDistribution::default();
        let mut counts: Vec<IssueFrequency> = Vec::new();
        for result in results {
            by_grade.increment(result.grade);
            for issue in &result.issues {
                match counts.iter_mut().find(|c| c.rule == issue.rule) {
                    Some(entry) => entry.count += 1,
                    None => counts.push(IssueFrequency {
                        rule: issue.rule,
                        count: 1,
                    }),
                }
            }
        }

        // Stable: equal counts keep first-seen order
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(TOP_ISSUES_LIMIT);

        BatchStats {
            listings_scored: results.len(),
            avg_score,
            by_grade,
            top_issues: counts,
            total_issues: results.iter().map(|r| r.issues.len()).sum(),
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of a batch run plus statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub results: Vec<ScoreResult>,
    pub stats: BatchStats,
}

/// Aggregate statistics over a batch of scored listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub listings_scored: usize,
    /// round(mean overall score), 0 for an empty batch
    pub avg_score: u8,
    pub by_grade: GradeDistribution,
    /// Most frequent issue rules, most common first
    pub top_issues: Vec<IssueFrequency>,
    pub total_issues: usize,
}

/// How often a rule fired across a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFrequency {
    pub rule: Rule,
    pub count: usize,
}

/// Listing count per grade letter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "D")]
    pub d: usize,
    #[serde(rename = "F")]
    pub f: usize,
}

impl GradeDistribution {
    pub fn get(&self, grade: Grade) -> usize {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
            Grade::F => self.f,
        }
    }

    pub fn increment(&mut self, grade: Grade) {
        match grade {
            Grade::A => self.a += 1,
            Grade::B => self.b += 1,
            Grade::C => self.c += 1,
            Grade::D => self.d += 1,
            Grade::F => self.f += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.a + self.b + self.c + self.d + self.f
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ScoreCache;
    use crate::{Category, ListingImage, Status};

    pub(crate) fn complete_listing() -> ListingInput {
        ListingInput {
            title: "Wireless Bluetooth Headphones Noise Cancelling".to_string(),
            description: "These over-ear headphones deliver 40 hours of playback on a single \
                charge. Active noise cancelling blocks out traffic and office chatter. Soft \
                memory foam cushions keep long sessions comfortable."
                .to_string(),
            seo_title: Some("Wireless Noise Cancelling Headphones with 40h".to_string()),
            seo_description: Some("s".repeat(140)),
            images: (0..5)
                .map(|n| {
                    ListingImage::new(format!("https://cdn.example.com/hp/{}.jpg", n))
                        .with_alt(format!("Headphones view {}", n))
                })
                .collect(),
            tags: ["audio", "wireless", "bluetooth", "headphones", "travel"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            sku: Some("HP-100".to_string()),
            category: Some("Audio".to_string()),
            price: Some(129.0),
            url_slug: Some("wireless-bluetooth-headphones".to_string()),
        }
    }

    #[test]
    fn test_empty_listing_scores_zero() {
        let result = ScoringEngine::new().score(&ListingInput::default());
        assert_eq!(result.overall_score, 0);
        assert_eq!(result.grade, Grade::F);
        assert_eq!(result.status, Status::Critical);
        for rule in [Rule::TitleMissing, Rule::DescMissing, Rule::NoImages, Rule::NoPrice] {
            assert!(result.has_issue(rule), "missing {}", rule);
        }
        // critical issues come first
        assert!(result.issues[..4]
            .iter()
            .all(|i| i.impact == crate::Impact::Critical));
    }

    #[test]
    fn test_complete_listing_scores_100() {
        let result = ScoringEngine::new().score(&complete_listing());
        for (category, score) in result.categories.iter() {
            assert_eq!(score.score, 100, "{} scored {}", category, score.score);
        }
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.status, Status::Optimized);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_overall_is_sum_of_weighted_scores() {
        let mut input = complete_listing();
        input.images.truncate(2);
        input.images[1].alt = None;
        input.seo_description = None;
        let result = ScoringEngine::new().score(&input);
        let sum: u32 = result
            .categories
            .iter()
            .map(|(_, c)| c.weighted_score as u32)
            .sum();
        assert_eq!(result.overall_score as u32, sum);
    }

    #[test]
    fn test_batch_mixed_grades() {
        let inputs = vec![
            complete_listing(),
            ListingInput::default(),
            ListingInput::default(),
        ];
        let report = ScoringEngine::new().score_batch(&inputs);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.stats.avg_score, 33);
        assert_eq!(report.stats.by_grade.get(Grade::A), 1);
        assert_eq!(report.stats.by_grade.get(Grade::F), 2);
        assert_eq!(report.stats.by_grade.get(Grade::B), 0);
        assert_eq!(report.stats.by_grade.get(Grade::C), 0);
        assert_eq!(report.stats.by_grade.get(Grade::D), 0);
        assert_eq!(report.stats.listings_scored, 3);
    }

    #[test]
    fn test_batch_empty() {
        let report = ScoringEngine::new().score_batch(&[]);
        assert!(report.results.is_empty());
        assert_eq!(report.stats.avg_score, 0);
        assert_eq!(report.stats.by_grade.total(), 0);
        assert!(report.stats.top_issues.is_empty());
    }

    #[test]
    fn test_top_issues_sorted_with_first_seen_ties() {
        let mut only_title = complete_listing();
        only_title.title = String::new();
        let inputs = vec![ListingInput::default(), only_title.clone(), only_title];
        let report = ScoringEngine::new().score_batch(&inputs);
        let top = &report.stats.top_issues;
        assert_eq!(top[0].rule, Rule::TitleMissing);
        assert_eq!(top[0].count, 3);
        // remaining rules fired once each, in first-seen order of the first result
        let rest: Vec<Rule> = top[1..].iter().map(|f| f.rule).collect();
        let first_seen: Vec<Rule> = report.results[0]
            .issues
            .iter()
            .map(|i| i.rule)
            .filter(|r| *r != Rule::TitleMissing)
            .collect();
        assert_eq!(rest, first_seen);
        assert!(top.iter().all(|f| f.count >= 1));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let inputs: Vec<ListingInput> = (0..25)
            .map(|n| {
                let mut input = complete_listing();
                input.images.truncate(n % 6);
                if n % 3 == 0 {
                    input.price = None;
                }
                input
            })
            .collect();
        let sequential: Vec<ScoreResult> = inputs
            .iter()
            .map(|i| ScoringEngine::new().score(i))
            .collect();
        let parallel = ScoringEngine::new().parallel().score_batch(&inputs);
        assert_eq!(parallel.results, sequential);
        assert_eq!(parallel.stats, ScoringEngine::aggregate_stats(&sequential));
    }

    #[test]
    fn test_top_issues_truncated_to_limit() {
        let mut results = Vec::new();
        for input in [ListingInput::default(), complete_listing()] {
            results.push(ScoringEngine::new().score(&input));
        }
        // Inject extra distinct rules so more than the limit fire
        let mut noisy = ScoringEngine::new().score(&ListingInput {
            title: "ab".to_string(),
            description: "ab".to_string(),
            seo_title: Some("t".repeat(80)),
            seo_description: Some("d".repeat(200)),
            images: vec![ListingImage::new("x")],
            ..Default::default()
        });
        noisy.issues.extend(results[0].issues.clone());
        results.push(noisy);
        let stats = ScoringEngine::aggregate_stats(&results);
        assert!(stats.top_issues.len() <= TOP_ISSUES_LIMIT);
        let counts: Vec<usize> = stats.top_issues.iter().map(|f| f.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_score_cached_hits_cache() {
        let engine = ScoringEngine::new();
        let mut cache = ScoreCache::in_memory(3600);
        let input = complete_listing();
        let first = engine.score_cached(&input, &mut cache);
        assert_eq!(cache.stats().entries, 1);
        let second = engine.score_cached(&input, &mut cache);
        assert_eq!(first, second);
        assert_eq!(first.scored_at, second.scored_at, "second call served from cache");
    }

    #[test]
    fn test_category_weights_attached() {
        let result = ScoringEngine::new().score(&complete_listing());
        assert_eq!(result.categories.get(Category::Meta).weight, 0.20);
        assert_eq!(result.categories.get(Category::Images).weighted_score, 15);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::analyzer::scoring::{weight_pct, ScoreCalculator};
    use crate::{Category, CategoryBreakdown, ListingImage};
    use proptest::prelude::*;

    fn arbitrary_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop::sample::select(vec![
                "Wireless", "headphones", "!!", "AAAAAAAAAAAA", "<p>", "</p>", "40", " ", "  ",
                ".", "Écran", "zzzzz", "mug", "\n",
            ]),
            0..40,
        )
        .prop_map(|parts| parts.join(" "))
    }

    fn arbitrary_listing() -> impl Strategy<Value = ListingInput> {
        (
            arbitrary_text(),
            arbitrary_text(),
            prop::option::of(arbitrary_text()),
            prop::option::of(arbitrary_text()),
            prop::collection::vec(
                (
                    prop::sample::select(vec!["https://x.io/a.jpg", "nope", ""]),
                    prop::option::of(prop::sample::select(vec!["Front", "", " "])),
                ),
                0..8,
            ),
            prop::collection::vec("[a-z]{0,6}", 0..8),
            prop::option::of(prop::num::f64::ANY),
            prop::option::of(prop::sample::select(vec!["Audio", "uncategorized", ""])),
        )
            .prop_map(
                |(title, description, seo_title, seo_description, images, tags, price, category)| {
                    ListingInput {
                        title,
                        description,
                        seo_title,
                        seo_description,
                        images: images
                            .into_iter()
                            .map(|(url, alt)| ListingImage {
                                url: url.to_string(),
                                alt: alt.map(str::to_string),
                            })
                            .collect(),
                        tags,
                        sku: None,
                        category: category.map(str::to_string),
                        price,
                        url_slug: None,
                    }
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn scoring_is_bounded_and_sorted(input in arbitrary_listing()) {
            let result = ScoringEngine::new().score(&input);
            prop_assert!(result.overall_score <= 100);
            prop_assert_eq!(result.grade, Grade::from_score(result.overall_score));
            for (category, score) in result.categories.iter() {
                prop_assert!(score.score <= 100);
                prop_assert!(score.weighted_score <= weight_pct(category));
            }
            prop_assert!(result.issues.windows(2).all(|w| w[0].impact <= w[1].impact));
            prop_assert!(result.recommendations.windows(2).all(|w| w[0].impact <= w[1].impact));
        }

        #[test]
        fn scoring_is_deterministic(input in arbitrary_listing()) {
            let engine = ScoringEngine::new();
            prop_assert_eq!(engine.score(&input), engine.score(&input));
        }

        #[test]
        fn overall_is_monotonic_in_each_category(
            scores in prop::array::uniform5(0i32..=100),
            which in 0usize..5,
            bump in 0i32..=100,
        ) {
            let build = |s: [i32; 5]| {
                let cat = |c: Category, raw: i32| ScoreCalculator::category_score(c, raw, vec![], vec![]);
                ScoreCalculator::aggregate(CategoryBreakdown {
                    title: cat(Category::Title, s[0]),
                    description: cat(Category::Description, s[1]),
                    meta: cat(Category::Meta, s[2]),
                    images: cat(Category::Images, s[3]),
                    structure: cat(Category::Structure, s[4]),
                })
            };
            let mut raised = scores;
            raised[which] = (raised[which] + bump).min(100);
            prop_assert!(build(raised).overall_score >= build(scores).overall_score);
        }

        #[test]
        fn batch_of_copies_matches_single(input in arbitrary_listing(), n in 1usize..15) {
            let engine = ScoringEngine::new();
            let single = engine.score(&input);
            let copies = vec![input; n];
            let report = engine.score_batch(&copies);
            prop_assert_eq!(report.stats.avg_score, single.overall_score);
            prop_assert_eq!(report.stats.by_grade.total(), n);
            prop_assert_eq!(report.stats.by_grade.get(single.grade), n);
        }
    }
}
