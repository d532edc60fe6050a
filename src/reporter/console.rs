//! Console reporter with colored output

use super::ScoredListing;
use crate::analyzer::scoring::{weight_pct, ScoreCalculator};
use crate::history::format_delta;
use crate::{BatchStats, Grade, Impact, Issue, ScoreResult, Severity, Status};
use colored::Colorize;

/// Recommendations shown per listing unless verbose
const MAX_RECOMMENDATIONS: usize = 5;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single scored listing
    pub fn report(&self, listing: &ScoredListing) {
        self.print_header(listing);
        self.print_score(listing);
        self.print_breakdown(listing);

        if !listing.result.issues.is_empty() {
            self.print_issues(listing);
        }

        self.print_recommendations(listing);
        println!();
    }

    /// Report multiple listings followed by a batch summary
    pub fn report_many(&self, listings: &[ScoredListing], stats: &BatchStats) {
        for listing in listings {
            self.report(listing);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (one line per listing)
    pub fn report_quiet(&self, listing: &ScoredListing) {
        println!("{}", self.quiet_line(listing));
    }

    /// `<id>: <score> (<grade>)` plus the trend delta when known
    pub fn quiet_line(&self, listing: &ScoredListing) -> String {
        format!(
            "{}: {} ({}){}",
            listing.id,
            listing.result.overall_score,
            self.colorize_grade(listing.result.grade),
            format_delta(listing.previous_score, listing.result.overall_score)
        )
    }

    fn print_header(&self, listing: &ScoredListing) {
        println!();
        println!(
            "{}",
            format!("📋 Listing Quality: {}", listing.id).bold()
        );
        println!("   Source: {}", listing.source.display());
        println!();
    }

    fn print_score(&self, listing: &ScoredListing) {
        let result = &listing.result;
        let score_bar = self.create_score_bar(result.overall_score);
        let delta = format_delta(listing.previous_score, result.overall_score);

        println!(
            "   Score: {} {} {}{}",
            score_bar,
            self.colorize_grade(result.grade).bold(),
            self.colorize_status(result.status),
            delta.dimmed()
        );
        println!("   {}", self.describe(result).dimmed());
        println!();
    }

    /// Grade description followed by what the status means
    fn describe(&self, result: &ScoreResult) -> String {
        format!(
            "{}. {}",
            ScoreCalculator::grade_description(result.grade),
            ScoreCalculator::status_description(result.status)
        )
    }

    fn print_breakdown(&self, listing: &ScoredListing) {
        println!("   {}", "Score Breakdown:".bold());

        for (category, score) in listing.result.categories.iter() {
            let bar = self.create_mini_bar(score.score);
            let score_str = format!("{:>3}/100", score.score);
            let colored_score = if score.score >= 80 {
                score_str.green()
            } else if score.score >= 50 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            println!(
                "   {} {} {:<13} (weight {}%, contributes {})",
                bar,
                colored_score,
                category.label(),
                weight_pct(category),
                score.weighted_score
            );
        }
        println!();
    }

    fn print_issues(&self, listing: &ScoredListing) {
        println!("   {}", "Issues Found:".bold());

        let issues = &listing.result.issues;
        let infos = issues.iter().filter(|i| i.severity == Severity::Info).count();

        for issue in issues.iter().filter(|i| i.severity != Severity::Info) {
            self.print_issue(issue);
        }

        // Info issues only in verbose mode or when the list is short
        if self.verbose || issues.len() <= 5 {
            for issue in issues.iter().filter(|i| i.severity == Severity::Info) {
                self.print_issue(issue);
            }
        } else if infos > 0 {
            println!(
                "   {} {} additional notes (use --verbose to show)",
                "ℹ".blue(),
                infos
            );
        }

        println!();
    }

    fn print_issue(&self, issue: &Issue) {
        let icon = match issue.severity {
            Severity::Error => "✗".red(),
            Severity::Warning => "⚠".yellow(),
            Severity::Info => "ℹ".blue(),
        };

        println!(
            "   {} {} [{}] {}",
            icon,
            self.colorize_impact(issue.impact),
            issue.rule.to_string().dimmed(),
            issue.message
        );

        match (&issue.current_value, &issue.recommended_value) {
            (Some(current), Some(recommended)) => println!(
                "       {} {}",
                "→".dimmed(),
                format!("current {}, recommended {}", current, recommended).italic()
            ),
            (Some(current), None) => {
                println!("       {} {}", "→".dimmed(), format!("current {}", current).italic())
            }
            (None, Some(recommended)) => println!(
                "       {} {}",
                "→".dimmed(),
                format!("recommended {}", recommended).italic()
            ),
            (None, None) => {}
        }

        if self.verbose {
            println!(
                "       {} {}",
                "↳".dimmed(),
                format!("affects category: {}", issue.category.label()).dimmed()
            );
        }
    }

    fn print_recommendations(&self, listing: &ScoredListing) {
        let recs = &listing.result.recommendations;
        if recs.is_empty() {
            return;
        }

        println!("   {}", "Recommendations:".bold());
        let shown = if self.verbose {
            recs.len()
        } else {
            recs.len().min(MAX_RECOMMENDATIONS)
        };
        for rec in &recs[..shown] {
            println!(
                "   {} {} {}",
                "→".cyan(),
                rec.message,
                format!("({} impact, {} effort)", rec.impact, rec.effort).dimmed()
            );
        }
        if shown < recs.len() {
            println!(
                "   {}",
                format!("... {} more (use --verbose to show)", recs.len() - shown).dimmed()
            );
        }
    }

    fn print_summary(&self, stats: &BatchStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Listings scored: {}",
            stats.listings_scored.to_string().bold()
        );
        println!(
            "   Average score:   {} ({})",
            stats.avg_score.to_string().bold(),
            self.colorize_grade(Grade::from_score(stats.avg_score))
        );
        println!("   Total issues:    {}", stats.total_issues);
        println!("   Grades:          {}", self.grade_histogram(stats));

        if !stats.top_issues.is_empty() {
            println!();
            println!("   {}", "Most Common Issues:".bold());
            for freq in &stats.top_issues {
                println!("   {:>4}x {}", freq.count, freq.rule.to_string().dimmed());
            }
        }
        println!();
    }

    /// `A:1 B:0 C:0 D:0 F:2`
    pub fn grade_histogram(&self, stats: &BatchStats) -> String {
        Grade::ALL
            .iter()
            .map(|&grade| format!("{}:{}", self.colorize_grade(grade), stats.by_grade.get(grade)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn colorize_grade(&self, grade: Grade) -> colored::ColoredString {
        let s = grade.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match grade {
            Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn colorize_status(&self, status: Status) -> colored::ColoredString {
        let s = status.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match status {
            Status::Optimized => s.green(),
            Status::NeedsWork => s.yellow(),
            Status::Critical => s.red(),
        }
    }

    fn colorize_impact(&self, impact: Impact) -> colored::ColoredString {
        let s = impact.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match impact {
            Impact::Critical => s.red().bold(),
            Impact::High => s.red(),
            Impact::Medium => s.yellow(),
            Impact::Low => s.dimmed(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 50 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8) -> String {
        let filled = (score as usize * 10) / 100;
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
