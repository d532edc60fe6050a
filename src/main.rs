//! listaudit: Listing Quality Analyzer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use globset::GlobSet;
use listaudit::analyzer::ScoringEngine;
use listaudit::cache::{cache_key, ResultCache, ScoreCache};
use listaudit::config::{
    build_ignore_set, default_config_json, find_project_root, is_ignored, load_config, Config,
    CONFIG_FILENAME,
};
use listaudit::history::{append_run, listing_key, load_history, previous_score, save_history};
use listaudit::loader::{collect_listing_files, load_file, LoadedListing};
use listaudit::reporter::{ConsoleReporter, JsonReporter, ScoredListing};
use listaudit::watcher::ListingWatcher;
use listaudit::{BatchStats, ScoreResult};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// listaudit: Product Listing Quality Analyzer
#[derive(Parser, Debug)]
#[command(name = "listaudit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Listing file or directory to score (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (one line per listing)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (all notes and recommendations, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .listauditrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch for listing file changes and re-score
    #[arg(long)]
    watch: bool,

    /// Disable the result cache
    #[arg(long)]
    no_cache: bool,

    /// Clear the result cache before running
    #[arg(long)]
    clear_cache: bool,

    /// Score in parallel regardless of batch size
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .listauditrc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LISTAUDIT_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.quiet, args.verbose)?;

    if let Some(Commands::Init { threshold, dir }) = &args.command {
        return run_init(*threshold, dir.as_deref());
    }

    let path = args
        .path
        .clone()
        .context("A listing file or directory is required")?;

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    if args.watch {
        return run_watch(&args, &path);
    }

    let work_dir = work_dir_for(&path);
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.no_cache);
    let ignore_set = ignore_set_for(&config)?;

    let files = collect_listing_files(&path, ignore_set.as_ref())?;
    if files.is_empty() {
        eprintln!("{}: No listing files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let (listings, had_errors) = load_listings(&files, args.quiet);
    if listings.is_empty() {
        eprintln!("{}: No listings could be loaded", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let project_root = find_project_root(work_dir).unwrap_or_else(|| work_dir.to_path_buf());
    let mut cache = open_cache(&config, &project_root);
    if args.clear_cache {
        cache.clear();
        if !args.quiet {
            eprintln!("{}: Cache cleared", "Info".blue());
        }
    }
    cache.purge_expired();

    let engine = if args.parallel {
        ScoringEngine::new().parallel()
    } else {
        ScoringEngine::new()
    };
    let results = score_listings(&engine, &listings, &mut cache, args.quiet);

    if let Err(e) = cache.save() {
        if !args.quiet {
            eprintln!("{}: Failed to save cache: {:#}", "Warning".yellow(), e);
        }
    }

    let stats = ScoringEngine::aggregate_stats(&results);

    // Trend history: read previous scores, then record this run
    let mut history = load_history(&project_root);
    let keyed: Vec<(String, ScoreResult)> = listings
        .iter()
        .zip(&results)
        .map(|(listing, result)| (listing_key(&listing.source, &listing.id), result.clone()))
        .collect();
    let scored: Vec<ScoredListing> = listings
        .iter()
        .zip(&keyed)
        .map(|(listing, (key, result))| {
            ScoredListing::new(listing.id.clone(), listing.source.clone(), result.clone())
                .with_previous(previous_score(&history, key))
        })
        .collect();
    append_run(&mut history, &keyed);
    if let Err(e) = save_history(&project_root, &history) {
        debug!(error = %e, "history not saved");
    }

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if scored.len() == 1 {
            println!("{}", reporter.report(&scored[0]));
        } else {
            println!("{}", reporter.report_with_summary(&scored, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for listing in &scored {
            reporter.report_quiet(listing);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if scored.len() == 1 {
            reporter.report(&scored[0]);
        } else {
            reporter.report_many(&scored, &stats);
        }
    }

    // CLI threshold wins over per-path overrides
    let threshold = if files.len() == 1 {
        args.threshold
            .or_else(|| config.effective_for_file(&files[0]).threshold)
    } else {
        config.threshold
    };
    if let Some(threshold) = threshold {
        let score = gate_score(&results, &stats);
        if score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70);
    let json = default_config_json(threshold_value)?;
    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let work_dir = work_dir_for(path);
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.no_cache);
    let ignore_set = ignore_set_for(&config)?;
    let project_root = find_project_root(work_dir).unwrap_or_else(|| work_dir.to_path_buf());
    let mut cache = open_cache(&config, &project_root);
    let engine = ScoringEngine::new();

    let mut reporter = ConsoleReporter::new();
    if args.verbose {
        reporter = reporter.verbose();
    }

    let watcher = ListingWatcher::watch(path).context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let changed: Vec<PathBuf> = watcher
            .next_changes()
            .into_iter()
            .filter(|p| {
                ignore_set
                    .as_ref()
                    .map(|set| !is_ignored(p, set))
                    .unwrap_or(true)
            })
            .collect();

        for file in changed {
            match load_file(&file) {
                Ok(listings) => {
                    for listing in listings {
                        let result = engine.score_cached(&listing.input, &mut cache);
                        let scored = ScoredListing::new(listing.id, listing.source, result);
                        if args.quiet {
                            reporter.report_quiet(&scored);
                        } else {
                            reporter.report(&scored);
                        }
                    }
                }
                Err(e) => eprintln!("{}: {}", "Error".red(), e),
            }
        }

        if let Err(e) = cache.save() {
            eprintln!("{}: Failed to save cache: {:#}", "Warning".yellow(), e);
        }
    }
}

fn work_dir_for(path: &Path) -> &Path {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    } else {
        path
    }
}

fn ignore_set_for(config: &Config) -> Result<Option<GlobSet>> {
    if config.ignore.is_empty() {
        Ok(None)
    } else {
        build_ignore_set(&config.ignore).map(Some)
    }
}

fn open_cache(config: &Config, project_root: &Path) -> ScoreCache {
    if config.cache_enabled() {
        ScoreCache::new(project_root, config.cache_ttl())
    } else {
        ScoreCache::disabled()
    }
}

/// Load all files, reporting the ones that fail
fn load_listings(files: &[PathBuf], quiet: bool) -> (Vec<LoadedListing>, bool) {
    let mut listings = Vec::new();
    let mut had_errors = false;

    for file in files {
        match load_file(file) {
            Ok(mut loaded) => listings.append(&mut loaded),
            Err(e) => {
                if !quiet {
                    eprintln!("{}: {}", "Error".red(), e);
                }
                had_errors = true;
            }
        }
    }

    (listings, had_errors)
}

/// Score listings, serving unchanged ones from the cache. Results keep input order.
fn score_listings(
    engine: &ScoringEngine,
    listings: &[LoadedListing],
    cache: &mut ScoreCache,
    quiet: bool,
) -> Vec<ScoreResult> {
    let keys: Vec<String> = listings.iter().map(|l| cache_key(&l.input)).collect();
    let mut results: Vec<Option<ScoreResult>> = keys.iter().map(|k| cache.get(k)).collect();

    let misses: Vec<usize> = (0..results.len()).filter(|&i| results[i].is_none()).collect();
    let inputs: Vec<_> = misses.iter().map(|&i| listings[i].input.clone()).collect();
    let fresh = engine.score_batch(&inputs).results;

    for (i, result) in misses.iter().zip(fresh) {
        cache.put(&keys[*i], result.clone());
        results[*i] = Some(result);
    }

    let hits = listings.len() - misses.len();
    if !quiet && hits > 0 {
        eprintln!(
            "{}: {} listings from cache, {} scored",
            "Cache".blue(),
            hits,
            misses.len()
        );
    }

    results.into_iter().flatten().collect()
}

/// Score compared against the threshold: the listing's own score for a
/// single listing, otherwise the batch average
fn gate_score(results: &[ScoreResult], stats: &BatchStats) -> u8 {
    match results {
        [only] => only.overall_score,
        _ => stats.avg_score,
    }
}
