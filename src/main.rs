//! Sitemark main entry point
//!
//! Command-line boundary for the crawl engine: builds a validated policy
//! from flags or a TOML file, runs the strategy chain, stores the result,
//! and prints the markdown.

use anyhow::{bail, Context};
use clap::Parser;
use sitemark::policy::{load_policy, validate, CrawlPolicy};
use sitemark::storage::{open_store, ResultStore, StoredCrawl};
use sitemark::strategy::{StaticPipeline, StrategyChain};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Sitemark: crawl a site and turn its readable content into markdown
///
/// Fetches the seed URL, optionally follows links breadth-first within the
/// policy's depth and page limits, and aggregates every page's main
/// content into one markdown document.
#[derive(Parser, Debug)]
#[command(name = "sitemark")]
#[command(version)]
#[command(about = "Crawl web pages into clean markdown", long_about = None)]
struct Cli {
    /// Seed URL to crawl
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Load the crawl policy from a TOML file (flags below still override)
    #[arg(long, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Maximum link depth from the seed (1-5)
    #[arg(long, value_name = "N")]
    depth: Option<u32>,

    /// Maximum number of pages to crawl (1-100)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Follow links to subdomains of the seed host
    #[arg(long)]
    include_subdomains: bool,

    /// Follow links to unrelated hosts
    #[arg(long)]
    follow_external_links: bool,

    /// Never follow URLs containing this substring (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude_patterns: Vec<String>,

    /// Only follow URLs containing one of these substrings (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    include_patterns: Vec<String>,

    /// Extra request header, as "Name: value" (repeatable)
    #[arg(long = "header", value_name = "NAME:VALUE")]
    headers: Vec<String>,

    /// Per-fetch timeout in seconds (5-120)
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Treat images as non-content
    #[arg(long)]
    no_images: bool,

    /// Treat tables as non-content
    #[arg(long)]
    no_tables: bool,

    /// Drop markdown lines with fewer than N words (0-1000)
    #[arg(long, value_name = "N")]
    word_threshold: Option<u32>,

    /// Convert the whole page instead of the located main content
    #[arg(long)]
    full_page: bool,

    /// Suppress markdown image syntax in the output
    #[arg(long)]
    remove_images: bool,

    /// Suppress markdown link syntax in the output
    #[arg(long)]
    remove_links: bool,

    /// Advisory selector for rendering strategies; ignored by static fetch
    #[arg(long, value_name = "SELECTOR")]
    wait_for: Option<String>,

    /// Wall-clock budget for the whole crawl, in seconds
    #[arg(long, value_name = "SECONDS")]
    budget_seconds: Option<u64>,

    /// Path to the result database
    #[arg(long, value_name = "FILE", default_value = "sitemark.db")]
    db: PathBuf,

    /// Write the combined markdown to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show the N most recent stored results and exit
    #[arg(
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "5",
        conflicts_with_all = ["url", "show"]
    )]
    recent: Option<u32>,

    /// Print one stored result by id and exit
    #[arg(long, value_name = "ID", conflicts_with = "url")]
    show: Option<i64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Some(limit) = cli.recent {
        handle_recent(&cli.db, limit)
    } else if let Some(id) = cli.show {
        handle_show(&cli.db, id)
    } else {
        handle_crawl(cli).await
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemark=info,warn"),
            1 => EnvFilter::new("sitemark=debug,info"),
            2 => EnvFilter::new("sitemark=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Assembles the crawl policy from the policy file and/or CLI flags
fn build_policy(cli: &Cli) -> anyhow::Result<CrawlPolicy> {
    let mut policy = match &cli.policy {
        Some(path) => load_policy(path)
            .with_context(|| format!("failed to load policy from {}", path.display()))?,
        None => {
            let url = cli
                .url
                .clone()
                .context("a seed URL is required (or use --policy)")?;
            CrawlPolicy::for_url(url)
        }
    };

    if let Some(url) = &cli.url {
        policy.url = url.clone();
    }
    if let Some(depth) = cli.depth {
        policy.max_depth = depth;
    }
    if let Some(pages) = cli.max_pages {
        policy.max_pages = pages;
    }
    if cli.include_subdomains {
        policy.include_subdomains = true;
    }
    if cli.follow_external_links {
        policy.follow_external_links = true;
    }
    if !cli.exclude_patterns.is_empty() {
        policy.exclude_patterns = cli.exclude_patterns.clone();
    }
    if !cli.include_patterns.is_empty() {
        policy.include_patterns = cli.include_patterns.clone();
    }
    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("header '{}' is not in 'Name: value' form", header))?;
        policy
            .custom_headers
            .insert(name.trim().to_string(), value.trim().to_string());
    }
    if let Some(timeout) = cli.timeout {
        policy.timeout_seconds = timeout;
    }
    if cli.no_images {
        policy.extract_images = false;
    }
    if cli.no_tables {
        policy.extract_tables = false;
    }
    if let Some(threshold) = cli.word_threshold {
        policy.word_count_threshold = threshold;
    }
    if cli.full_page {
        policy.only_main_content = false;
    }
    if cli.remove_images {
        policy.remove_images = true;
    }
    if cli.remove_links {
        policy.remove_links = true;
    }
    if let Some(selector) = &cli.wait_for {
        policy.wait_for_selector = Some(selector.clone());
    }

    validate(&policy).context("invalid crawl policy")?;

    Ok(policy)
}

/// Handles the main crawl operation
async fn handle_crawl(cli: Cli) -> anyhow::Result<()> {
    let policy = build_policy(&cli)?;

    tracing::info!(
        url = %policy.url,
        max_depth = policy.max_depth,
        max_pages = policy.max_pages,
        "starting crawl"
    );

    let mut pipeline = StaticPipeline::new();
    if let Some(seconds) = cli.budget_seconds {
        pipeline = pipeline.with_budget(Duration::from_secs(seconds));
    }

    // Ctrl-C finishes the page in flight and returns the partial result
    let cancel = pipeline.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing current page");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let chain = StrategyChain::new(vec![Box::new(pipeline)]);
    let result = chain.run(&policy).await?;

    let mut store = open_store(&cli.db)
        .with_context(|| format!("failed to open result store at {}", cli.db.display()))?;
    let id = store.insert(&policy.url, &result)?;

    tracing::info!(
        id,
        pages = result.pages_crawled,
        characters = result.character_count,
        words = result.word_count,
        "crawl result stored"
    );

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &result.markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{} page(s), {} words -> {} (stored as #{})",
                result.pages_crawled,
                result.word_count,
                path.display(),
                id
            );
        }
        None => {
            println!("{}", result.markdown);
        }
    }

    Ok(())
}

/// Handles --recent: lists the most recent stored results
fn handle_recent(db: &Path, limit: u32) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let results = store.recent(limit)?;

    if results.is_empty() {
        println!("No stored crawl results.");
        return Ok(());
    }

    for stored in results {
        print_summary_line(&stored);
    }

    Ok(())
}

/// Handles --show: prints one stored result by id
fn handle_show(db: &Path, id: i64) -> anyhow::Result<()> {
    let store = open_store(db)?;

    match store.get(id)? {
        Some(stored) => {
            println!("{}", stored.markdown);
            Ok(())
        }
        None => bail!("no stored crawl result with id {}", id),
    }
}

fn print_summary_line(stored: &StoredCrawl) {
    println!(
        "#{}  {}  {} page(s), {} words  {}  {}",
        stored.id, stored.created_at, stored.pages_crawled, stored.word_count, stored.url,
        stored.title
    );
}
