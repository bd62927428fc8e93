//! shard-crawler main entry point
//!
//! This is the command-line interface for the shard-crawler crawl-and-dispatch
//! engine.

use anyhow::Context;
use clap::Parser;
use shard_crawler::config::{load_or_default, validate_config, Config};
use shard_crawler::crawler::{Crawler, ExtensionPattern};
use shard_crawler::jobs::{InMemoryJobTable, JobTable, ShardRouter};
use shard_crawler::output::{print_dry_run_jobs, print_report};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// shard-crawler: crawl pages and hand file links to a sharded job table
///
/// Without `--url` the crawler asks for a target URL, an extension
/// alternation and a recursion depth, crawls, and asks again until end of
/// input or Ctrl-C.
#[derive(Parser, Debug)]
#[command(name = "shard-crawler")]
#[command(version)]
#[command(about = "Crawl pages and dispatch file links to a sharded job table", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Job table endpoint; repeat to list every shard in routing order
    #[arg(long = "shard", value_name = "URL")]
    shards: Vec<String>,

    /// Crawl each page at most once per invocation
    #[arg(long)]
    dedup_pages: bool,

    /// Collect jobs in memory instead of submitting them
    #[arg(long)]
    dry_run: bool,

    /// Crawl this URL once and exit instead of prompting
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Extension alternation for --url, e.g. "png|pdf"
    #[arg(long, requires = "url")]
    extensions: Option<String>,

    /// Recursion depth for --url; negative crawls without a depth limit
    #[arg(long, requires = "url", allow_negative_numbers = true)]
    depth: Option<i64>,
}

type InputLines = mpsc::UnboundedReceiver<String>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;
    for (index, endpoint) in config.job_table.shards.iter().enumerate() {
        tracing::info!("Shard {}: {}", index, endpoint);
    }

    let (crawler, dry_run_tables) = build_crawler(&config, cli.dry_run)?;

    match cli.url.as_deref() {
        Some(seed) => {
            let extensions = cli.extensions.as_deref().unwrap_or_default();
            let depth = cli.depth.unwrap_or(config.crawler.default_depth);
            let pattern = ExtensionPattern::from_input(extensions, &config.crawler.extensions)?;

            tokio::select! {
                report = crawler.crawl(seed, &pattern, depth) => print_report(&report),
                _ = tokio::signal::ctrl_c() => eprintln!("Ctrl-C applied. Exiting now.."),
            }
        }
        None => {
            tokio::select! {
                result = interactive(&crawler, &config.crawler.extensions) => result?,
                _ = tokio::signal::ctrl_c() => eprintln!("\nCtrl-C applied. Exiting now.."),
            }
            eprintln!("Bye..");
        }
    }

    if !dry_run_tables.is_empty() {
        let collected: Vec<_> = dry_run_tables
            .iter()
            .map(|table| (table.endpoint().to_string(), table.jobs()))
            .collect();
        print_dry_run_jobs(&collected);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shard_crawler=info,warn"),
            1 => EnvFilter::new("shard_crawler=debug,info"),
            2 => EnvFilter::new("shard_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file, applies command-line overrides and validates
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to build default configuration".to_string(),
    })?;

    if !cli.shards.is_empty() {
        config.job_table.shards = cli.shards.clone();
    }
    if cli.dedup_pages {
        config.crawler.dedup_pages = true;
    }

    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Builds the crawler, backed by in-memory tables for a dry run
fn build_crawler(
    config: &Config,
    dry_run: bool,
) -> anyhow::Result<(Crawler, Vec<Arc<InMemoryJobTable>>)> {
    if !dry_run {
        return Ok((Crawler::new(config)?, Vec::new()));
    }

    tracing::info!("Dry run: jobs are collected in memory");
    let tables: Vec<Arc<InMemoryJobTable>> = config
        .job_table
        .shards
        .iter()
        .map(|endpoint| Arc::new(InMemoryJobTable::new(endpoint.clone())))
        .collect();
    let router = ShardRouter::new(
        tables
            .iter()
            .map(|table| table.clone() as Arc<dyn JobTable>)
            .collect(),
        &config.job_table.purpose,
        &config.job_table.author,
    )?;

    Ok((Crawler::with_router(config, router)?, tables))
}

/// Reads stdin on its own thread so an interrupt never waits on a pending read
///
/// The channel closes at end of input or on a read error.
fn spawn_stdin_reader() -> InputLines {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Prompt loop; returns on end of input
///
/// A blank extension answer uses `configured_extensions`.
async fn interactive(crawler: &Crawler, configured_extensions: &str) -> anyhow::Result<()> {
    let mut lines = spawn_stdin_reader();

    loop {
        let Some(line) =
            prompt(&mut lines, "\nTarget Url: eg [www.example.org or http://www.h.com] ").await?
        else {
            return Ok(());
        };
        let seed = line.trim().to_string();
        if seed.is_empty() {
            continue;
        }

        let Some(line) = prompt(&mut lines, "Your extensions separated by '|' eg png|html: ").await?
        else {
            return Ok(());
        };
        let pattern = match ExtensionPattern::from_input(&line, configured_extensions) {
            Ok(pattern) => pattern,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let depth = loop {
            let Some(line) = prompt(
                &mut lines,
                "\nRecursion Depth(a negative depth indicates you want script to go as far): ",
            )
            .await?
            else {
                return Ok(());
            };
            match parse_depth(&line) {
                Some(depth) => break depth,
                None => eprintln!("Recursion depth must be an integer"),
            }
        };

        let report = crawler.crawl(&seed, &pattern, depth).await;
        print_report(&report);
    }
}

/// Writes `message` to stderr and reads one line; `None` at end of input
async fn prompt(lines: &mut InputLines, message: &str) -> std::io::Result<Option<String>> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", message)?;
    stderr.flush()?;
    Ok(lines.recv().await)
}

/// Parses a typed depth; blank input means 1
fn parse_depth(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(1);
    }
    trimmed.parse().ok()
}
