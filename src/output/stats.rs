//! Per-crawl statistics
//!
//! This module collects counters while a crawl runs and prints them once it
//! finishes.

use crate::jobs::SubmitOutcome;
use chrono::{DateTime, Utc};

/// A page whose fetch produced no content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPage {
    pub url: String,
    /// The page that linked to it, `None` for the seed
    pub parent: Option<String>,
    pub reason: String,
}

/// Counters for a single crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL as typed
    pub seed: String,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished, if it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages fetched with usable content
    pub pages_fetched: u64,

    /// Pages whose fetch produced no content
    pub fetch_failures: u64,

    /// Pages skipped by the robots gate
    pub robots_denials: u64,

    /// Distinct file links found, summed over pages
    pub files_found: u64,

    /// Jobs created by this crawl
    pub submitted: u64,

    /// File links this process had already handled
    pub already_local: u64,

    /// File links another crawler had already submitted
    pub already_remote: u64,

    /// File links that could not be submitted
    pub failed: u64,

    /// Every page counted in `fetch_failures`, in crawl order
    pub failed_pages: Vec<FailedPage>,
}

impl CrawlReport {
    /// Starts a report for a crawl from `seed`
    pub fn start(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            fetch_failures: 0,
            robots_denials: 0,
            files_found: 0,
            submitted: 0,
            already_local: 0,
            already_remote: 0,
            failed: 0,
            failed_pages: Vec::new(),
        }
    }

    /// Counts one dispatch outcome
    pub fn record(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Submitted => self.submitted += 1,
            SubmitOutcome::AlreadyLocal => self.already_local += 1,
            SubmitOutcome::AlreadyRemote => self.already_remote += 1,
            SubmitOutcome::Failed => self.failed += 1,
        }
    }

    /// Counts a failed fetch and keeps the URL for the report
    pub fn record_failure(
        &mut self,
        url: impl Into<String>,
        parent: Option<String>,
        reason: impl Into<String>,
    ) {
        self.fetch_failures += 1;
        self.failed_pages.push(FailedPage {
            url: url.into(),
            parent,
            reason: reason.into(),
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Time between start and finish, or until now for a running crawl
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }

    /// Number of dispatch attempts, whatever their outcome
    pub fn dispatched(&self) -> u64 {
        self.submitted + self.already_local + self.already_remote + self.failed
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Seed: {}", report.seed);
    println!("  Started:  {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    let elapsed = report.elapsed();
    println!(
        "  Elapsed:  {}.{:03}s",
        elapsed.num_seconds(),
        elapsed.num_milliseconds().rem_euclid(1000)
    );
    println!();

    println!("Pages:");
    println!("  Fetched: {}", report.pages_fetched);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!("  Robots denials: {}", report.robots_denials);
    println!();

    println!("Files:");
    println!("  Found: {}", report.files_found);
    println!("  Submitted: {}", report.submitted);
    println!("  Already submitted here: {}", report.already_local);
    println!("  Already on a shard: {}", report.already_remote);
    println!("  Failed: {}", report.failed);

    if !report.failed_pages.is_empty() {
        println!();
        println!("Failed URLs:");
        for page in &report.failed_pages {
            match &page.parent {
                Some(parent) => {
                    println!("  - {} ({}, linked from {})", page.url, page.reason, parent)
                }
                None => println!("  - {} ({})", page.url, page.reason),
            }
        }
    }
}
