//! Output module for crawl reports
//!
//! This module handles:
//! - Counting what each crawl did
//! - Printing the report after a crawl
//! - Listing the jobs a dry run would have submitted

pub mod stats;

pub use stats::{print_report, CrawlReport, FailedPage};

use crate::jobs::NewJob;

/// Prints the jobs collected by a dry run, grouped by shard
pub fn print_dry_run_jobs(shards: &[(String, Vec<NewJob>)]) {
    println!("=== Dry Run Jobs ===\n");

    for (endpoint, jobs) in shards {
        println!("{} ({} jobs):", endpoint, jobs.len());
        for job in jobs {
            println!("  - {} (from {})", job.message, job.meta_data);
        }
    }
}
