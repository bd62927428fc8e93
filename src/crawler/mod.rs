//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Link extraction and file/page classification
//! - The depth-first frontier
//! - Overall crawl coordination

mod classify;
mod coordinator;
mod extract;
mod fetcher;
mod frontier;

pub use classify::{
    classify, classify_links, ClassifiedLinks, ExtensionPattern, FileMatch, FileMatcher, LinkKind,
};
pub use coordinator::{run_crawl, Crawler};
pub use extract::{extract_links, PageLinks};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{Frontier, PendingPage};
