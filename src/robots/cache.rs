//! Robots.txt caching implementation
//!
//! Entries live for the whole process: a crawl run is short, so there is no
//! expiry and no invalidation. Each robots URL gets its own once-cell, which
//! keeps the fetch for one domain to a single request even if several callers
//! ask at the same moment.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// What was learned from fetching one robots.txt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedRobots {
    /// The policy resource was fetched; its body is kept for the policy
    Fetched(String),
    /// The fetch failed; the domain is not crawled for the rest of the run
    Unreachable(String),
}

/// Per-domain robots.txt cache keyed by robots URL
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedRobots>>>>,
}

impl RobotsCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached entry for `robots_url`, running `fetch` on a miss
    ///
    /// `fetch` runs at most once per key for the life of the cache.
    pub async fn get_or_fetch<F, Fut>(&self, robots_url: &str, fetch: F) -> CachedRobots
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedRobots>,
    {
        let cell = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(robots_url.to_string()).or_default())
        };
        cell.get_or_init(fetch).await.clone()
    }

    /// Returns the entry for `robots_url` if it has been resolved
    pub fn get(&self, robots_url: &str) -> Option<CachedRobots> {
        let entries = self.entries.lock();
        entries.get(robots_url).and_then(|cell| cell.get().cloned())
    }

    /// Number of robots URLs with a resolved entry
    pub fn len(&self) -> usize {
        let entries = self.entries.lock();
        entries.values().filter(|cell| cell.initialized()).count()
    }

    /// Returns true if nothing has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
