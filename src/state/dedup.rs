use crate::url::url_key;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Process-local record of file URLs already handled
///
/// A URL is handled once it has been submitted to a shard or found already
/// present there. Entries are never removed during a run. Keys are the
/// SHA-256 of the URL text, so memory per entry stays fixed whatever the
/// URL length.
///
/// This only stops one process from repeating its own work; two crawler
/// processes can still race on the remote job table.
#[derive(Debug, Default)]
pub struct DedupCache {
    keys: Mutex<HashSet<String>>,
}

impl DedupCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as handled, returning true if it was not marked before
    ///
    /// The check and the insert happen under one lock.
    pub fn mark_if_new(&self, url: &str) -> bool {
        self.keys.lock().insert(url_key(url))
    }

    /// Returns true if `url` has already been handled
    pub fn contains(&self, url: &str) -> bool {
        self.keys.lock().contains(&url_key(url))
    }

    /// Marks `url` as handled
    pub fn mark(&self, url: &str) {
        self.mark_if_new(url);
    }

    /// Number of handled URLs
    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    /// Returns true if nothing has been handled yet
    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }
}
