//! Link extraction from fetched page content
//!
//! Links are found by pattern over the raw text rather than by parsing HTML,
//! so absolute URLs in scripts, inline JSON or plain-text bodies are picked up
//! as well as those in anchors.

use crate::url::collapse_scheme_runs;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Scheme followed by a run of anything but whitespace and double quotes
static ABSOLUTE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https?://[^\s"]+"#).expect("Failed to compile URL regex"));

/// The absolute links referenced by one page body
///
/// Iteration is lazy and may be restarted with another call to [`iter`],
/// which scans the body again from the start. Duplicates are preserved in
/// document order.
///
/// [`iter`]: PageLinks::iter
#[derive(Debug, Clone, Copy)]
pub struct PageLinks<'a> {
    body: &'a str,
}

impl<'a> PageLinks<'a> {
    /// Wraps a decoded page body
    pub fn new(body: &'a str) -> Self {
        Self { body }
    }

    /// Iterates over the raw matched links
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        ABSOLUTE_URL.find_iter(self.body).map(|m| m.as_str())
    }

    /// Iterates over the matched links with repeated scheme prefixes collapsed
    pub fn normalized(&self) -> impl Iterator<Item = Cow<'a, str>> + 'a {
        self.iter().map(collapse_scheme_runs)
    }
}

/// Extracts the absolute links referenced by a page body
///
/// # Example
///
/// ```
/// use shard_crawler::crawler::extract_links;
///
/// let body = r#"<img src="http://a.com/x.png"> see https://b.org/page"#;
/// let links: Vec<&str> = extract_links(body).iter().collect();
/// assert_eq!(links, vec!["http://a.com/x.png", "https://b.org/page"]);
/// ```
pub fn extract_links(body: &str) -> PageLinks<'_> {
    PageLinks::new(body)
}
