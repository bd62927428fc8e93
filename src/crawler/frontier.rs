//! Depth-first work-list for a single crawl
//!
//! Pages are kept on a stack of `(url, depth, parent)` entries. Children are
//! pushed in reverse so they pop in document order, which gives the same
//! visiting order as a recursive depth-first walk.

use std::collections::HashSet;

/// A page waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPage {
    /// The page URL as found, before normalization
    pub url: String,

    /// Remaining depth; zero stops, negative never runs out
    pub depth: i64,

    /// The page the URL was found on, `None` for the seed
    pub parent: Option<String>,
}

/// Stack of pending pages with an optional visited set
#[derive(Debug)]
pub struct Frontier {
    stack: Vec<PendingPage>,
    visited: Option<HashSet<String>>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    ///
    /// With `dedup_pages` set, each normalized page URL is crawled at most
    /// once; otherwise a page is crawled every time it is reached.
    pub fn new(seed: impl Into<String>, depth: i64, dedup_pages: bool) -> Self {
        Self {
            stack: vec![PendingPage {
                url: seed.into(),
                depth,
                parent: None,
            }],
            visited: dedup_pages.then(HashSet::new),
        }
    }

    /// Next page in depth-first pre-order
    pub fn next(&mut self) -> Option<PendingPage> {
        self.stack.pop()
    }

    /// Queues the page links found on `parent`
    ///
    /// Negative depths stay negative.
    pub fn push_children<I>(&mut self, parent: &str, depth: i64, children: I)
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: DoubleEndedIterator,
    {
        let child_depth = if depth < 0 { depth } else { depth - 1 };
        for url in children.into_iter().rev() {
            self.stack.push(PendingPage {
                url,
                depth: child_depth,
                parent: Some(parent.to_string()),
            });
        }
    }

    /// Records a visit to `url`, returning false if it should be skipped
    pub fn first_visit(&mut self, url: &str) -> bool {
        match self.visited.as_mut() {
            Some(visited) => visited.insert(url.to_string()),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_children_pop_in_document_order() {
        let mut frontier = Frontier::new("seed", 2, false);
        let seed = frontier.next().unwrap();
        assert_eq!(seed.parent, None);

        frontier.push_children(&seed.url, seed.depth, urls(&["a", "b", "c"]));
        let order: Vec<String> = std::iter::from_fn(|| frontier.next())
            .map(|p| p.url)
            .collect();
        assert_eq!(order, urls(&["a", "b", "c"]));
    }

    #[test]
    fn test_depth_first_pre_order() {
        let mut frontier = Frontier::new("seed", 3, false);
        let seed = frontier.next().unwrap();
        frontier.push_children("seed", seed.depth, urls(&["a", "b"]));

        let a = frontier.next().unwrap();
        assert_eq!(a.url, "a");
        assert_eq!(a.depth, 2);
        assert_eq!(a.parent.as_deref(), Some("seed"));
        frontier.push_children("a", a.depth, urls(&["a1"]));

        assert_eq!(frontier.next().unwrap().url, "a1");
        assert_eq!(frontier.next().unwrap().url, "b");
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_negative_depth_stays_negative() {
        let mut frontier = Frontier::new("seed", -1, false);
        let seed = frontier.next().unwrap();
        frontier.push_children("seed", seed.depth, urls(&["a"]));
        assert_eq!(frontier.next().unwrap().depth, -1);
    }

    #[test]
    fn test_visited_set_only_when_enabled() {
        let mut plain = Frontier::new("seed", 1, false);
        assert!(plain.first_visit("https://a.com/"));
        assert!(plain.first_visit("https://a.com/"));

        let mut deduped = Frontier::new("seed", 1, true);
        assert!(deduped.first_visit("https://a.com/"));
        assert!(!deduped.first_visit("https://a.com/"));
        assert!(deduped.first_visit("https://a.com/other"));
    }

    #[test]
    fn test_len() {
        let mut frontier = Frontier::new("seed", 1, false);
        assert_eq!(frontier.len(), 1);
        frontier.next();
        frontier.push_children("seed", 1, urls(&["a", "b"]));
        assert_eq!(frontier.len(), 2);
    }
}
