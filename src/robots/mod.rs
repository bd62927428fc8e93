//! Robots.txt handling module
//!
//! This module decides, once per domain and process, whether pages on that
//! domain may be crawled. The fetched robots.txt is handed to a pluggable
//! [`RobotsPolicy`]; the default [`AllowAll`] policy treats a successful fetch
//! as permission and a failed fetch as denial.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::{AllowAll, RobotsPolicy, RobotsTxtPolicy};

use crate::config::{CrawlerConfig, RobotsPolicyKind, UserAgentConfig};
use crate::crawler::{fetch_url, FetchResult};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Outcome of the robots check for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotsDecision {
    /// The page may be fetched
    CanCrawl,
    /// robots.txt could not be fetched, or the policy said no
    Denied,
    /// No robots URL can be derived for the page
    Unknown,
}

impl RobotsDecision {
    /// Only `CanCrawl` permits a fetch
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::CanCrawl)
    }
}

/// Per-process robots gate
pub struct RobotsGate {
    client: Client,
    policy: Box<dyn RobotsPolicy>,
    cache: RobotsCache,
    fetches: AtomicUsize,
}

impl RobotsGate {
    /// Creates a gate that fetches with `client` and decides with `policy`
    pub fn new(client: Client, policy: Box<dyn RobotsPolicy>) -> Self {
        Self {
            client,
            policy,
            cache: RobotsCache::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Creates a gate using the policy selected in the configuration
    pub fn from_config(client: Client, crawler: &CrawlerConfig, agent: &UserAgentConfig) -> Self {
        let policy: Box<dyn RobotsPolicy> = match crawler.robots_policy {
            RobotsPolicyKind::AllowAll => Box::new(AllowAll),
            RobotsPolicyKind::RobotsTxt => Box::new(RobotsTxtPolicy::new(&agent.crawler_name)),
        };
        Self::new(client, policy)
    }

    /// Returns true if `url` may be crawled
    pub async fn can_visit(&self, url: &str) -> bool {
        self.decision(url).await.is_allowed()
    }

    /// Resolves the robots decision for `url`
    ///
    /// The robots.txt for the URL's domain is fetched on first use only;
    /// every later call for the same domain is answered from the cache,
    /// including after a failed fetch.
    pub async fn decision(&self, url: &str) -> RobotsDecision {
        let Some(robots_url) = Url::parse(url).ok().as_ref().and_then(crate::url::robots_url)
        else {
            tracing::debug!("No robots.txt location for {}", url);
            return RobotsDecision::Unknown;
        };

        let entry = self
            .cache
            .get_or_fetch(&robots_url, || self.fetch_robots(&robots_url))
            .await;

        match entry {
            CachedRobots::Fetched(body) => {
                if self.policy.allows(&body, url) {
                    RobotsDecision::CanCrawl
                } else {
                    RobotsDecision::Denied
                }
            }
            CachedRobots::Unreachable(_) => RobotsDecision::Denied,
        }
    }

    /// Number of robots.txt requests made so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// The underlying cache
    pub fn cache(&self) -> &RobotsCache {
        &self.cache
    }

    async fn fetch_robots(&self, robots_url: &str) -> CachedRobots {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Fetching {}", robots_url);

        match fetch_url(&self.client, robots_url).await {
            FetchResult::Success { body } => CachedRobots::Fetched(body),
            FetchResult::HttpError { status_code } => {
                tracing::info!("{} answered HTTP {}", robots_url, status_code);
                CachedRobots::Unreachable(format!("HTTP {}", status_code))
            }
            FetchResult::NotText { error } | FetchResult::NetworkError { error } => {
                tracing::info!("Could not fetch {}: {}", robots_url, error);
                CachedRobots::Unreachable(error)
            }
        }
    }
}
