//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Walking the frontier depth-first from a seed
//! - Consulting the robots gate before each fetch
//! - Splitting each page's links into files and pages
//! - Dispatching file links to the shard pool
//!
//! The caches and the router outlive a single crawl. Running several crawls
//! through the same [`Crawler`] shares what earlier crawls learned.

use crate::config::Config;
use crate::crawler::classify::{classify_links, ExtensionPattern, FileMatcher};
use crate::crawler::extract::extract_links;
use crate::crawler::frontier::Frontier;
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::jobs::{ShardRouter, SubmitOutcome};
use crate::output::CrawlReport;
use crate::robots::{RobotsDecision, RobotsGate};
use crate::state::DedupCache;
use crate::url::TargetUrl;
use crate::CrawlError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main crawler structure
pub struct Crawler {
    default_scheme: String,
    dedup_pages: bool,
    client: Client,
    robots: Arc<RobotsGate>,
    dedup: Arc<DedupCache>,
    router: Arc<ShardRouter>,
}

impl Crawler {
    /// Creates a crawler that submits to the configured REST shards
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let client = Self::client_for(config)?;
        let router = ShardRouter::from_config(client.clone(), &config.job_table)?;
        Ok(Self::assemble(config, client, router))
    }

    /// Creates a crawler that submits through an existing router
    ///
    /// Used for dry runs and tests, where the job tables are not REST shards.
    pub fn with_router(config: &Config, router: ShardRouter) -> Result<Self, CrawlError> {
        let client = Self::client_for(config)?;
        Ok(Self::assemble(config, client, router))
    }

    fn client_for(config: &Config) -> Result<Client, CrawlError> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        Ok(build_http_client(&config.user_agent, timeout)?)
    }

    fn assemble(config: &Config, client: Client, router: ShardRouter) -> Self {
        let robots = RobotsGate::from_config(client.clone(), &config.crawler, &config.user_agent);

        Self {
            default_scheme: config.crawler.default_scheme.clone(),
            dedup_pages: config.crawler.dedup_pages,
            client,
            robots: Arc::new(robots),
            dedup: Arc::new(DedupCache::new()),
            router: Arc::new(router),
        }
    }

    /// The process-wide set of submitted file URLs
    pub fn dedup(&self) -> &DedupCache {
        &self.dedup
    }

    pub fn robots(&self) -> &RobotsGate {
        &self.robots
    }

    pub fn router(&self) -> &ShardRouter {
        &self.router
    }

    /// Crawls from `seed`, dispatching every file link `matcher` accepts
    ///
    /// `depth` counts fetch levels: 0 fetches nothing, 1 fetches the seed
    /// only, and a negative depth never runs out. Failures along the way stop
    /// the affected branch and are tallied in the returned report.
    pub async fn crawl(&self, seed: &str, matcher: &dyn FileMatcher, depth: i64) -> CrawlReport {
        let mut report = CrawlReport::start(seed);
        let mut frontier = Frontier::new(seed, depth, self.dedup_pages);

        while let Some(page) = frontier.next() {
            if page.depth == 0 {
                continue;
            }

            let target = match TargetUrl::parse(&page.url, &self.default_scheme) {
                Ok(target) => target,
                Err(e) => {
                    debug!("Skipping {}: {}", page.url, e);
                    continue;
                }
            };

            if !frontier.first_visit(target.as_str()) {
                debug!("Already crawled {}", target);
                continue;
            }

            match self.robots.decision(target.as_str()).await {
                RobotsDecision::CanCrawl => {}
                decision => {
                    info!("Robots check for {} gave {:?}, skipping", target, decision);
                    report.robots_denials += 1;
                    continue;
                }
            }

            let body = match fetch_url(&self.client, target.as_str()).await {
                FetchResult::Success { body } => body,
                FetchResult::HttpError { status_code } => {
                    debug!("{} answered HTTP {}", target, status_code);
                    report.record_failure(
                        target.as_str(),
                        page.parent,
                        format!("HTTP {}", status_code),
                    );
                    continue;
                }
                FetchResult::NotText { error } | FetchResult::NetworkError { error } => {
                    warn!("Could not fetch {}: {}", target, error);
                    report.record_failure(target.as_str(), page.parent, error);
                    continue;
                }
            };
            report.pages_fetched += 1;

            let classified = classify_links(extract_links(&body).normalized(), matcher);
            let files = classified.unique_files();
            report.files_found += files.len() as u64;

            let mut submitted = 0;
            for file in files {
                let outcome = self.router.dispatch(file, target.as_str(), &self.dedup).await;
                if outcome == SubmitOutcome::Submitted {
                    submitted += 1;
                }
                report.record(outcome);
            }
            info!("For url {} submitted {} files", target, submitted);

            frontier.push_children(target.as_str(), page.depth, classified.pages);
        }

        report.finish();
        report
    }
}

impl std::fmt::Debug for Crawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawler")
            .field("default_scheme", &self.default_scheme)
            .field("dedup_pages", &self.dedup_pages)
            .field("router", &self.router)
            .finish()
    }
}

/// Runs one crawl with a fresh crawler built from `config`
///
/// An empty `extensions` string selects the configured alternation. A bad
/// alternation is rejected before anything is fetched.
pub async fn run_crawl(
    config: &Config,
    seed: &str,
    extensions: &str,
    depth: i64,
) -> Result<CrawlReport, CrawlError> {
    let pattern = ExtensionPattern::from_input(extensions, &config.crawler.extensions)?;
    let crawler = Crawler::new(config)?;
    Ok(crawler.crawl(seed, &pattern, depth).await)
}
