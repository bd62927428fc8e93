use serde::Deserialize;

/// Extensions matched when the operator supplies none
pub const DEFAULT_EXTENSIONS: &str = "jpg|png|gif|pdf";

/// Purpose declared by the worker a crawler registers on each shard
pub const CRAWLING_PURPOSE: &str = "Crawling";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(rename = "job-table", default)]
    pub job_table: JobTableConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Scheme prepended to URLs that lack one ("http" or "https")
    #[serde(rename = "default-scheme", default = "default_scheme")]
    pub default_scheme: String,

    /// Extension alternation used when none is given for a crawl
    #[serde(default = "default_extensions")]
    pub extensions: String,

    /// Depth used by one-shot crawls that do not name one; negative is unbounded
    #[serde(rename = "default-depth", default = "default_depth")]
    pub default_depth: i64,

    /// Skip pages already fetched during the same crawl invocation
    #[serde(rename = "dedup-pages", default)]
    pub dedup_pages: bool,

    /// Timeout applied to every HTTP request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Which robots policy decides on fetched robots.txt content
    #[serde(rename = "robots-policy", default)]
    pub robots_policy: RobotsPolicyKind,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_scheme: default_scheme(),
            extensions: default_extensions(),
            default_depth: default_depth(),
            dedup_pages: false,
            request_timeout_secs: default_timeout(),
            robots_policy: RobotsPolicyKind::default(),
        }
    }
}

/// Selects the robots.txt policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RobotsPolicyKind {
    /// Any domain whose robots.txt can be fetched may be crawled
    #[default]
    AllowAll,
    /// Evaluate robots.txt rules for the configured user agent
    RobotsTxt,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Remote job table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JobTableConfig {
    /// Ordered shard endpoints; order determines routing
    #[serde(default = "default_shards")]
    pub shards: Vec<String>,

    /// Author tag attached to every submitted job
    #[serde(default = "default_author")]
    pub author: String,

    /// Purpose the crawler registers its worker under
    #[serde(default = "default_purpose")]
    pub purpose: String,

    /// Path of the job resource on each shard
    #[serde(rename = "job-path", default = "default_job_path")]
    pub job_path: String,

    /// Path of the worker resource on each shard
    #[serde(rename = "worker-path", default = "default_worker_path")]
    pub worker_path: String,
}

impl Default for JobTableConfig {
    fn default() -> Self {
        Self {
            shards: default_shards(),
            author: default_author(),
            purpose: default_purpose(),
            job_path: default_job_path(),
            worker_path: default_worker_path(),
        }
    }
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_extensions() -> String {
    DEFAULT_EXTENSIONS.to_string()
}

fn default_depth() -> i64 {
    5
}

fn default_timeout() -> u64 {
    5
}

fn default_crawler_name() -> String {
    "shard-crawler".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_shards() -> Vec<String> {
    vec!["http://127.0.0.1:8000".to_string()]
}

fn default_author() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "crawler".to_string())
}

fn default_purpose() -> String {
    CRAWLING_PURPOSE.to_string()
}

fn default_job_path() -> String {
    "/jobTable/jobHandler".to_string()
}

fn default_worker_path() -> String {
    "/jobTable/workerHandler".to_string()
}
