//! shard-crawler: a sharded crawl-and-dispatch engine
//!
//! This crate crawls web pages recursively, splits the links it finds into
//! file targets (matching an extension pattern) and pages to recurse into, and
//! hands the file targets to a pool of remote job tables as deduplicated jobs.

pub mod config;
pub mod crawler;
pub mod jobs;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid extension pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, ExtensionPattern};
pub use jobs::{ShardRouter, SubmitOutcome, WorkerDriver};
pub use robots::{RobotsDecision, RobotsGate};
pub use state::DedupCache;
pub use url::{normalize_url, TargetUrl};
