//! Configuration module
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a crawler can run without
//! a file at all.
//!
//! # Example
//!
//! ```no_run
//! use shard_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Default depth: {}", config.crawler.default_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, JobTableConfig, RobotsPolicyKind, UserAgentConfig, CRAWLING_PURPOSE,
    DEFAULT_EXTENSIONS,
};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};

pub use validation::validate as validate_config;
