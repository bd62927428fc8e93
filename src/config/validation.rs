use crate::config::types::{Config, CrawlerConfig, JobTableConfig, UserAgentConfig};
use crate::crawler::ExtensionPattern;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_job_table_config(&config.job_table)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.default_scheme != "http" && config.default_scheme != "https" {
        return Err(ConfigError::Validation(format!(
            "default_scheme must be 'http' or 'https', got '{}'",
            config.default_scheme
        )));
    }

    // A bad default pattern must fail here, not on the first crawl
    ExtensionPattern::new(&config.extensions)?;

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the job table section
fn validate_job_table_config(config: &JobTableConfig) -> Result<(), ConfigError> {
    validate_shards(&config.shards)?;

    if config.author.trim().is_empty() {
        return Err(ConfigError::Validation("author cannot be empty".to_string()));
    }

    if config.purpose.trim().is_empty() {
        return Err(ConfigError::Validation(
            "purpose cannot be empty".to_string(),
        ));
    }

    validate_resource_path("job_path", &config.job_path)?;
    validate_resource_path("worker_path", &config.worker_path)?;

    Ok(())
}

/// Validates the shard endpoint list
fn validate_shards(shards: &[String]) -> Result<(), ConfigError> {
    if shards.is_empty() {
        return Err(ConfigError::Validation(
            "at least one shard endpoint is required".to_string(),
        ));
    }

    for shard in shards {
        let url = Url::parse(shard).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid shard endpoint '{}': {}", shard, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Shard endpoint '{}' must use http or https",
                shard
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Shard endpoint '{}' has no host",
                shard
            )));
        }
    }

    Ok(())
}

fn validate_resource_path(name: &str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must start with '/', got '{}'",
            name, path
        )));
    }
    Ok(())
}
