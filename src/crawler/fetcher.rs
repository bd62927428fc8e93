//! HTTP fetcher implementation
//!
//! This module handles the GET requests made by the crawler, for pages and
//! for robots.txt alike:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - Fetching a URL and decoding the body as UTF-8 text
//! - Classifying failures so callers can log them

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched and decoded the body
    Success {
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The body could not be decoded as UTF-8 text
    NotText {
        /// Decoding error description
        error: String,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Applied to every request made with the client
///
/// # Example
///
/// ```no_run
/// use shard_crawler::config::UserAgentConfig;
/// use shard_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and decodes its body as text
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with UTF-8 body | Success |
/// | 2xx with non-UTF-8 body | NotText |
/// | Non-2xx after redirects | HttpError |
/// | Timeout, refused connection, TLS error | NetworkError |
///
/// There is no retry; a failed fetch ends that branch of the crawl.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return classify_error(&e),
    };

    match String::from_utf8(bytes.to_vec()) {
        Ok(body) => FetchResult::Success { body },
        Err(e) => FetchResult::NotText {
            error: e.to_string(),
        },
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
