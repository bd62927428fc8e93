//! URL handling module
//!
//! This module provides scheme normalization, domain extraction and the
//! [`TargetUrl`] type the rest of the crawler passes around.

mod domain;
mod hash;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, robots_url};
pub use hash::{url_digest, url_key};
pub use normalize::{collapse_scheme_runs, has_scheme, normalize_url};

/// A normalized, absolute crawl target
///
/// The normalized text is kept as the identity of the target (it is
/// what gets hashed for routing and dedup), while the parsed form provides the
/// derived attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    text: String,
    parsed: Url,
}

impl TargetUrl {
    /// Normalizes `raw` and parses the result
    ///
    /// # Errors
    ///
    /// * `UrlError::Parse` - The normalized text is not a URL
    /// * `UrlError::InvalidScheme` - The scheme is not http or https
    /// * `UrlError::MissingDomain` - The URL has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use shard_crawler::url::TargetUrl;
    ///
    /// let target = TargetUrl::parse("example.com/img/cat.PNG", "https").unwrap();
    /// assert_eq!(target.as_str(), "https://example.com/img/cat.PNG");
    /// assert_eq!(target.domain(), "example.com");
    /// assert_eq!(target.file_name(), Some("cat.PNG"));
    /// assert_eq!(target.extension(), Some("png".to_string()));
    /// ```
    pub fn parse(raw: &str, default_scheme: &str) -> Result<Self, UrlError> {
        let text = normalize_url(raw, default_scheme);
        let parsed = Url::parse(&text).map_err(|e| UrlError::Parse(e.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
        }

        if parsed.host_str().is_none() {
            return Err(UrlError::MissingDomain);
        }

        Ok(Self { text, parsed })
    }

    /// The normalized URL text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.parsed
    }

    /// Lowercased host of the URL
    pub fn domain(&self) -> String {
        extract_domain(&self.parsed).unwrap_or_default()
    }

    /// Text after the last slash of the path, if non-empty
    pub fn file_name(&self) -> Option<&str> {
        self.parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
    }

    /// Lowercased extension of the file name, if it has one
    pub fn extension(&self) -> Option<String> {
        self.file_name()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_lowercase())
    }

    /// robots.txt URL for this target's domain
    pub fn robots_url(&self) -> Option<String> {
        robots_url(&self.parsed)
    }
}

impl std::fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for TargetUrl {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prepends_scheme() {
        let target = TargetUrl::parse("www.example.org", "https").unwrap();
        assert_eq!(target.as_str(), "https://www.example.org");
        assert_eq!(target.domain(), "www.example.org");
    }

    #[test]
    fn test_parse_collapses_repeated_scheme() {
        let target = TargetUrl::parse("http://http://a.com/x", "https").unwrap();
        assert_eq!(target.as_str(), "http://a.com/x");
    }

    #[test]
    fn test_text_is_not_reserialized() {
        // Url would add a trailing slash; the identity must not change
        let target = TargetUrl::parse("https://a.com", "https").unwrap();
        assert_eq!(target.as_str(), "https://a.com");
        assert_eq!(target.url().as_str(), "https://a.com/");
    }

    #[test]
    fn test_file_name_and_extension() {
        let target = TargetUrl::parse("https://a.com/docs/report.final.PDF", "https").unwrap();
        assert_eq!(target.file_name(), Some("report.final.PDF"));
        assert_eq!(target.extension(), Some("pdf".to_string()));
    }

    #[test]
    fn test_no_file_name_on_directory() {
        let target = TargetUrl::parse("https://a.com/docs/", "https").unwrap();
        assert_eq!(target.file_name(), None);
        assert_eq!(target.extension(), None);
    }

    #[test]
    fn test_no_extension() {
        let target = TargetUrl::parse("https://a.com/page2", "https").unwrap();
        assert_eq!(target.file_name(), Some("page2"));
        assert_eq!(target.extension(), None);
    }

    #[test]
    fn test_robots_url() {
        let target = TargetUrl::parse("https://a.com/x/y", "https").unwrap();
        assert_eq!(
            target.robots_url().as_deref(),
            Some("https://a.com/robots.txt")
        );
    }

    #[test]
    fn test_rejects_missing_host() {
        assert!(TargetUrl::parse("https://", "https").is_err());
    }

    #[test]
    fn test_display_matches_text() {
        let target = TargetUrl::parse("a.com/q", "http").unwrap();
        assert_eq!(target.to_string(), "http://a.com/q");
    }
}
