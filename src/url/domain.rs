use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shard_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Builds the robots.txt URL for the domain serving `url`
///
/// The scheme and port are preserved, the path, query and fragment are
/// replaced.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shard_crawler::url::robots_url;
///
/// let url = Url::parse("https://example.com:8443/a/b.html?q=1").unwrap();
/// assert_eq!(
///     robots_url(&url).as_deref(),
///     Some("https://example.com:8443/robots.txt")
/// );
/// ```
pub fn robots_url(url: &Url) -> Option<String> {
    url.host_str()?;
    url.join("/robots.txt").ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_robots_url_drops_path_and_query() {
        let url = Url::parse("http://a.com/deep/page.html?x=1#frag").unwrap();
        assert_eq!(robots_url(&url).as_deref(), Some("http://a.com/robots.txt"));
    }

    #[test]
    fn test_robots_url_keeps_port() {
        let url = Url::parse("http://127.0.0.1:9000/index").unwrap();
        assert_eq!(
            robots_url(&url).as_deref(),
            Some("http://127.0.0.1:9000/robots.txt")
        );
    }

    #[test]
    fn test_same_domain_shares_robots_url() {
        let a = Url::parse("https://a.com/one").unwrap();
        let b = Url::parse("https://a.com/two/three").unwrap();
        assert_eq!(robots_url(&a), robots_url(&b));
    }
}
