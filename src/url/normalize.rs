use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Matches a scheme prefix at the start of a string
static SCHEME_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("Failed to compile scheme regex"));

/// Matches two or more consecutive scheme prefixes, capturing the first
static REPEATED_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://)(?:https?://)+").expect("Failed to compile repeated scheme regex")
});

/// Returns true if the string starts with `http://` or `https://`
pub fn has_scheme(raw: &str) -> bool {
    SCHEME_HEAD.is_match(raw)
}

/// Collapses every run of repeated scheme prefixes down to the first one
///
/// Naive concatenation produces strings such as `https://https://x`; this
/// rewrites them to `https://x`. Strings without such runs are borrowed back
/// unchanged.
pub fn collapse_scheme_runs(raw: &str) -> Cow<'_, str> {
    REPEATED_SCHEME.replace_all(raw, "$1")
}

/// Normalizes a raw target into an absolute URL string
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `<default_scheme>://` when no `http(s)://` prefix is present
/// 3. Collapse repeated scheme prefixes to one
///
/// No network access is performed and the path, query and fragment are left
/// untouched, so the result is stable enough to be used as a dedup key.
///
/// # Examples
///
/// ```
/// use shard_crawler::url::normalize_url;
///
/// assert_eq!(normalize_url("www.example.org", "https"), "https://www.example.org");
/// assert_eq!(normalize_url("https://https://x.com/a", "https"), "https://x.com/a");
/// ```
pub fn normalize_url(raw: &str, default_scheme: &str) -> String {
    let trimmed = raw.trim();

    let absolute = if has_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("{}://{}", default_scheme, trimmed))
    };

    collapse_scheme_runs(&absolute).into_owned()
}
