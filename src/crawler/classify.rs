//! Extension-based link classification
//!
//! A link whose tail matches the extension pattern is a file target and is
//! dispatched to the job table; every other link is a page to recurse into.

use crate::config::DEFAULT_EXTENSIONS;
use crate::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// The captured parts of a file link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch<'u> {
    /// Everything before the final `.<extension>`
    pub base: &'u str,
    /// The matched extension, as written in the link
    pub extension: &'u str,
}

impl FileMatch<'_> {
    /// Canonical `<base>.<extension>` form of the file link
    pub fn file_url(&self) -> String {
        format!("{}.{}", self.base, self.extension)
    }
}

/// Anything that can recognize a file link and expose its parts
pub trait FileMatcher: Send + Sync {
    /// Returns the captured base and extension if `url` is a file link
    fn match_file<'u>(&self, url: &'u str) -> Option<FileMatch<'u>>;

    /// Returns true if `url` is a file link
    fn is_file(&self, url: &str) -> bool {
        self.match_file(url).is_some()
    }
}

/// Compiled, case-insensitive matcher over an alternation of extensions
#[derive(Debug, Clone)]
pub struct ExtensionPattern {
    alternation: String,
    regex: Regex,
}

impl ExtensionPattern {
    /// Compiles an alternation such as `jpg|png|gif|pdf`
    ///
    /// An empty string selects the default extensions. Leading dots on each
    /// alternative are ignored, so `.png|.gif` works too. Alternatives may be
    /// regular expressions (`jpe?g`).
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidPattern` if an alternative is empty, the
    /// alternation is not a balanced expression on its own, or the resulting
    /// expression does not compile.
    ///
    /// # Example
    ///
    /// ```
    /// use shard_crawler::crawler::{ExtensionPattern, FileMatcher};
    ///
    /// let pattern = ExtensionPattern::new("png|jpe?g").unwrap();
    /// assert!(pattern.is_file("https://a.com/cat.JPEG"));
    /// assert!(!pattern.is_file("https://a.com/index.html"));
    /// assert!(ExtensionPattern::new("png||gif").is_err());
    /// ```
    pub fn new(alternation: &str) -> Result<Self, ConfigError> {
        let trimmed = alternation.trim();
        let source = if trimmed.is_empty() {
            DEFAULT_EXTENSIONS
        } else {
            trimmed
        };

        let mut alternatives = Vec::new();
        for alternative in source.split('|') {
            let alternative = alternative.trim().trim_start_matches('.');
            if alternative.is_empty() {
                return Err(ConfigError::InvalidPattern(format!(
                    "empty extension in '{}'",
                    source
                )));
            }
            alternatives.push(alternative);
        }

        let alternation = alternatives.join("|");
        // Unbalanced groups would escape the extension group
        Regex::new(&alternation)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", source, e)))?;

        let regex = Regex::new(&format!(
            r"(?i)^(\S+)\.({})(?:[?#]\S*)?$",
            alternation
        ))
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", source, e)))?;

        Ok(Self { alternation, regex })
    }

    /// Builds the pattern for one crawl's extension input
    ///
    /// Blank input falls back to `configured`, the alternation from the
    /// `[crawler]` section.
    pub fn from_input(input: &str, configured: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            Self::new(configured)
        } else {
            Self::new(input)
        }
    }

    /// The cleaned alternation this pattern was compiled from
    pub fn alternation(&self) -> &str {
        &self.alternation
    }
}

impl Default for ExtensionPattern {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS).expect("default extensions compile")
    }
}

impl FileMatcher for ExtensionPattern {
    fn match_file<'u>(&self, url: &'u str) -> Option<FileMatch<'u>> {
        let captures = self.regex.captures(url)?;
        Some(FileMatch {
            base: captures.get(1)?.as_str(),
            extension: captures.get(2)?.as_str(),
        })
    }
}

/// Where a single link goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// A file target, in canonical `<base>.<extension>` form
    File(String),
    /// A page to recurse into, unchanged
    Page(String),
}

/// Classifies one link; an extension match always wins over page treatment
pub fn classify(url: &str, matcher: &dyn FileMatcher) -> LinkKind {
    match matcher.match_file(url) {
        Some(found) => LinkKind::File(found.file_url()),
        None => LinkKind::Page(url.to_string()),
    }
}

/// Links of one page split by kind, each list in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub files: Vec<String>,
    pub pages: Vec<String>,
}

impl ClassifiedLinks {
    /// File links with duplicates removed, first occurrence kept
    pub fn unique_files(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.files
            .iter()
            .map(String::as_str)
            .filter(|file| seen.insert(*file))
            .collect()
    }
}

/// Classifies every link of a page
pub fn classify_links<I, S>(links: I, matcher: &dyn FileMatcher) -> ClassifiedLinks
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classified = ClassifiedLinks::default();
    for link in links {
        match classify(link.as_ref(), matcher) {
            LinkKind::File(file) => classified.files.push(file),
            LinkKind::Page(page) => classified.pages.push(page),
        }
    }
    classified
}
