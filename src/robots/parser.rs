//! Robots.txt policies
//!
//! A policy turns fetched robots.txt content into a yes/no answer for one
//! URL. The gate only consults a policy after a successful fetch.

use robotstxt::DefaultMatcher;

/// Decides whether a URL may be crawled given its domain's robots.txt body
pub trait RobotsPolicy: Send + Sync {
    fn allows(&self, robots_body: &str, url: &str) -> bool;
}

/// Allows everything once robots.txt has been fetched
///
/// The content is not interpreted: a domain that serves robots.txt at all is
/// crawlable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RobotsPolicy for AllowAll {
    fn allows(&self, _robots_body: &str, _url: &str) -> bool {
        true
    }
}

/// Evaluates robots.txt rules for one user agent
///
/// This is a wrapper around the robotstxt crate's matcher. Empty content
/// allows everything.
#[derive(Debug, Clone)]
pub struct RobotsTxtPolicy {
    user_agent: String,
}

impl RobotsTxtPolicy {
    /// Creates a policy answering for `user_agent`
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    /// The user agent the rules are evaluated for
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl RobotsPolicy for RobotsTxtPolicy {
    fn allows(&self, robots_body: &str, url: &str) -> bool {
        if robots_body.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(robots_body, &self.user_agent, url)
    }
}
