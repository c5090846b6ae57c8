//! Route skip-list matching.
//!
//! # Responsibilities
//! - Match path prefixes (case-sensitive)
//! - Match regexes anchored at the start of the path
//! - Combine conditions with OR semantics, prefixes first
//!
//! # Design Decisions
//! - Regexes compiled once at construction
//! - First match wins; evaluation short-circuits
//! - Empty skip list = nothing skipped

use regex::Regex;

/// Trait for matching request paths against a skip condition.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PathMatcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches a regex at the start of the path (not necessarily the whole path).
#[derive(Debug, Clone)]
pub struct PathRegexMatcher {
    regex: Regex,
}

impl PathRegexMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&format!("^(?:{})", pattern))?,
        })
    }
}

impl PathMatcher for PathRegexMatcher {
    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Ordered skip conditions: all prefixes, then all regexes.
#[derive(Debug, Default)]
pub struct SkipList {
    matchers: Vec<Box<dyn PathMatcher>>,
}

impl SkipList {
    pub fn new<R, P>(routes: R, regexes: P) -> Result<Self, regex::Error>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut matchers: Vec<Box<dyn PathMatcher>> = routes
            .into_iter()
            .map(|r| Box::new(PathPrefixMatcher::new(r)) as Box<dyn PathMatcher>)
            .collect();
        for pattern in regexes {
            matchers.push(Box::new(PathRegexMatcher::new(pattern.as_ref())?));
        }
        Ok(Self { matchers })
    }

    /// True if request logging should be suppressed for `path`.
    pub fn should_skip(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
