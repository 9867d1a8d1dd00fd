//! Path matching logic.
//!
//! # Responsibilities
//! - Match path prefixes (case-sensitive, plain `starts_with`)
//! - Extract the app id from `/app/<id>/...`
//! - Recognize static asset paths that bypass the router
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefixes do not respect segment boundaries (`/dashboard` matches `/dashboards`)
//! - No regex to guarantee O(n) matching

/// Paths the hosting layer never hands to the router.
pub const BYPASS_PREFIXES: &[&str] = &["/_next/static", "/_next/image", "/favicon.ico"];

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches a single path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches if any of its prefixes match (OR semantics).
#[derive(Debug, Clone, Default)]
pub struct AnyPrefixMatcher {
    matchers: Vec<PathPrefixMatcher>,
}

impl AnyPrefixMatcher {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matchers: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }
}

impl Matcher for AnyPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}

/// True for static asset paths excluded from routing.
pub fn is_bypassed(path: &str) -> bool {
    BYPASS_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// The `<id>` segment of `/app/<id>` or `/app/<id>/...`.
pub fn app_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/app/")?;
    let id = rest.split('/').next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
