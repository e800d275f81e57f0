//! Rule set definition and construction.

use regex::Regex;

/// Immutable blocking rules for one trap instance.
///
/// Built once at configuration time via [`RuleSetBuilder`], then shared
/// read-only by all concurrent request evaluations. All four matching
/// lists may independently be empty; an empty rule set blocks nothing and
/// exempts nothing.
#[derive(Debug, Default)]
pub struct RuleSet {
    /// Exact identity strings to block.
    pub(crate) exact: Vec<String>,
    /// Substring fragments; containing any of them blocks the identity.
    pub(crate) fragments: Vec<String>,
    /// Compiled patterns matched against the identity.
    pub(crate) patterns: Vec<Regex>,
    /// Compiled patterns marking request paths as exempt from blocking.
    pub(crate) public: Vec<Regex>,
    /// Payload to serve on block: a registry name or a filesystem path.
    pub bomb: String,
    /// Log blocked requests.
    pub show_hits: bool,
    /// Log allowed requests.
    pub show_misses: bool,
    /// Log requests to exempt paths.
    pub show_public: bool,
}

impl RuleSet {
    /// Start building a rule set.
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Per-strategy rule counts, for startup logging and tooling.
    pub fn counts(&self) -> RuleCounts {
        RuleCounts {
            exact: self.exact.len(),
            fragments: self.fragments.len(),
            patterns: self.patterns.len(),
            public: self.public.len(),
        }
    }
}

/// Number of configured rules per matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCounts {
    /// Exact identity strings.
    pub exact: usize,
    /// Substring fragments.
    pub fragments: usize,
    /// Identity patterns.
    pub patterns: usize,
    /// Path-exemption patterns.
    pub public: usize,
}

/// Accumulates rules during configuration parsing and freezes them into an
/// immutable [`RuleSet`].
///
/// Pattern arguments are compiled here; a bad pattern fails the build and
/// therefore startup, never a request.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: RuleSet,
}

impl RuleSetBuilder {
    /// Set the payload reference served to blocked clients.
    pub fn bomb(mut self, reference: impl Into<String>) -> Self {
        self.rules.bomb = reference.into();
        self
    }

    /// Add an exact identity string to block.
    pub fn exact(mut self, identity: impl Into<String>) -> Self {
        self.rules.exact.push(identity.into());
        self
    }

    /// Add a substring fragment to block on.
    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.rules.fragments.push(fragment.into());
        self
    }

    /// Compile and add an identity-matching pattern.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.rules.patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Compile and add a path-exemption pattern.
    pub fn public(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.rules.public.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Enable logging of blocked requests.
    pub fn show_hits(mut self) -> Self {
        self.rules.show_hits = true;
        self
    }

    /// Enable logging of allowed requests.
    pub fn show_misses(mut self) -> Self {
        self.rules.show_misses = true;
        self
    }

    /// Enable logging of exempt-path requests.
    pub fn show_public(mut self) -> Self {
        self.rules.show_public = true;
        self
    }

    /// Freeze the accumulated rules.
    pub fn build(self) -> RuleSet {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates() {
        let rules = RuleSet::builder()
            .bomb("1G")
            .exact("BadBot")
            .fragment("crawler")
            .pattern("[Bb]ot")
            .unwrap()
            .public("^/public")
            .unwrap()
            .show_hits()
            .build();

        assert_eq!(rules.bomb, "1G");
        assert_eq!(rules.exact, vec!["BadBot"]);
        assert_eq!(rules.fragments, vec!["crawler"]);
        assert_eq!(rules.patterns.len(), 1);
        assert_eq!(rules.public.len(), 1);
        assert!(rules.show_hits);
        assert!(!rules.show_misses);
        assert!(!rules.show_public);
    }

    #[test]
    fn test_bad_pattern_fails_at_build_time() {
        assert!(RuleSet::builder().pattern("[unclosed").is_err());
        assert!(RuleSet::builder().public("(?P<broken").is_err());
    }
}
