//! Decision predicates.
//!
//! # Responsibilities
//! - Answer "is this path exempt?" and "is this identity blocked?"
//! - Pure functions of the rule set and the request's own strings
//!
//! # Design Decisions
//! - Existential matching: first hit short-circuits, list order cannot
//!   change the outcome
//! - Case-sensitive, no trimming or folding; an empty identity is only
//!   caught if the configuration explicitly matches it

use crate::rules::RuleSet;

impl RuleSet {
    /// Whether the request path is exempt from blocking.
    ///
    /// True iff any configured `public` pattern matches anywhere in `path`.
    pub fn is_path_exempt(&self, path: &str) -> bool {
        self.public.iter().any(|re| re.is_match(path))
    }

    /// Whether the declared client identity is blocked.
    ///
    /// True iff the identity equals an exact entry, contains a configured
    /// fragment, or matches a configured pattern.
    pub fn is_blocked(&self, identity: &str) -> bool {
        self.exact.iter().any(|exact| exact == identity)
            || self.fragments.iter().any(|frag| identity.contains(frag))
            || self.patterns.iter().any(|re| re.is_match(identity))
    }
}
