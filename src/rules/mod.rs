//! Blocking rules subsystem.
//!
//! # Data Flow
//! ```text
//! directive block (config::directive)
//!     → RuleSetBuilder (accumulates, compiles patterns)
//!     → RuleSet (immutable, shared via Arc)
//!     → engine.rs predicates (per-request, pure)
//! ```
//!
//! # Design Decisions
//! - Pattern compilation happens exactly once, at configuration time; a
//!   malformed pattern can never surface as a per-request failure
//! - The frozen RuleSet is read-only and lock-free under concurrency
//! - Matching is case-sensitive with no normalization; real crawler
//!   identity strings are matched exactly as configured

pub mod engine;
pub mod ruleset;

pub use ruleset::{RuleCounts, RuleSet, RuleSetBuilder};
