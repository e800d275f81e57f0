//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing`; the subscriber is installed
//!   once by the host process, and trap outcome events (hit, miss,
//!   exempt) are emitted conditionally per the rule set's show flags
//! - `RUST_LOG` overrides the configured default filter

pub mod logging;
