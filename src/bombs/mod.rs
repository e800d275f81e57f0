//! Decoy payload storage and retrieval.
//!
//! # Data Flow
//! ```text
//! build.rs (gzip generation at build time)
//!     → registry.rs (embedded name → blob mapping)
//!     → resolver.rs (registry lookup, else filesystem read)
//!     → http::bomb (response framing)
//! ```
//!
//! # Design Decisions
//! - Payloads are compressed once, at build time; request handling only
//!   moves bytes
//! - Registry blobs are `'static`, shared by all requests without copying
//! - All resolution failures collapse into one opaque error so responses
//!   cannot leak whether a name missed the registry or the filesystem

pub mod registry;
pub mod resolver;

pub use resolver::{resolve, ResolveError};
