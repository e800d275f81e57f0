//! Process lifecycle.
//!
//! # Design Decisions
//! - One shutdown coordinator owned by `main`; the server and any helper
//!   tasks observe it rather than installing their own signal handlers
//! - Tests drive the same mechanism to stop servers deterministically

pub mod shutdown;

pub use shutdown::Shutdown;
