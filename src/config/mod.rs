//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → ServerConfig (validated, immutable)
//!
//! trap rules text (inline or rules_file)
//!     → directive.rs (tokenize, parse, compile patterns)
//!     → RuleSet (frozen, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All TOML fields have defaults to allow minimal configs
//! - Every rules problem is a startup failure with a line number; no rule
//!   error can surface at request time

pub mod directive;
pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::ServerConfig;
