//! Crawler Trap Reverse Proxy Library
//!
//! A small reverse proxy whose request-filter stage classifies clients by
//! their declared `User-Agent` and serves trapped clients a precompressed
//! decoy payload instead of forwarding them upstream.

pub mod bombs;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rules;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rules::RuleSet;
