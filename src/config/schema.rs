//! Configuration schema definitions.
//!
//! This module defines the server-level configuration structure. All types
//! derive Serde traits for deserialization from a TOML file, and every
//! section has defaults so a minimal config stays minimal.
//!
//! The trap *rules* themselves use the directive-block grammar (see
//! [`crate::config::directive`]); the TOML file only says where that text
//! lives.

use serde::{Deserialize, Serialize};

/// Root configuration for the trap proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream the allowed traffic is forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Trap rules source.
    pub trap: TrapConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Address of the next pipeline stage (host:port).
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Overall request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "crawler_trap=info,tower_http=info".to_string(),
        }
    }
}

/// Where the trap rules come from. Exactly one of the two fields must be
/// set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrapConfig {
    /// Inline directive block.
    pub rules: Option<String>,

    /// Path to a file containing the directive block.
    pub rules_file: Option<String>,
}
