//! Configuration loading from disk.
//!
//! # Responsibilities
//! - Read and deserialize the TOML server config
//! - Resolve the trap rules text (inline or file) and run the directive
//!   parser
//! - Turn every problem into a fatal, diagnosable startup error
//!
//! # Design Decisions
//! - A partially valid configuration is never used; the first error aborts
//!   startup
//! - Rule problems surface with their directive-block line number

use std::path::Path;

use thiserror::Error;

use crate::config::directive::{self, DirectiveError};
use crate::config::schema::ServerConfig;
use crate::rules::RuleSet;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config or rules file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Neither `trap.rules` nor `trap.rules_file` is set.
    #[error("no trap rules configured: set trap.rules or trap.rules_file")]
    MissingRules,

    /// Both `trap.rules` and `trap.rules_file` are set.
    #[error("ambiguous trap rules: set only one of trap.rules and trap.rules_file")]
    AmbiguousRules,

    /// The directive block failed to parse or compile.
    #[error("invalid trap rules: {0}")]
    Directive(#[from] DirectiveError),
}

/// Load the server configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

impl ServerConfig {
    /// Resolve the rules source and build the frozen rule set.
    pub fn build_ruleset(&self) -> Result<RuleSet, ConfigError> {
        let text = match (&self.trap.rules, &self.trap.rules_file) {
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousRules),
            (Some(inline), None) => inline.clone(),
            (None, Some(file)) => {
                std::fs::read_to_string(file).map_err(|source| ConfigError::Io {
                    path: file.clone(),
                    source,
                })?
            }
            (None, None) => return Err(ConfigError::MissingRules),
        };
        Ok(directive::parse(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_rules(rules: &str) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.trap.rules = Some(rules.to_string());
        config
    }

    #[test]
    fn test_inline_rules() {
        let config = config_with_rules("trap 1G {\n    BadBot\n}\n");
        let rules = config.build_ruleset().unwrap();
        assert_eq!(rules.bomb, "1G");
        assert!(rules.is_blocked("BadBot"));
    }

    #[test]
    fn test_rules_file() {
        let path = std::env::temp_dir().join("crawler-trap-loader-test.conf");
        std::fs::write(&path, "trap 10G {\n    showHits\n}\n").unwrap();

        let mut config = ServerConfig::default();
        config.trap.rules_file = Some(path.display().to_string());
        let rules = config.build_ruleset().unwrap();
        assert_eq!(rules.bomb, "10G");
        assert!(rules.show_hits);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_rules_is_fatal() {
        let config = ServerConfig::default();
        assert!(matches!(
            config.build_ruleset(),
            Err(ConfigError::MissingRules)
        ));
    }

    #[test]
    fn test_ambiguous_rules_is_fatal() {
        let mut config = config_with_rules("trap 1G {\n}\n");
        config.trap.rules_file = Some("/tmp/unused.conf".to_string());
        assert!(matches!(
            config.build_ruleset(),
            Err(ConfigError::AmbiguousRules)
        ));
    }

    #[test]
    fn test_unreadable_rules_file_is_fatal() {
        let mut config = ServerConfig::default();
        config.trap.rules_file = Some("/no/such/rules.conf".to_string());
        assert!(matches!(config.build_ruleset(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_directive_error_carries_line() {
        let config = config_with_rules("trap 1G {\n    regexp [broken\n}\n");
        let err = config.build_ruleset().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
