//! Trap directive-block parser.
//!
//! # Responsibilities
//! - Parse the textual rules block into a frozen [`RuleSet`]
//! - Compile patterns during parsing so bad ones fail startup
//! - Report every error with its 1-based source line
//!
//! # Grammar
//! ```text
//! trap <payload-reference> {
//!     regexp <pattern>      # identity-matching pattern
//!     contains <fragment>   # identity substring to block on
//!     public <pattern>      # path-exemption pattern
//!     showHits              # log blocked requests
//!     showMisses            # log allowed requests
//!     showPublic            # log exempt-path requests
//!     <bare-token>          # exact identity string to block
//! }
//! ```
//!
//! Tokens are whitespace-separated; double quotes group tokens containing
//! spaces; `#` starts a comment outside quotes. Exactly one block per
//! document.

use thiserror::Error;

use crate::rules::{RuleSet, RuleSetBuilder};

/// Parse failure, fatal at startup.
#[derive(Debug, Error)]
pub enum DirectiveError {
    /// The document contains no directive block.
    #[error("no trap directive found")]
    MissingDirective,

    /// The leading token is not the trap directive.
    #[error("line {line}: unknown directive '{token}', expected 'trap'")]
    UnknownDirective {
        /// Source line.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// The directive line lacks a payload reference.
    #[error("line {line}: expected payload reference after 'trap'")]
    MissingPayload {
        /// Source line.
        line: usize,
    },

    /// The directive line lacks the opening brace.
    #[error("line {line}: expected '{{' to open the trap block")]
    ExpectedBlock {
        /// Source line.
        line: usize,
    },

    /// A keyword is missing its argument.
    #[error("line {line}: expected argument for '{keyword}'")]
    MissingArgument {
        /// Source line.
        line: usize,
        /// Keyword that needed an argument.
        keyword: String,
    },

    /// A keyword received an empty argument, which would match everything.
    #[error("line {line}: argument for '{keyword}' must not be empty")]
    EmptyArgument {
        /// Source line.
        line: usize,
        /// Keyword with the empty argument.
        keyword: String,
    },

    /// A pattern failed to compile.
    #[error("line {line}: invalid regular expression: {source}")]
    InvalidPattern {
        /// Source line.
        line: usize,
        /// Compilation failure.
        source: regex::Error,
    },

    /// A line carries more tokens than its form allows.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken {
        /// Source line.
        line: usize,
        /// First surplus token.
        token: String,
    },

    /// A quoted token never closed.
    #[error("line {line}: unterminated quoted token")]
    UnterminatedQuote {
        /// Source line.
        line: usize,
    },

    /// The block never closed.
    #[error("line {line}: unterminated trap block (missing '}}')")]
    UnterminatedBlock {
        /// Line where the block opened.
        line: usize,
    },

    /// Content follows the closing brace.
    #[error("line {line}: unexpected content after trap block")]
    TrailingContent {
        /// Source line.
        line: usize,
    },
}

/// Parse one trap directive block into a frozen rule set.
pub fn parse(input: &str) -> Result<RuleSet, DirectiveError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(idx, raw)| Ok((idx + 1, tokenize(raw, idx + 1)?)))
        .collect::<Result<Vec<_>, DirectiveError>>()?
        .into_iter()
        .filter(|(_, tokens)| !tokens.is_empty());

    let (open_line, header) = lines.next().ok_or(DirectiveError::MissingDirective)?;
    let mut header = header.into_iter();

    match header.next() {
        Some(name) if name == "trap" => {}
        Some(name) => {
            return Err(DirectiveError::UnknownDirective {
                line: open_line,
                token: name,
            })
        }
        None => return Err(DirectiveError::MissingDirective),
    }

    let bomb = header
        .next()
        .filter(|reference| !reference.is_empty())
        .ok_or(DirectiveError::MissingPayload { line: open_line })?;
    match header.next() {
        Some(brace) if brace == "{" => {}
        _ => return Err(DirectiveError::ExpectedBlock { line: open_line }),
    }
    if let Some(extra) = header.next() {
        return Err(DirectiveError::UnexpectedToken {
            line: open_line,
            token: extra,
        });
    }

    let mut builder = RuleSet::builder().bomb(bomb);
    let mut closed = false;
    for (line, tokens) in lines {
        if closed {
            return Err(DirectiveError::TrailingContent { line });
        }
        let mut tokens = tokens.into_iter();
        let first = tokens.next().unwrap_or_default();
        if first == "}" {
            if tokens.next().is_some() {
                return Err(DirectiveError::TrailingContent { line });
            }
            closed = true;
            continue;
        }

        builder = parse_entry(builder, line, &first, &mut tokens)?;
        if let Some(extra) = tokens.next() {
            return Err(DirectiveError::UnexpectedToken { line, token: extra });
        }
    }

    if !closed {
        return Err(DirectiveError::UnterminatedBlock { line: open_line });
    }
    Ok(builder.build())
}

fn parse_entry(
    builder: RuleSetBuilder,
    line: usize,
    keyword: &str,
    rest: &mut impl Iterator<Item = String>,
) -> Result<RuleSetBuilder, DirectiveError> {
    let mut argument = |keyword: &str| {
        let arg = rest.next().ok_or_else(|| DirectiveError::MissingArgument {
            line,
            keyword: keyword.to_owned(),
        })?;
        if arg.is_empty() {
            return Err(DirectiveError::EmptyArgument {
                line,
                keyword: keyword.to_owned(),
            });
        }
        Ok(arg)
    };

    match keyword {
        "regexp" => {
            let pattern = argument("regexp")?;
            builder
                .pattern(&pattern)
                .map_err(|source| DirectiveError::InvalidPattern { line, source })
        }
        "public" => {
            let pattern = argument("public")?;
            builder
                .public(&pattern)
                .map_err(|source| DirectiveError::InvalidPattern { line, source })
        }
        "contains" => Ok(builder.fragment(argument("contains")?)),
        "showHits" => Ok(builder.show_hits()),
        "showMisses" => Ok(builder.show_misses()),
        "showPublic" => Ok(builder.show_public()),
        // Any other token is an exact identity to block, quoted or bare.
        exact => Ok(builder.exact(exact)),
    }
}

/// Split one source line into tokens, honoring double quotes and `#`
/// comments.
fn tokenize(raw: &str, line: usize) -> Result<Vec<String>, DirectiveError> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '#' {
            break;
        } else if c == '"' {
            chars.next();
            let mut token = String::new();
            let mut terminated = false;
            for c in chars.by_ref() {
                if c == '"' {
                    terminated = true;
                    break;
                }
                token.push(c);
            }
            if !terminated {
                return Err(DirectiveError::UnterminatedQuote { line });
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '#' {
                    break;
                }
                token.push(c);
                chars.next();
            }
            tokens.push(token);
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_directive() {
        let rules = parse(
            r#"
            # block the usual suspects
            trap 1G {
                regexp [Bb]ot
                contains crawler
                public ^/public
                showHits
                showMisses
                showPublic
                BadBot
                "Mozilla/5.0 (compatible; EvilScraper/1.0)"
            }
            "#,
        )
        .unwrap();

        assert_eq!(rules.bomb, "1G");
        assert!(rules.is_blocked("GoogleBot"));
        assert!(rules.is_blocked("web crawler v3"));
        assert!(rules.is_blocked("BadBot"));
        assert!(rules.is_blocked("Mozilla/5.0 (compatible; EvilScraper/1.0)"));
        assert!(!rules.is_blocked("NiceBrowser"));
        assert!(rules.is_path_exempt("/public/index.html"));
        assert!(rules.show_hits && rules.show_misses && rules.show_public);
    }

    #[test]
    fn test_minimal_directive() {
        let rules = parse("trap 1M {\n}\n").unwrap();
        assert_eq!(rules.bomb, "1M");
        assert!(!rules.is_blocked("anything"));
        assert!(!rules.is_path_exempt("/anything"));
        assert!(!rules.show_hits);
    }

    #[test]
    fn test_file_path_payload() {
        let rules = parse("trap /srv/bombs/custom.gz {\n}\n").unwrap();
        assert_eq!(rules.bomb, "/srv/bombs/custom.gz");
    }

    #[test]
    fn test_missing_directive() {
        assert!(matches!(parse(""), Err(DirectiveError::MissingDirective)));
        assert!(matches!(
            parse("# only comments\n\n"),
            Err(DirectiveError::MissingDirective)
        ));
    }

    #[test]
    fn test_unknown_directive_name() {
        let err = parse("blocklist 1G {\n}\n").unwrap_err();
        assert!(
            matches!(err, DirectiveError::UnknownDirective { line: 1, ref token } if token == "blocklist")
        );
    }

    #[test]
    fn test_missing_payload_reference() {
        let err = parse("trap\n").unwrap_err();
        assert!(matches!(err, DirectiveError::MissingPayload { line: 1 }));
    }

    #[test]
    fn test_missing_block() {
        let err = parse("trap 1G\n").unwrap_err();
        assert!(matches!(err, DirectiveError::ExpectedBlock { line: 1 }));
    }

    #[test]
    fn test_missing_keyword_argument() {
        let err = parse("trap 1G {\n    regexp\n}\n").unwrap_err();
        assert!(
            matches!(err, DirectiveError::MissingArgument { line: 2, ref keyword } if keyword == "regexp")
        );
    }

    #[test]
    fn test_invalid_pattern_reports_line() {
        let err = parse("trap 1G {\n    BadBot\n    regexp [unclosed\n}\n").unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidPattern { line: 3, .. }));

        let err = parse("trap 1G {\n    public (broken\n}\n").unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidPattern { line: 2, .. }));
    }

    #[test]
    fn test_empty_fragment_rejected() {
        let err = parse("trap 1G {\n    contains \"\"\n}\n").unwrap_err();
        assert!(
            matches!(err, DirectiveError::EmptyArgument { line: 2, ref keyword } if keyword == "contains")
        );
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse("trap 1G {\n    BadBot\n").unwrap_err();
        assert!(matches!(err, DirectiveError::UnterminatedBlock { line: 1 }));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("trap 1G {\n    \"EvilBot\n}\n").unwrap_err();
        assert!(matches!(err, DirectiveError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn test_trailing_content_rejected() {
        let err = parse("trap 1G {\n}\ntrap 10G {\n}\n").unwrap_err();
        assert!(matches!(err, DirectiveError::TrailingContent { line: 3 }));
    }

    #[test]
    fn test_flag_lines_take_no_argument() {
        let err = parse("trap 1G {\n    showHits verbose\n}\n").unwrap_err();
        assert!(
            matches!(err, DirectiveError::UnexpectedToken { line: 2, ref token } if token == "verbose")
        );
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let rules = parse(
            "# header comment\n\ntrap 1M { # trailing comment\n\n    BadBot # why not\n}\n",
        )
        .unwrap();
        assert!(rules.is_blocked("BadBot"));
    }
}
