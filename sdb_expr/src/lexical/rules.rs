//! Ordered token rule table
//!
//! Rules are tried in table order at the current scan position and the first
//! match wins. Order is load-bearing: multi-character operators and the hex
//! prefix must come before the shorter patterns that would otherwise claim
//! their first character.

use crate::lexical::LexerError;
use crate::logging::codes;
use crate::tokens::TokenKind;
use regex::Regex;
use std::sync::OnceLock;

/// A pattern and the token kind it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: &'static str,
    pub kind: TokenKind,
}

/// The rule table.
///
/// The register alternation lists `s1[01]` ahead of `s[0-9]`: alternation is
/// leftmost-first, and `$s10` must not stop after `$s1`.
pub const RULES: [Rule; 13] = [
    Rule {
        pattern: r"[ \t\r\n]+",
        kind: TokenKind::Whitespace,
    },
    Rule {
        pattern: r"\+",
        kind: TokenKind::Plus,
    },
    Rule {
        pattern: r"==",
        kind: TokenKind::Eq,
    },
    Rule {
        pattern: r"-",
        kind: TokenKind::Minus,
    },
    Rule {
        pattern: r"\*",
        kind: TokenKind::Star,
    },
    Rule {
        pattern: r"/",
        kind: TokenKind::Slash,
    },
    Rule {
        pattern: r"\(",
        kind: TokenKind::LParen,
    },
    Rule {
        pattern: r"\)",
        kind: TokenKind::RParen,
    },
    Rule {
        pattern: r"0x[0-9a-fA-F]+",
        kind: TokenKind::Hex,
    },
    Rule {
        pattern: r"[0-9]+",
        kind: TokenKind::Uint,
    },
    Rule {
        pattern: r"!=",
        kind: TokenKind::Ne,
    },
    Rule {
        pattern: r"&&",
        kind: TokenKind::And,
    },
    Rule {
        pattern: r"\$(\$0|ra|sp|gp|tp|t[0-6]|s1[01]|s[0-9]|a[0-7])",
        kind: TokenKind::Register,
    },
];

/// A rule with its anchored regex
#[derive(Debug)]
pub struct CompiledRule {
    pub index: usize,
    pub rule: Rule,
    regex: Regex,
}

impl CompiledRule {
    fn compile(index: usize, rule: Rule) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})", rule.pattern))?;
        Ok(Self { index, rule, regex })
    }

    /// Length of the match starting exactly at the beginning of `input`.
    /// Empty matches do not count, so every accepted match makes progress.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.regex
            .find(input)
            .filter(|m| m.start() == 0 && m.end() > m.start())
            .map(|m| m.end())
    }
}

static COMPILED_RULES: OnceLock<Result<Vec<CompiledRule>, String>> = OnceLock::new();

/// The compiled rule table, built on first use and shared read-only after.
pub fn compiled_rules() -> Result<&'static [CompiledRule], LexerError> {
    let compiled = COMPILED_RULES.get_or_init(|| {
        RULES
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                CompiledRule::compile(index, *rule).map_err(|e| {
                    format!("rule {} ({}) failed to compile: {}", index, rule.pattern, e)
                })
            })
            .collect()
    });

    match compiled {
        Ok(rules) => Ok(rules.as_slice()),
        Err(message) => Err(LexerError::RuleTableUnavailable {
            message: message.clone(),
        }),
    }
}

/// Compile the rule table eagerly, logging the outcome.
/// Returns the number of rules compiled.
pub fn init_rules() -> Result<usize, LexerError> {
    match compiled_rules() {
        Ok(rules) => {
            crate::log_success!(
                codes::success::RULE_TABLE_COMPILED,
                "Token rule table compiled",
                "rule_count" => rules.len()
            );
            Ok(rules.len())
        }
        Err(error) => {
            crate::log_error!(error.error_code(), &error.to_string());
            Err(error)
        }
    }
}
