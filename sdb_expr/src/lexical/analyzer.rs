//! Core lexical analyzer implementation
//!
//! Scans expression text with the ordered rule table, drops whitespace,
//! reclassifies `*` and `-` in operand position, and enforces the
//! compile-time size limits.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::lexical::rules;
use crate::logging::codes;
use crate::tokens::{Token, TokenClass, TokenKind, TokenSequence};
use crate::utils::{caret_diagnostic, Span, Spanned};
use crate::{log_debug, log_error, log_success};

/// Lexical analysis errors. Every variant is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("No match at position {position}")]
    NoMatchingRule { position: usize, remaining: String },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Token text too long: {length} characters at position {position} (max {MAX_TOKEN_TEXT_LENGTH})")]
    TokenTooLong { length: usize, position: usize },

    #[error("Expression too long: {length} bytes (max {MAX_EXPRESSION_LENGTH})")]
    ExpressionTooLong { length: usize },

    #[error("Token rule table unavailable: {message}")]
    RuleTableUnavailable { message: String },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::NoMatchingRule { .. } => codes::lexical::NO_MATCHING_RULE,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
            LexerError::ExpressionTooLong { .. } => codes::lexical::EXPRESSION_TOO_LONG,
            LexerError::RuleTableUnavailable { .. } => codes::lexical::RULE_TABLE_UNAVAILABLE,
        }
    }

    /// Source location of the failure, when it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            LexerError::NoMatchingRule {
                position,
                remaining,
            } => {
                let width = remaining.chars().next().map(char::len_utf8).unwrap_or(0);
                Some(Span::new(*position, position + width))
            }
            LexerError::TokenTooLong { length, position } => {
                Some(Span::new(*position, position + length))
            }
            _ => None,
        }
    }

    /// The error message, followed by the source and a caret when the error
    /// has a location.
    pub fn diagnostic(&self, source: &str) -> String {
        match self.span() {
            Some(span) => caret_diagnostic(source, span, &self.to_string()),
            None => self.to_string(),
        }
    }
}

/// Turn `*`/`-` into their unary kinds when they open an operand: at the
/// start of the sequence or right after a binary operator or `(`.
pub fn classify_operand_position(kind: TokenKind, previous: Option<TokenKind>) -> TokenKind {
    let operand_position = previous.map_or(true, |prev| prev.starts_operand_position());

    match kind {
        TokenKind::Star if operand_position => TokenKind::Deref,
        TokenKind::Minus if operand_position => TokenKind::Neg,
        other => other,
    }
}

/// Lexical analysis metrics for one tokenization
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub operand_tokens: usize,
    pub operator_tokens: usize,
    pub grouping_tokens: usize,
    pub register_tokens: usize,
    pub whitespace_runs: usize,
    pub unary_reclassifications: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, kind: TokenKind, reclassified: bool) {
        self.total_tokens += 1;

        match kind.class() {
            TokenClass::Operand => {
                self.operand_tokens += 1;
                if kind == TokenKind::Register {
                    self.register_tokens += 1;
                }
            }
            TokenClass::BinaryOperator | TokenClass::UnaryOperator => self.operator_tokens += 1,
            TokenClass::Grouping => self.grouping_tokens += 1,
            TokenClass::Whitespace => {}
        }

        if reclassified {
            self.unary_reclassifications += 1;
        }
    }

    pub(crate) fn record_whitespace(&mut self) {
        self.whitespace_runs += 1;
    }
}

/// Rule-table lexical analyzer
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize expression text into a fresh token sequence
    pub fn tokenize(&mut self, text: &str) -> Result<TokenSequence, LexerError> {
        self.metrics = LexicalMetrics::default();

        if text.len() > MAX_EXPRESSION_LENGTH {
            let error = LexerError::ExpressionTooLong { length: text.len() };
            log_error!(error.error_code(), &error.to_string(),
                "length" => text.len(),
                "limit" => MAX_EXPRESSION_LENGTH
            );
            return Err(error);
        }

        let rule_table = match rules::compiled_rules() {
            Ok(rule_table) => rule_table,
            Err(error) => {
                log_error!(error.error_code(), &error.to_string());
                return Err(error);
            }
        };

        let mut tokens = TokenSequence::new();
        let mut position = 0;

        while position < text.len() {
            let remaining = &text[position..];

            let matched = rule_table
                .iter()
                .find_map(|rule| rule.match_len(remaining).map(|len| (rule, len)));

            let Some((rule, len)) = matched else {
                return Err(self.no_match(text, position));
            };

            if self.preferences.trace_rule_matches {
                log_debug!("Rule matched",
                    "rule" => rule.index,
                    "pattern" => rule.rule.pattern,
                    "position" => position,
                    "length" => len,
                    "text" => &remaining[..len]
                );
            }

            let span = Span::new(position, position + len);
            let matched_text = &remaining[..len];
            position += len;

            if rule.rule.kind == TokenKind::Whitespace {
                if self.preferences.collect_metrics {
                    self.metrics.record_whitespace();
                }
                continue;
            }

            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    span = span,
                    "limit" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }

            let kind = classify_operand_position(rule.rule.kind, tokens.last_kind());

            let token = if kind.captures_text() {
                if matched_text.len() > MAX_TOKEN_TEXT_LENGTH {
                    let error = LexerError::TokenTooLong {
                        length: matched_text.len(),
                        position: span.start,
                    };
                    log_error!(error.error_code(), &error.to_string(),
                        span = span,
                        "limit" => MAX_TOKEN_TEXT_LENGTH
                    );
                    return Err(error);
                }
                Token::with_text(kind, matched_text)
            } else {
                Token::new(kind)
            };

            if self.preferences.collect_metrics {
                self.metrics.record_token(kind, kind != rule.rule.kind);
            }

            tokens.push(Spanned::new(token, span));
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed",
            "token_count" => tokens.len(),
            "operators" => self.metrics.operator_tokens,
            "operands" => self.metrics.operand_tokens,
            "unary" => self.metrics.unary_reclassifications
        );

        Ok(tokens)
    }

    fn no_match(&self, text: &str, position: usize) -> LexerError {
        let error = LexerError::NoMatchingRule {
            position,
            remaining: text[position..].to_string(),
        };

        match (self.preferences.include_position_in_errors, error.span()) {
            (true, Some(span)) => {
                log_error!(error.error_code(), &error.diagnostic(text),
                    span = span,
                    "position" => position
                );
            }
            _ => {
                log_error!(error.error_code(), &error.to_string());
            }
        }

        error
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tokenize(text: &str) -> Result<TokenSequence, LexerError> {
        LexicalAnalyzer::new().tokenize(text)
    }

    #[test]
    fn test_simple_sum() {
        let tokens = tokenize("12+3").unwrap();

        assert_eq!(
            tokens.kinds(),
            vec![TokenKind::Uint, TokenKind::Plus, TokenKind::Uint]
        );
        assert_eq!(tokens.get(0).unwrap().value.text(), Some("12"));
        assert_eq!(tokens.get(1).unwrap().value.text(), None);
        assert_eq!(tokens.get(2).unwrap().value.text(), Some("3"));
        assert_eq!(tokens.get(2).unwrap().span, Span::new(3, 4));
    }

    #[test]
    fn test_whitespace_is_dropped() {
        let tokens = tokenize("  1 +\t2 ").unwrap();
        assert_eq!(tokens.len(), 3);

        assert!(tokenize("   ").unwrap().is_empty());
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_hex_literal_is_one_token() {
        let tokens = tokenize("0x1A").unwrap();
        assert_eq!(tokens.kinds(), vec![TokenKind::Hex]);
        assert_eq!(tokens.get(0).unwrap().value.text(), Some("0x1A"));
    }

    #[test]
    fn test_register_text_keeps_sigil() {
        let tokens = tokenize("$s10+$$0").unwrap();
        assert_eq!(
            tokens.kinds(),
            vec![TokenKind::Register, TokenKind::Plus, TokenKind::Register]
        );
        assert_eq!(tokens.get(0).unwrap().value.text(), Some("$s10"));
        assert_eq!(tokens.get(2).unwrap().value.text(), Some("$$0"));
    }

    #[test]
    fn test_leading_minus_is_negation() {
        assert_eq!(
            tokenize("-3").unwrap().kinds(),
            vec![TokenKind::Neg, TokenKind::Uint]
        );
        assert_eq!(
            tokenize("4-3").unwrap().kinds(),
            vec![TokenKind::Uint, TokenKind::Minus, TokenKind::Uint]
        );
    }

    #[test]
    fn test_star_after_operator_is_dereference() {
        assert_eq!(
            tokenize("2**$sp").unwrap().kinds(),
            vec![
                TokenKind::Uint,
                TokenKind::Star,
                TokenKind::Deref,
                TokenKind::Register
            ]
        );
        assert_eq!(
            tokenize("(*$sp)*2").unwrap().kinds(),
            vec![
                TokenKind::LParen,
                TokenKind::Deref,
                TokenKind::Register,
                TokenKind::RParen,
                TokenKind::Star,
                TokenKind::Uint
            ]
        );
    }

    #[test]
    fn test_unary_after_unary_stays_binary() {
        assert_eq!(
            tokenize("--3").unwrap().kinds(),
            vec![TokenKind::Neg, TokenKind::Minus, TokenKind::Uint]
        );
    }

    #[test]
    fn test_classify_operand_position() {
        assert_eq!(classify_operand_position(TokenKind::Minus, None), TokenKind::Neg);
        assert_eq!(
            classify_operand_position(TokenKind::Star, Some(TokenKind::Ne)),
            TokenKind::Deref
        );
        assert_eq!(
            classify_operand_position(TokenKind::Minus, Some(TokenKind::RParen)),
            TokenKind::Minus
        );
        assert_eq!(
            classify_operand_position(TokenKind::Plus, None),
            TokenKind::Plus
        );
    }

    #[test]
    fn test_unrecognized_character() {
        let error = tokenize("1 @ 2").unwrap_err();
        assert_matches!(error, LexerError::NoMatchingRule { position: 2, .. });
        assert_eq!(error.span(), Some(Span::new(2, 3)));
        assert_eq!(error.diagnostic("1 @ 2"), "No match at position 2\n1 @ 2\n  ^");

        assert_matches!(tokenize("@"), Err(LexerError::NoMatchingRule { position: 0, .. }));
    }

    #[test]
    fn test_error_messages_are_capitalised() {
        let errors = [
            LexerError::NoMatchingRule {
                position: 0,
                remaining: "@".to_string(),
            },
            LexerError::TooManyTokens { count: 2 },
            LexerError::TokenTooLong {
                length: 2,
                position: 0,
            },
            LexerError::ExpressionTooLong { length: 2 },
            LexerError::RuleTableUnavailable {
                message: "bad pattern".to_string(),
            },
        ];

        for error in errors {
            let message = error.to_string();
            assert!(message.starts_with(char::is_uppercase), "{}", message);
        }
    }

    #[test]
    fn test_partial_operators_do_not_match() {
        assert_matches!(tokenize("1=1"), Err(LexerError::NoMatchingRule { position: 1, .. }));
        assert_matches!(tokenize("1&1"), Err(LexerError::NoMatchingRule { position: 1, .. }));
        assert_matches!(tokenize("$pc"), Err(LexerError::NoMatchingRule { position: 0, .. }));
    }

    #[test]
    fn test_token_count_limit() {
        let text = vec!["1"; MAX_TOKEN_COUNT / 2 + 1].join("+");
        let error = tokenize(&text).unwrap_err();
        assert_matches!(error, LexerError::TooManyTokens { count } if count == MAX_TOKEN_COUNT + 1);

        let text = vec!["1"; MAX_TOKEN_COUNT / 2].join("+");
        assert_eq!(tokenize(&text).unwrap().len(), MAX_TOKEN_COUNT - 1);
    }

    #[test]
    fn test_token_text_limit() {
        let literal = "9".repeat(MAX_TOKEN_TEXT_LENGTH + 1);
        let error = tokenize(&format!("1+{}", literal)).unwrap_err();
        assert_matches!(error, LexerError::TokenTooLong { position: 2, .. });
    }

    #[test]
    fn test_expression_length_limit() {
        let text = " ".repeat(MAX_EXPRESSION_LENGTH + 1);
        assert_matches!(tokenize(&text), Err(LexerError::ExpressionTooLong { .. }));
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("-(1 + $sp) * 2").unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 8);
        assert_eq!(metrics.operand_tokens, 3);
        assert_eq!(metrics.register_tokens, 1);
        assert_eq!(metrics.operator_tokens, 3);
        assert_eq!(metrics.grouping_tokens, 2);
        assert_eq!(metrics.unary_reclassifications, 1);
        assert_eq!(metrics.whitespace_runs, 4);
    }

    #[test]
    fn test_metrics_can_be_disabled() {
        let preferences = LexicalPreferences {
            collect_metrics: false,
            ..Default::default()
        };
        let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
        analyzer.tokenize("1+2").unwrap();
        assert_eq!(analyzer.metrics(), &LexicalMetrics::default());
    }
}
