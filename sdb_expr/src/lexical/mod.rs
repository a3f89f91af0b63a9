//! Lexical analysis module
//!
//! Converts expression text into a [`TokenSequence`] using the ordered rule
//! table in [`rules`].

pub mod analyzer;
pub mod rules;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenSequence;

pub use analyzer::{classify_operand_position, LexerError, LexicalAnalyzer, LexicalMetrics};
pub use rules::{Rule, RULES};

// ============================================================================
// MODULE API
// ============================================================================

/// Tokenize expression text with default preferences
pub fn tokenize(text: &str) -> Result<TokenSequence, LexerError> {
    let mut analyzer = LexicalAnalyzer::new();
    analyzer.tokenize(text)
}

/// Tokenize with custom runtime preferences (limits remain compile-time)
pub fn tokenize_with_preferences(
    text: &str,
    preferences: LexicalPreferences,
) -> Result<TokenSequence, LexerError> {
    let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
    analyzer.tokenize(text)
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

const LEXICAL_CODES: [crate::logging::Code; 5] = [
    crate::logging::codes::lexical::NO_MATCHING_RULE,
    crate::logging::codes::lexical::TOO_MANY_TOKENS,
    crate::logging::codes::lexical::TOKEN_TOO_LONG,
    crate::logging::codes::lexical::EXPRESSION_TOO_LONG,
    crate::logging::codes::lexical::RULE_TABLE_UNAVAILABLE,
];

/// Initialize lexical analysis (for system startup).
/// Validates error codes and compiles the rule table.
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    for code in &LEXICAL_CODES {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    rules::init_rules().map_err(|e| e.to_string())?;

    let limits = get_lexical_limits();
    crate::log_debug!("Lexical limits initialized",
        "max_expression_length" => limits.max_expression_length,
        "max_token_count" => limits.max_token_count,
        "max_token_text_length" => limits.max_token_text_length
    );

    Ok(())
}

/// Validate basic tokenization functionality and limits
pub fn validate_tokenization() -> Result<(), String> {
    for code in &LEXICAL_CODES {
        if crate::logging::codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!(
                "Lexical error code {} has no description",
                code.as_str()
            ));
        }
    }

    if MAX_TOKEN_COUNT == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    // Every register name, including the sigil, must fit
    if MAX_TOKEN_TEXT_LENGTH < 4 {
        return Err("MAX_TOKEN_TEXT_LENGTH too small for register names".to_string());
    }

    let tokens = tokenize("(0x1 + 2) * $sp").map_err(|e| e.to_string())?;
    if tokens.len() != 7 {
        return Err(format!(
            "Tokenization self-check produced {} tokens, expected 7",
            tokens.len()
        ));
    }

    Ok(())
}

/// Get the current compile-time limits (for reporting/debugging)
pub fn get_lexical_limits() -> LexicalLimits {
    LexicalLimits {
        max_expression_length: MAX_EXPRESSION_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
        max_token_text_length: MAX_TOKEN_TEXT_LENGTH,
    }
}

/// Information about compile-time lexical limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalLimits {
    pub max_expression_length: usize,
    pub max_token_count: usize,
    pub max_token_text_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    #[test]
    fn test_init_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_validate_tokenization() {
        assert!(validate_tokenization().is_ok());
    }

    #[test]
    fn test_limits() {
        let limits = get_lexical_limits();
        assert_eq!(limits.max_token_count, MAX_TOKEN_COUNT);
        assert!(limits.max_token_text_length >= 4);
    }

    #[test]
    fn test_tokenize_with_preferences() {
        let preferences = LexicalPreferences {
            trace_rule_matches: true,
            ..Default::default()
        };
        let tokens = tokenize_with_preferences("1==1&&2!=3", preferences).unwrap();
        assert_eq!(
            tokens.kinds(),
            vec![
                TokenKind::Uint,
                TokenKind::Eq,
                TokenKind::Uint,
                TokenKind::And,
                TokenKind::Uint,
                TokenKind::Ne,
                TokenKind::Uint
            ]
        );
    }

    #[test]
    fn test_tokenization_is_repeatable() {
        assert_eq!(tokenize("2+3*4").unwrap(), tokenize("2+3*4").unwrap());
    }
}
