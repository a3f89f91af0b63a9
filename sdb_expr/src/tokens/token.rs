//! Token kinds produced by the rule table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of token the rule table can produce, plus the two unary
/// kinds that only arise from reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Run of spaces; never stored in a token sequence
    Whitespace,
    /// Decimal integer literal
    Uint,
    /// `0x`-prefixed hexadecimal literal
    Hex,
    /// `$`-prefixed CPU register reference
    Register,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eq,
    Ne,
    And,
    /// Unary `*`, pointer dereference
    Deref,
    /// Unary `-`, arithmetic negation
    Neg,
}

/// Coarse token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenClass {
    Operand,
    BinaryOperator,
    UnaryOperator,
    Grouping,
    Whitespace,
}

impl TokenKind {
    pub fn class(&self) -> TokenClass {
        match self {
            TokenKind::Uint | TokenKind::Hex | TokenKind::Register => TokenClass::Operand,
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::Ne
            | TokenKind::And => TokenClass::BinaryOperator,
            TokenKind::Deref | TokenKind::Neg => TokenClass::UnaryOperator,
            TokenKind::LParen | TokenKind::RParen => TokenClass::Grouping,
            TokenKind::Whitespace => TokenClass::Whitespace,
        }
    }

    /// Literal and register kinds keep the matched text
    pub fn captures_text(&self) -> bool {
        self.class() == TokenClass::Operand
    }

    /// Whether a `*` or `-` following this token is unary.
    ///
    /// Only the binary operators and `(` qualify. The unary kinds do not,
    /// so `--3` tokenizes as `Neg Minus Uint`.
    pub fn starts_operand_position(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::LParen
                | TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::And
        )
    }

    /// Source symbol for operator and grouping kinds
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            TokenKind::Plus => Some("+"),
            TokenKind::Minus | TokenKind::Neg => Some("-"),
            TokenKind::Star | TokenKind::Deref => Some("*"),
            TokenKind::Slash => Some("/"),
            TokenKind::LParen => Some("("),
            TokenKind::RParen => Some(")"),
            TokenKind::Eq => Some("=="),
            TokenKind::Ne => Some("!="),
            TokenKind::And => Some("&&"),
            TokenKind::Whitespace | TokenKind::Uint | TokenKind::Hex | TokenKind::Register => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Uint => "decimal",
            TokenKind::Hex => "hex",
            TokenKind::Register => "register",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Star => "multiply",
            TokenKind::Slash => "divide",
            TokenKind::LParen => "left paren",
            TokenKind::RParen => "right paren",
            TokenKind::Eq => "equal",
            TokenKind::Ne => "not equal",
            TokenKind::And => "logical and",
            TokenKind::Deref => "dereference",
            TokenKind::Neg => "negate",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized token. Operand kinds carry their source text verbatim
/// (including the `$` sigil and `0x` prefix); other kinds carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, text: None }
    }

    pub fn with_text(kind: TokenKind, text: &str) -> Self {
        Self {
            kind,
            text: Some(text.to_string()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, self.kind.symbol()) {
            (Some(text), _) => write!(f, "{}({})", self.kind, text),
            (None, Some(symbol)) => write!(f, "{}({})", self.kind, symbol),
            (None, None) => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert_eq!(TokenKind::Hex.class(), TokenClass::Operand);
        assert_eq!(TokenKind::And.class(), TokenClass::BinaryOperator);
        assert_eq!(TokenKind::Neg.class(), TokenClass::UnaryOperator);
        assert_eq!(TokenKind::RParen.class(), TokenClass::Grouping);
        assert!(TokenKind::Register.captures_text());
        assert!(!TokenKind::Plus.captures_text());
    }

    #[test]
    fn test_operand_position_excludes_unary_kinds() {
        assert!(TokenKind::LParen.starts_operand_position());
        assert!(TokenKind::And.starts_operand_position());
        assert!(!TokenKind::Neg.starts_operand_position());
        assert!(!TokenKind::Deref.starts_operand_position());
        assert!(!TokenKind::RParen.starts_operand_position());
        assert!(!TokenKind::Uint.starts_operand_position());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::with_text(TokenKind::Uint, "12").to_string(), "decimal(12)");
        assert_eq!(Token::new(TokenKind::Deref).to_string(), "dereference(*)");
        assert_eq!(Token::new(TokenKind::Whitespace).to_string(), "whitespace");
    }
}
