//! Token system for expression lexical analysis
//!
//! The lexer turns expression text into a [`TokenSequence`]: an owned list
//! of [`Token`]s, each tagged with a [`TokenKind`] and the byte [`Span`] it
//! came from. Whitespace is recognized but never stored.
//!
//! `*` and `-` are produced as [`TokenKind::Star`] and [`TokenKind::Minus`]
//! and reclassified to [`TokenKind::Deref`] and [`TokenKind::Neg`] at append
//! time when they sit in operand position.

pub mod token;
pub mod token_sequence;

pub use token::{Token, TokenClass, TokenKind};
pub use token_sequence::{SpannedToken, TokenSequence};

// Re-export span types from utils
pub use crate::utils::{Span, Spanned};
