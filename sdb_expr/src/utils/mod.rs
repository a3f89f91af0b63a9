//! Shared primitive types used by the lexer and evaluator.

pub mod span;

pub use span::{caret_diagnostic, Span, Spanned};
