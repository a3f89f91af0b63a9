//! Source location tracking for expressions
//!
//! Expressions are single-line, so locations are byte offsets into the
//! expression text. Offsets double as the column for caret diagnostics.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` in the expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Zero-width span at a position
    pub fn point(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the covered text out of the source, if in bounds
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A value paired with its source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Transform the inner value while keeping the span
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Spanned<U> {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }
}

/// Render a diagnostic with the source line and a caret under the span.
///
/// ```text
/// No match at position 2
/// 1 @ 2
///   ^
/// ```
pub fn caret_diagnostic(source: &str, span: Span, message: &str) -> String {
    // Tabs keep their width so the caret lines up
    let padding: String = source
        .get(..span.start)
        .unwrap_or(source)
        .chars()
        .map(|ch| if ch == '\t' { '\t' } else { ' ' })
        .collect();
    let width = source
        .get(span.start..span.end)
        .map(|text| text.chars().count())
        .unwrap_or(0)
        .max(1);

    format!("{}\n{}\n{}{}", message, source, padding, "^".repeat(width))
}
