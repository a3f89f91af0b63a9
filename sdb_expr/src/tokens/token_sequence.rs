//! Owned, index-addressable token sequence
//!
//! A fresh sequence is built for every tokenization call. Indices into it
//! are the coordinate system the evaluator uses for its inclusive
//! sub-ranges `[p, q]`.

use crate::tokens::token::{Token, TokenKind};
use crate::utils::{Span, Spanned};
use serde::Serialize;

/// A token with span information
pub type SpannedToken = Spanned<Token>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenSequence {
    tokens: Vec<SpannedToken>,
}

impl TokenSequence {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn from_tokens(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens }
    }

    pub(crate) fn push(&mut self, token: SpannedToken) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SpannedToken> {
        self.tokens.get(index)
    }

    pub fn kind(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|token| token.value.kind)
    }

    /// Kind of the most recently appended token
    pub fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.value.kind)
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|token| token.value.kind).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpannedToken> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[SpannedToken] {
        &self.tokens
    }

    /// Source span covered by the inclusive range `[p, q]`
    pub fn range_span(&self, p: usize, q: usize) -> Option<Span> {
        let first = self.tokens.get(p)?;
        let last = self.tokens.get(q)?;
        Some(first.span.merge(last.span))
    }

    /// One-line listing, e.g. `decimal(12) plus(+) decimal(3)`
    pub fn describe(&self) -> String {
        self.tokens
            .iter()
            .map(|token| token.value.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a SpannedToken;
    type IntoIter = std::slice::Iter<'a, SpannedToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
