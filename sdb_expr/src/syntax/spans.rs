//! Parenthesis span matching

use crate::tokens::{TokenKind, TokenSequence};

/// True iff `[p, q]` is one parenthesized group: `tokens[p]` is `(`,
/// `tokens[q]` is `)`, and the strict interior keeps a non-negative depth
/// that ends at zero.
///
/// `(1)+(2)` is not paired: its interior `1)+(2` dips below zero.
pub fn is_paired(tokens: &TokenSequence, p: usize, q: usize) -> bool {
    if p >= q
        || tokens.kind(p) != Some(TokenKind::LParen)
        || tokens.kind(q) != Some(TokenKind::RParen)
    {
        return false;
    }

    let mut depth = 0usize;
    for i in p + 1..q {
        match tokens.kind(i) {
            Some(TokenKind::LParen) => depth += 1,
            Some(TokenKind::RParen) => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;

    fn paired(text: &str) -> bool {
        let tokens = tokenize(text).unwrap();
        is_paired(&tokens, 0, tokens.len() - 1)
    }

    #[test]
    fn test_simple_group() {
        assert!(paired("(1)"));
        assert!(paired("(1+2)"));
        assert!(paired("((1+2)*(3))"));
        assert!(paired("()"));
    }

    #[test]
    fn test_adjacent_groups_are_not_one_pair() {
        assert!(!paired("(1)+(2)"));
        assert!(!paired("(1))+((2)"));
    }

    #[test]
    fn test_both_ends_are_required() {
        assert!(!paired("-1)"));
        assert!(!paired("(1+2"));
        assert!(!paired("1+2"));
        assert!(!paired("(1"));
    }

    #[test]
    fn test_unbalanced_interior() {
        assert!(!paired("((1)"));
        assert!(!paired("(1))"));
    }

    #[test]
    fn test_sub_ranges() {
        let tokens = tokenize("2*(3+4)").unwrap();
        assert!(is_paired(&tokens, 2, 6));
        assert!(!is_paired(&tokens, 0, 6));
        assert!(!is_paired(&tokens, 6, 2));
        assert!(!is_paired(&tokens, 2, 99));
    }
}
