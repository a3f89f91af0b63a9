//! Main-operator selection by priority scan
//!
//! Precedence and associativity come from choosing which operator in a
//! range is applied last, with no parse tree.

use crate::tokens::{TokenKind, TokenSequence};

/// Binding priority of an operator kind. Lower binds looser.
pub fn operator_priority(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::And => Some(0),
        TokenKind::Eq | TokenKind::Ne => Some(1),
        TokenKind::Plus | TokenKind::Minus => Some(2),
        TokenKind::Star | TokenKind::Slash => Some(3),
        TokenKind::Deref | TokenKind::Neg => Some(4),
        _ => None,
    }
}

/// Index of the operator applied last in `[p, q]`, if any.
///
/// Scans left to right tracking parenthesis depth; only depth-zero
/// operators are candidates. A candidate replaces the current choice when
/// its priority is `<=` the current one, so the rightmost of equal-priority
/// binary operators wins and `10-3-2` groups as `(10-3)-2`.
///
/// Depth is signed: a stray `)` drops the rest of the range below zero and
/// out of consideration.
pub fn find_main_operator_index(tokens: &TokenSequence, p: usize, q: usize) -> Option<usize> {
    let mut depth: isize = 0;
    let mut selected: Option<(usize, u8)> = None;

    for i in p..=q {
        let Some(kind) = tokens.kind(i) else {
            break;
        };

        match kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth -= 1,
            _ => {
                if depth != 0 {
                    continue;
                }
                if let Some(priority) = operator_priority(kind) {
                    if selected.map_or(true, |(_, current)| priority <= current) {
                        selected = Some((i, priority));
                    }
                }
            }
        }
    }

    selected.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;

    fn main_operator(text: &str) -> Option<usize> {
        let tokens = tokenize(text).unwrap();
        find_main_operator_index(&tokens, 0, tokens.len() - 1)
    }

    #[test]
    fn test_priorities() {
        assert_eq!(operator_priority(TokenKind::And), Some(0));
        assert_eq!(operator_priority(TokenKind::Ne), Some(1));
        assert_eq!(operator_priority(TokenKind::Minus), Some(2));
        assert_eq!(operator_priority(TokenKind::Slash), Some(3));
        assert_eq!(operator_priority(TokenKind::Neg), Some(4));
        assert_eq!(operator_priority(TokenKind::LParen), None);
        assert_eq!(operator_priority(TokenKind::Hex), None);
    }

    #[test]
    fn test_lowest_priority_wins() {
        // 2 + 3 * 4
        assert_eq!(main_operator("2+3*4"), Some(1));
        // 1 == 1 && 2 != 3
        assert_eq!(main_operator("1==1&&2!=3"), Some(3));
    }

    #[test]
    fn test_rightmost_of_equal_priority_wins() {
        // 10 - 3 - 2
        assert_eq!(main_operator("10-3-2"), Some(3));
        assert_eq!(main_operator("8/4/2"), Some(3));
    }

    #[test]
    fn test_parenthesized_operators_are_skipped() {
        // ( 2 + 3 ) * 4
        assert_eq!(main_operator("(2+3)*4"), Some(5));
        assert_eq!(main_operator("(1+2)"), None);
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(main_operator("-3"), Some(0));
        // - 3 + 4: binary plus binds looser
        assert_eq!(main_operator("-3+4"), Some(2));
        assert_eq!(main_operator("*$sp"), Some(0));
    }

    #[test]
    fn test_unbalanced_open_paren() {
        // ( 1 + 2: depth never returns to zero
        assert_eq!(main_operator("(1+2"), None);
    }

    #[test]
    fn test_stray_close_paren_hides_later_operators() {
        // 1 ) + 2: plus is at depth -1
        assert_eq!(main_operator("1)+2"), None);
    }

    #[test]
    fn test_no_operator() {
        assert_eq!(main_operator("1 2"), None);
    }

    #[test]
    fn test_sub_range() {
        let tokens = tokenize("1+2*3").unwrap();
        assert_eq!(find_main_operator_index(&tokens, 2, 4), Some(3));
    }
}
