//! Recursive range evaluator
//!
//! Reduces an inclusive token range `[p, q]` to a [`Word`]:
//! a single token is an operand, a fully parenthesized range is its
//! interior, and anything else splits at its main operator. Binary
//! operators evaluate their right operand before their left one.

use crate::config::compile_time::evaluation::{DEREF_WIDTH_BYTES, MAX_EVAL_DEPTH};
use crate::config::runtime::EvaluationPreferences;
use crate::evaluation::context::{EvalContext, Word};
use crate::evaluation::error::EvalError;
use crate::syntax::{find_main_operator_index, is_paired, SyntaxError};
use crate::tokens::{TokenKind, TokenSequence};
use crate::utils::Span;
use crate::{log_debug, log_error};

/// Counters collected over one evaluation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvaluationMetrics {
    pub ranges_evaluated: usize,
    pub max_depth_reached: usize,
    pub register_reads: usize,
    pub memory_reads: usize,
}

pub struct Evaluator<'a, C: EvalContext + ?Sized> {
    tokens: &'a TokenSequence,
    context: &'a C,
    preferences: EvaluationPreferences,
    metrics: EvaluationMetrics,
}

impl<'a, C: EvalContext + ?Sized> Evaluator<'a, C> {
    pub fn new(tokens: &'a TokenSequence, context: &'a C) -> Self {
        Self::with_preferences(tokens, context, EvaluationPreferences::default())
    }

    pub fn with_preferences(
        tokens: &'a TokenSequence,
        context: &'a C,
        preferences: EvaluationPreferences,
    ) -> Self {
        Self {
            tokens,
            context,
            preferences,
            metrics: EvaluationMetrics::default(),
        }
    }

    pub fn metrics(&self) -> &EvaluationMetrics {
        &self.metrics
    }

    /// Evaluate the whole sequence
    pub fn evaluate(&mut self) -> Result<Word, EvalError> {
        self.metrics = EvaluationMetrics::default();

        match self.tokens.len() {
            0 => Err(self.fail(SyntaxError::EmptyRange {
                index: 0,
                span: Span::point(0),
            })),
            len => self.eval(0, len - 1),
        }
    }

    /// Evaluate the inclusive range `[p, q]`
    pub fn eval(&mut self, p: usize, q: usize) -> Result<Word, EvalError> {
        self.eval_at_depth(p, q, 0)
    }

    fn eval_at_depth(&mut self, p: usize, q: usize, depth: usize) -> Result<Word, EvalError> {
        if depth > MAX_EVAL_DEPTH {
            let span = self.range_span(p, q);
            return Err(self.fail(SyntaxError::MaxRecursionDepth { depth, span }));
        }

        self.metrics.ranges_evaluated += 1;
        self.metrics.max_depth_reached = self.metrics.max_depth_reached.max(depth);

        if p > q {
            // Only reachable through an operator with nothing on its right,
            // or `()`, so point just past token q
            let span = self.point_after(q);
            return Err(self.fail(SyntaxError::EmptyRange { index: p, span }));
        }

        let value = if p == q {
            self.eval_operand(p)?
        } else if is_paired(self.tokens, p, q) {
            self.eval_at_depth(p + 1, q - 1, depth + 1)?
        } else {
            self.eval_operator(p, q, depth)?
        };

        if self.preferences.trace_evaluation {
            log_debug!("Range evaluated",
                "start" => p,
                "end" => q,
                "depth" => depth,
                "value" => value
            );
        }

        Ok(value)
    }

    fn eval_operand(&mut self, index: usize) -> Result<Word, EvalError> {
        let Some(token) = self.tokens.get(index) else {
            let span = self.point_after(index.saturating_sub(1));
            return Err(self.fail(SyntaxError::EmptyRange { index, span }));
        };
        let span = token.span;
        let text = token.value.text().unwrap_or_default();

        match token.value.kind {
            TokenKind::Hex => text
                .strip_prefix("0x")
                .and_then(|digits| Word::from_str_radix(digits, 16).ok())
                .ok_or_else(|| self.invalid_literal(text, span)),
            TokenKind::Uint => text
                .parse::<Word>()
                .map_err(|_| self.invalid_literal(text, span)),
            TokenKind::Register => {
                let name = text.strip_prefix('$').unwrap_or(text);
                self.metrics.register_reads += 1;
                self.context.lookup_register(name).ok_or_else(|| {
                    self.fail(EvalError::UnknownRegister {
                        name: name.to_string(),
                        span,
                    })
                })
            }
            kind => Err(self.fail(SyntaxError::UnexpectedToken { kind, span })),
        }
    }

    fn eval_operator(&mut self, p: usize, q: usize, depth: usize) -> Result<Word, EvalError> {
        let Some(r) = find_main_operator_index(self.tokens, p, q) else {
            let span = self.range_span(p, q);
            return Err(self.fail(SyntaxError::NoMainOperator {
                start: p,
                end: q,
                span,
            }));
        };
        let Some(operator) = self.tokens.get(r) else {
            let span = self.range_span(p, q);
            return Err(self.fail(SyntaxError::NoMainOperator {
                start: p,
                end: q,
                span,
            }));
        };
        let (kind, span) = (operator.value.kind, operator.span);

        // Tokens left of a unary operator are never evaluated
        let right = self.eval_at_depth(r + 1, q, depth + 1)?;

        match kind {
            TokenKind::Deref => {
                self.metrics.memory_reads += 1;
                return Ok(self.context.read_memory(right, DEREF_WIDTH_BYTES));
            }
            TokenKind::Neg => return Ok(right.wrapping_neg()),
            _ => {}
        }

        if r == p {
            return Err(self.fail(SyntaxError::EmptyRange {
                index: r,
                span: Span::point(span.start),
            }));
        }
        let left = self.eval_at_depth(p, r - 1, depth + 1)?;

        match kind {
            TokenKind::Plus => Ok(left.wrapping_add(right)),
            TokenKind::Minus => Ok(left.wrapping_sub(right)),
            TokenKind::Star => Ok(left.wrapping_mul(right)),
            TokenKind::Slash => left
                .checked_div(right)
                .ok_or_else(|| self.fail(EvalError::DivisionByZero { span })),
            TokenKind::Eq => Ok(Word::from(left == right)),
            TokenKind::Ne => Ok(Word::from(left != right)),
            TokenKind::And => Ok(Word::from(left != 0 && right != 0)),
            kind => Err(self.fail(SyntaxError::UnexpectedToken { kind, span })),
        }
    }

    fn invalid_literal(&self, text: &str, span: Span) -> EvalError {
        self.fail(EvalError::InvalidLiteral {
            text: text.to_string(),
            span,
        })
    }

    fn range_span(&self, p: usize, q: usize) -> Span {
        self.tokens
            .range_span(p, q)
            .unwrap_or_else(|| self.point_after(q))
    }

    fn point_after(&self, index: usize) -> Span {
        self.tokens
            .get(index)
            .or_else(|| self.tokens.as_slice().last())
            .map(|token| Span::point(token.span.end))
            .unwrap_or_default()
    }

    fn fail<E: Into<EvalError>>(&self, error: E) -> EvalError {
        let error = error.into();
        let span = error.span();
        log_error!(error.error_code(), &error.to_string(),
            span = span,
            "position" => span.start
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::SimulatedMachine;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn eval_with(text: &str, machine: &SimulatedMachine) -> Result<Word, EvalError> {
        let tokens = tokenize(text).unwrap();
        Evaluator::new(&tokens, machine).evaluate()
    }

    fn eval(text: &str) -> Result<Word, EvalError> {
        eval_with(text, &SimulatedMachine::new())
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("12"), Ok(12));
        assert_eq!(eval("0x1A"), Ok(26));
        assert_eq!(eval("0xffffffff"), Ok(Word::MAX));
        assert_eq!(eval("4294967295"), Ok(Word::MAX));
    }

    #[test]
    fn test_literal_out_of_range() {
        assert_matches!(eval("4294967296"), Err(EvalError::InvalidLiteral { ref text, .. }) if text == "4294967296");
        assert_matches!(eval("0x100000000"), Err(EvalError::InvalidLiteral { .. }));
    }

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(eval("2+3*4"), Ok(14));
        assert_eq!(eval("(2+3)*4"), Ok(20));
        assert_eq!(eval("((7))"), Ok(7));
        assert_eq!(eval("(1+2)*(3+4)"), Ok(21));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("10-3-2"), Ok(5));
        assert_eq!(eval("100/10/5"), Ok(2));
    }

    #[test]
    fn test_negation_wraps() {
        let value = eval("-3").unwrap();
        assert_eq!(value, 0xffff_fffd);
        assert_eq!(value as i32, -3);
        assert_eq!(eval("4-3"), Ok(1));
        assert_eq!(eval("2*-3").map(|v| v as i32), Ok(-6));
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(eval("0xffffffff+2"), Ok(1));
        assert_eq!(eval("0-1"), Ok(Word::MAX));
        assert_eq!(eval("0x10000*0x10000"), Ok(0));
    }

    #[test]
    fn test_division_is_unsigned() {
        assert_eq!(eval("7/2"), Ok(3));
        assert_eq!(eval("-4/2"), Ok(0x7fff_fffe));
    }

    #[test]
    fn test_division_by_zero() {
        let error = eval("1/(2-2)").unwrap_err();
        assert_matches!(error, EvalError::DivisionByZero { span } if span == Span::new(1, 2));
    }

    #[test]
    fn test_comparison_and_logic() {
        assert_eq!(eval("1==1&&2!=3"), Ok(1));
        assert_eq!(eval("1==2"), Ok(0));
        assert_eq!(eval("5!=5"), Ok(0));
        assert_eq!(eval("3&&0"), Ok(0));
        assert_eq!(eval("3&&4"), Ok(1));
    }

    #[test]
    fn test_logical_and_evaluates_both_sides() {
        // Right side runs first, so the division error surfaces even though
        // the left side is false
        assert_matches!(eval("0&&1/0"), Err(EvalError::DivisionByZero { .. }));
    }

    #[test]
    fn test_right_operand_errors_first() {
        let machine = SimulatedMachine::new();
        let tokens = tokenize("4294967296+0x100000000").unwrap();
        let error = Evaluator::new(&tokens, &machine).evaluate().unwrap_err();
        assert_matches!(error, EvalError::InvalidLiteral { ref text, .. } if text == "0x100000000");
    }

    #[test]
    fn test_registers() {
        let mut machine = SimulatedMachine::new();
        machine.set_register("sp", 0x8000_0000);
        machine.set_register("s11", 4);

        assert_eq!(eval_with("$sp+$s11", &machine), Ok(0x8000_0004));
        assert_eq!(eval_with("$$0", &machine), Ok(0));
    }

    #[test]
    fn test_unknown_register_from_context() {
        struct NoRegisters;

        impl EvalContext for NoRegisters {
            fn lookup_register(&self, _name: &str) -> Option<Word> {
                None
            }

            fn read_memory(&self, _address: Word, _width_bytes: usize) -> Word {
                0
            }
        }

        let tokens = tokenize("1+$a0").unwrap();
        let error = Evaluator::new(&tokens, &NoRegisters).evaluate().unwrap_err();
        assert_matches!(error, EvalError::UnknownRegister { ref name, .. } if name == "a0");
    }

    #[test]
    fn test_dereference() {
        let mut machine = SimulatedMachine::new();
        machine.set_register("sp", 0x8000_0000);
        machine.write_word(0x8000_0000, 0x11);
        machine.write_word(0x8000_0004, 0x22);

        assert_eq!(eval_with("*$sp", &machine), Ok(0x11));
        assert_eq!(eval_with("*($sp+4)", &machine), Ok(0x22));
        assert_eq!(eval_with("2**$sp", &machine), Ok(0x22));
        assert_eq!(eval_with("*0x80000000+*0x80000004", &machine), Ok(0x33));
    }

    #[test]
    fn test_empty_sequence() {
        assert_matches!(
            eval("   "),
            Err(EvalError::Syntax(SyntaxError::EmptyRange { index: 0, .. }))
        );
    }

    #[test]
    fn test_missing_operands() {
        assert_matches!(
            eval("1+"),
            Err(EvalError::Syntax(SyntaxError::EmptyRange { index: 2, span })) if span == Span::point(2)
        );
        assert_matches!(
            eval("+1"),
            Err(EvalError::Syntax(SyntaxError::EmptyRange { index: 0, .. }))
        );
        assert_matches!(
            eval("()"),
            Err(EvalError::Syntax(SyntaxError::EmptyRange { .. }))
        );
    }

    #[test]
    fn test_unclosed_paren_has_no_main_operator() {
        assert_matches!(
            eval("(1+2"),
            Err(EvalError::Syntax(SyntaxError::NoMainOperator { start: 0, end: 3, .. }))
        );
        assert_matches!(
            eval("1 2"),
            Err(EvalError::Syntax(SyntaxError::NoMainOperator { .. }))
        );
    }

    #[test]
    fn test_lone_operator_token() {
        assert_matches!(
            eval("("),
            Err(EvalError::Syntax(SyntaxError::UnexpectedToken {
                kind: TokenKind::LParen,
                ..
            }))
        );
    }

    #[test]
    fn test_double_minus_fails() {
        // Second minus stays binary, leaving a bare negation as its left operand
        assert_matches!(
            eval("--3"),
            Err(EvalError::Syntax(SyntaxError::UnexpectedToken {
                kind: TokenKind::Neg,
                ..
            }))
        );
    }

    #[test]
    fn test_recursion_limit() {
        // Each `-(` adds two levels of nesting
        let levels = MAX_EVAL_DEPTH / 2 + 1;
        let text = format!("{}1{}", "-(".repeat(levels), ")".repeat(levels));
        assert!(tokenize(&text).is_ok());
        assert_matches!(
            eval(&text),
            Err(EvalError::Syntax(SyntaxError::MaxRecursionDepth { .. }))
        );

        let text = format!("{}1{}", "(".repeat(8), ")".repeat(8));
        assert_eq!(eval(&text), Ok(1));
    }

    #[test]
    fn test_metrics() {
        let mut machine = SimulatedMachine::new();
        machine.set_register("a0", 8);
        let tokens = tokenize("*($a0+4)").unwrap();
        let mut evaluator = Evaluator::new(&tokens, &machine);
        evaluator.evaluate().unwrap();

        let metrics = evaluator.metrics();
        assert_eq!(metrics.register_reads, 1);
        assert_eq!(metrics.memory_reads, 1);
        // *(...) -> (...) -> $a0+4 -> {4, $a0}
        assert_eq!(metrics.ranges_evaluated, 5);
        assert_eq!(metrics.max_depth_reached, 3);
    }

    #[test]
    fn test_sub_range_evaluation() {
        let tokens = tokenize("1+2*3").unwrap();
        let machine = SimulatedMachine::new();
        let mut evaluator = Evaluator::new(&tokens, &machine);
        assert_eq!(evaluator.eval(2, 4), Ok(6));
        assert_eq!(evaluator.eval(0, 0), Ok(1));
    }
}
