// Internal modules
pub mod config;
pub mod evaluation;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use evaluation::{EvalContext, EvalError, MachineSnapshot, SimulatedMachine, Word};
pub use lexical::{tokenize, LexerError};
pub use pipeline::{
    evaluate_expression, expr, expr_with_status, PipelineError, PipelineResult,
};
pub use syntax::SyntaxError;
pub use tokens::{Token, TokenKind, TokenSequence};

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn value(text: &str) -> Word {
        expr(text, &SimulatedMachine::new()).unwrap()
    }

    #[test]
    fn test_whitespace_only_input() {
        assert!(tokenize(" \t ").unwrap().is_empty());
        assert_matches!(
            expr(" \t ", &SimulatedMachine::new()),
            Err(PipelineError::Evaluation(EvalError::Syntax(
                SyntaxError::EmptyRange { .. }
            )))
        );
    }

    #[test]
    fn test_decimal_sum() {
        let tokens = tokenize("12+3").unwrap();
        assert_eq!(
            tokens.kinds(),
            vec![TokenKind::Uint, TokenKind::Plus, TokenKind::Uint]
        );
        assert_eq!(tokens.get(0).unwrap().value.text(), Some("12"));
        assert_eq!(tokens.get(2).unwrap().value.text(), Some("3"));
        assert_eq!(value("12+3"), 15);
    }

    #[test]
    fn test_hex_literal() {
        assert_eq!(tokenize("0x1A").unwrap().kinds(), vec![TokenKind::Hex]);
        assert_eq!(value("0x1A"), 26);
    }

    #[test]
    fn test_negation_and_subtraction() {
        assert_eq!(tokenize("-3").unwrap().kind(0), Some(TokenKind::Neg));
        assert_eq!(value("-3") as i32, -3);
        assert_eq!(tokenize("4-3").unwrap().kind(1), Some(TokenKind::Minus));
        assert_eq!(value("4-3"), 1);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(value("2+3*4"), 14);
        assert_eq!(value("(2+3)*4"), 20);
    }

    #[test]
    fn test_left_associative_subtraction() {
        assert_eq!(value("10-3-2"), 5);
    }

    #[test]
    fn test_comparisons_and_logical_and() {
        assert_eq!(value("1==1&&2!=3"), 1);
    }

    #[test]
    fn test_unclosed_paren() {
        assert_matches!(
            expr("(1+2", &SimulatedMachine::new()),
            Err(PipelineError::Evaluation(EvalError::Syntax(
                SyntaxError::NoMainOperator { .. }
            )))
        );
    }

    #[test]
    fn test_unrecognized_character_stops_before_evaluation() {
        assert_matches!(
            expr("@", &SimulatedMachine::new()),
            Err(PipelineError::LexicalAnalysis(LexerError::NoMatchingRule { .. }))
        );
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let machine = SimulatedMachine::new();
        for text in ["2+3*4", "-3", "(1+2", "@"] {
            assert_eq!(expr(text, &machine), expr(text, &machine));
        }
    }

    #[test]
    fn test_registers_and_memory() {
        let snapshot = MachineSnapshot::from_toml_str(
            r#"
            [registers]
            sp = 0x1000
            a0 = 3

            [[memory]]
            base = 0x1000
            words = [10, 20]
            "#,
        )
        .unwrap();
        let machine = snapshot.into_machine().unwrap();

        assert_eq!(expr("*$sp + *($sp + 4)", &machine).unwrap(), 30);
        assert_eq!(expr("$a0 * $a0 == 9", &machine).unwrap(), 1);
        assert_eq!(expr("$$0", &machine).unwrap(), 0);
    }

    #[test]
    fn test_concurrent_evaluation() {
        let handles: Vec<_> = (0..4u32)
            .map(|i| {
                std::thread::spawn(move || {
                    let machine = SimulatedMachine::new();
                    expr(&format!("{} * 10 + 1", i), &machine).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), i as Word * 10 + 1);
        }
    }
}
