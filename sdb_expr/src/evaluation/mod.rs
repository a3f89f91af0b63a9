//! Expression evaluation
//!
//! Reduces a token sequence to a machine word against an [`EvalContext`]
//! that supplies register values and memory contents.

pub mod context;
pub mod error;
pub mod evaluator;
pub mod machine;

pub use context::{register_index, EvalContext, Word, REGISTER_NAMES};
pub use error::EvalError;
pub use evaluator::{EvaluationMetrics, Evaluator};
pub use machine::{MachineError, MachineSnapshot, MemoryRegion, SimulatedMachine};

use crate::config::runtime::EvaluationPreferences;
use crate::tokens::TokenSequence;

/// Evaluate a whole token sequence with default preferences
pub fn evaluate<C: EvalContext + ?Sized>(
    tokens: &TokenSequence,
    context: &C,
) -> Result<Word, EvalError> {
    Evaluator::new(tokens, context).evaluate()
}

/// Evaluate with explicit preferences, returning the collected metrics too
pub fn evaluate_with_preferences<C: EvalContext + ?Sized>(
    tokens: &TokenSequence,
    context: &C,
    preferences: EvaluationPreferences,
) -> (Result<Word, EvalError>, EvaluationMetrics) {
    let mut evaluator = Evaluator::with_preferences(tokens, context, preferences);
    let result = evaluator.evaluate();
    (result, evaluator.metrics().clone())
}

const EVALUATION_CODES: [crate::logging::Code; 6] = [
    crate::logging::codes::evaluation::INVALID_LITERAL,
    crate::logging::codes::evaluation::UNKNOWN_REGISTER,
    crate::logging::codes::evaluation::DIVISION_BY_ZERO,
    crate::logging::codes::machine::SNAPSHOT_IO,
    crate::logging::codes::machine::SNAPSHOT_INVALID,
    crate::logging::codes::machine::UNKNOWN_REGISTER_NAME,
];

/// Initialize evaluation (for system startup)
pub fn init_evaluation_logging() -> Result<(), String> {
    for code in &EVALUATION_CODES {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Evaluation error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Evaluation limits initialized",
        "max_eval_depth" => crate::config::compile_time::evaluation::MAX_EVAL_DEPTH,
        "deref_width_bytes" => crate::config::compile_time::evaluation::DEREF_WIDTH_BYTES
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;

    #[test]
    fn test_init_logging() {
        assert!(init_evaluation_logging().is_ok());
    }

    #[test]
    fn test_evaluate_helpers() {
        let tokens = tokenize("(2+3)*4").unwrap();
        let machine = SimulatedMachine::new();
        assert_eq!(evaluate(&tokens, &machine), Ok(20));

        let preferences = EvaluationPreferences {
            trace_evaluation: true,
        };
        let (result, metrics) = evaluate_with_preferences(&tokens, &machine, preferences);
        assert_eq!(result, Ok(20));
        assert_eq!(metrics.register_reads, 0);
        assert!(metrics.ranges_evaluated > 1);
    }

    #[test]
    fn test_trait_object_context() {
        let tokens = tokenize("$a0*2").unwrap();
        let mut machine = SimulatedMachine::new();
        machine.set_register("a0", 21);
        let context: &dyn EvalContext = &machine;
        assert_eq!(evaluate(&tokens, context), Ok(42));
    }
}
