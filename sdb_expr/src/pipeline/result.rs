use crate::evaluation::{EvaluationMetrics, Word};
use crate::lexical::LexicalMetrics;
use crate::tokens::TokenSequence;
use std::time::Duration;

/// Value of one expression plus what it took to compute it
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub value: Word,
    pub tokens: TokenSequence,
    pub lexical_metrics: LexicalMetrics,
    pub evaluation_metrics: EvaluationMetrics,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        value: Word,
        tokens: TokenSequence,
        lexical_metrics: LexicalMetrics,
        evaluation_metrics: EvaluationMetrics,
        processing_duration: Duration,
    ) -> Self {
        Self {
            value,
            tokens,
            lexical_metrics,
            evaluation_metrics,
            processing_duration,
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// The value reinterpreted as two's-complement
    pub fn signed_value(&self) -> i32 {
        self.value as i32
    }

    pub fn log_success(&self, expression: &str) {
        crate::log_success!(
            crate::logging::codes::success::EVALUATION_COMPLETE,
            "Expression evaluated",
            "expression" => expression,
            "value" => format!("{:#x}", self.value),
            "tokens" => self.token_count(),
            "ranges" => self.evaluation_metrics.ranges_evaluated,
            "duration_us" => self.processing_duration.as_micros()
        );
    }
}
