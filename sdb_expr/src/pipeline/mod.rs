mod error;
mod result;
mod validation;

pub use error::PipelineError;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::evaluation::{EvalContext, Word};
use crate::lexical::{LexicalAnalyzer, LexicalMetrics};
use crate::logging;
use crate::tokens::TokenSequence;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

static NEXT_EXPRESSION_ID: AtomicUsize = AtomicUsize::new(1);

/// Output of the lexical stage, ready for [`evaluate_tokenized`]
#[derive(Debug, Clone)]
pub struct TokenizedExpression<'a> {
    pub text: &'a str,
    pub tokens: TokenSequence,
    pub lexical_metrics: LexicalMetrics,
    expression_id: usize,
    start_time: Instant,
}

/// Tokenize and evaluate one expression (text -> tokens -> value)
pub fn evaluate_expression<C: EvalContext + ?Sized>(
    text: &str,
    context: &C,
) -> Result<PipelineResult, PipelineError> {
    evaluate_expression_with_config(text, context, &RuntimeConfig::default())
}

/// Evaluate with explicit lexical and evaluation preferences
pub fn evaluate_expression_with_config<C: EvalContext + ?Sized>(
    text: &str,
    context: &C,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let tokenized = tokenize_expression(text, config)?;
    evaluate_tokenized(tokenized, context, config)
}

/// Stage 1: lexical analysis
///
/// Callers that want to show the tokens run the stages separately so the
/// text is only scanned once.
pub fn tokenize_expression<'a>(
    text: &'a str,
    config: &RuntimeConfig,
) -> Result<TokenizedExpression<'a>, PipelineError> {
    let start_time = Instant::now();
    let expression_id = NEXT_EXPRESSION_ID.fetch_add(1, Ordering::Relaxed);

    logging::with_expression_context(text, expression_id, || {
        crate::log_debug!("Evaluating expression", "length" => text.len());

        let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
        let tokens = analyzer.tokenize(text)?;

        Ok(TokenizedExpression {
            text,
            tokens,
            lexical_metrics: analyzer.metrics().clone(),
            expression_id,
            start_time,
        })
    })
}

/// Stage 2: evaluation of an already tokenized expression
pub fn evaluate_tokenized<C: EvalContext + ?Sized>(
    tokenized: TokenizedExpression<'_>,
    context: &C,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let TokenizedExpression {
        text,
        tokens,
        lexical_metrics,
        expression_id,
        start_time,
    } = tokenized;

    logging::with_expression_context(text, expression_id, || {
        let (value, evaluation_metrics) = crate::evaluation::evaluate_with_preferences(
            &tokens,
            context,
            config.evaluation.clone(),
        );
        let value = value?;

        let result = PipelineResult::new(
            value,
            tokens,
            lexical_metrics,
            evaluation_metrics,
            start_time.elapsed(),
        );
        result.log_success(text);

        Ok(result)
    })
}

/// Evaluate an expression to its value
pub fn expr<C: EvalContext + ?Sized>(text: &str, context: &C) -> Result<Word, PipelineError> {
    evaluate_expression(text, context).map(|result| result.value)
}

/// Evaluate an expression, reporting failure as `(0, false)`
pub fn expr_with_status<C: EvalContext + ?Sized>(text: &str, context: &C) -> (Word, bool) {
    match expr(text, context) {
        Ok(value) => (value, true),
        Err(_) => (0, false),
    }
}
