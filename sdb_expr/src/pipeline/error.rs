use crate::evaluation::EvalError;
use crate::lexical::LexerError;

/// Pipeline processing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::LexicalAnalysis(error) => error.error_code(),
            PipelineError::Evaluation(error) => error.error_code(),
        }
    }

    /// Error message with a caret under the offending part of `source`
    pub fn diagnostic(&self, source: &str) -> String {
        match self {
            PipelineError::LexicalAnalysis(error) => error.diagnostic(source),
            PipelineError::Evaluation(error) => error.diagnostic(source),
        }
    }
}
