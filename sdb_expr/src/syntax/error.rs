use crate::config::compile_time::evaluation::MAX_EVAL_DEPTH;
use crate::logging::codes;
use crate::tokens::TokenKind;
use crate::utils::Span;

/// Structural errors found while splitting a token range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("missing operand at token {index}")]
    EmptyRange { index: usize, span: Span },

    #[error("can't find main operator in tokens {start}..={end}")]
    NoMainOperator { start: usize, end: usize, span: Span },

    #[error("expected a number or register, found {kind}")]
    UnexpectedToken { kind: TokenKind, span: Span },

    #[error("Expression nesting too deep: {depth} (max {MAX_EVAL_DEPTH})")]
    MaxRecursionDepth { depth: usize, span: Span },
}

impl SyntaxError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SyntaxError::EmptyRange { .. } => codes::syntax::EMPTY_RANGE,
            SyntaxError::NoMainOperator { .. } => codes::syntax::NO_MAIN_OPERATOR,
            SyntaxError::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            SyntaxError::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxError::EmptyRange { span, .. }
            | SyntaxError::NoMainOperator { span, .. }
            | SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::MaxRecursionDepth { span, .. } => *span,
        }
    }
}
