use crate::logging::codes;
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// Errors produced while reducing a token range to a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("invalid literal '{text}'")]
    InvalidLiteral { text: String, span: Span },

    #[error("unknown register '{name}'")]
    UnknownRegister { name: String, span: Span },

    #[error("division by zero")]
    DivisionByZero { span: Span },
}

impl EvalError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            EvalError::Syntax(error) => error.error_code(),
            EvalError::InvalidLiteral { .. } => codes::evaluation::INVALID_LITERAL,
            EvalError::UnknownRegister { .. } => codes::evaluation::UNKNOWN_REGISTER,
            EvalError::DivisionByZero { .. } => codes::evaluation::DIVISION_BY_ZERO,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            EvalError::Syntax(error) => error.span(),
            EvalError::InvalidLiteral { span, .. }
            | EvalError::UnknownRegister { span, .. }
            | EvalError::DivisionByZero { span } => *span,
        }
    }

    /// The error message, followed by the source and a caret under the
    /// offending range.
    pub fn diagnostic(&self, source: &str) -> String {
        crate::utils::caret_diagnostic(source, self.span(), &self.to_string())
    }
}
