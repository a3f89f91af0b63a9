//! Structural analysis over token ranges
//!
//! Two queries drive evaluation: whether a range is exactly one
//! parenthesized group, and which operator in a range is applied last.

pub mod error;
pub mod operators;
pub mod spans;

pub use error::SyntaxError;
pub use operators::{find_main_operator_index, operator_priority};
pub use spans::is_paired;

const SYNTAX_CODES: [crate::logging::Code; 4] = [
    crate::logging::codes::syntax::EMPTY_RANGE,
    crate::logging::codes::syntax::NO_MAIN_OPERATOR,
    crate::logging::codes::syntax::UNEXPECTED_TOKEN,
    crate::logging::codes::syntax::MAX_RECURSION_DEPTH,
];

/// Initialize syntax analysis (for system startup)
pub fn init_syntax_logging() -> Result<(), String> {
    for code in &SYNTAX_CODES {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }
    Ok(())
}
