//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const NO_MATCHING_RULE: Code = Code::new("E020");
    pub const TOO_MANY_TOKENS: Code = Code::new("E021");
    pub const TOKEN_TOO_LONG: Code = Code::new("E022");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E023");
    pub const RULE_TABLE_UNAVAILABLE: Code = Code::new("E024");
}

/// Range structure error codes
pub mod syntax {
    use super::Code;

    pub const EMPTY_RANGE: Code = Code::new("E040");
    pub const NO_MAIN_OPERATOR: Code = Code::new("E041");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E042");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E043");
}

/// Evaluation error codes
pub mod evaluation {
    use super::Code;

    pub const INVALID_LITERAL: Code = Code::new("E060");
    pub const UNKNOWN_REGISTER: Code = Code::new("E061");
    pub const DIVISION_BY_ZERO: Code = Code::new("E062");
}

/// Machine snapshot error codes
pub mod machine {
    use super::Code;

    pub const SNAPSHOT_IO: Code = Code::new("E080");
    pub const SNAPSHOT_INVALID: Code = Code::new("E081");
    pub const UNKNOWN_REGISTER_NAME: Code = Code::new("E082");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const RULE_TABLE_COMPILED: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const EVALUATION_COMPLETE: Code = Code::new("I060");
    pub const SNAPSHOT_LOADED: Code = Code::new("I080");
    pub const PIPELINE_VALIDATION_PASSED: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the expression that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Initialization failure",
                "Check logging configuration and environment variables",
            ),
            // Lexical errors
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "No token rule matches at the current position",
                "Remove or replace the character marked by the caret",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Expression contains too many tokens",
                "Split the expression into smaller parts",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Literal or register text exceeds the maximum token length",
                "Shorten the literal",
            ),
            ErrorMetadata::new(
                "E023",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Expression text exceeds the maximum length",
                "Shorten the expression",
            ),
            ErrorMetadata::new(
                "E024",
                "Lexical",
                Severity::Critical,
                false,
                true,
                "Token rule table failed to compile",
                "File a bug report; the built-in rule patterns are invalid",
            ),
            // Syntax errors
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "An operand is missing",
                "Check for a dangling operator or empty parentheses",
            ),
            ErrorMetadata::new(
                "E041",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Cannot find the main operator of a sub-expression",
                "Check parenthesis balance and operator placement",
            ),
            ErrorMetadata::new(
                "E042",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "A lone token is not a number or register",
                "Supply an operand for the operator",
            ),
            ErrorMetadata::new(
                "E043",
                "Syntax",
                Severity::High,
                true,
                false,
                "Expression nesting exceeds the maximum evaluation depth",
                "Reduce parenthesis or operator nesting",
            ),
            // Evaluation errors
            ErrorMetadata::new(
                "E060",
                "Evaluation",
                Severity::Medium,
                true,
                false,
                "Numeric literal does not fit in a machine word",
                "Use a value within 32 bits",
            ),
            ErrorMetadata::new(
                "E061",
                "Evaluation",
                Severity::Medium,
                true,
                false,
                "Register is not known to the machine",
                "Use an ABI register name such as $sp or $a0",
            ),
            ErrorMetadata::new(
                "E062",
                "Evaluation",
                Severity::Medium,
                true,
                false,
                "Division by zero",
                "Check the divisor",
            ),
            // Machine snapshot errors
            ErrorMetadata::new(
                "E080",
                "Machine",
                Severity::High,
                true,
                false,
                "Machine snapshot could not be read",
                "Check the snapshot path and permissions",
            ),
            ErrorMetadata::new(
                "E081",
                "Machine",
                Severity::High,
                true,
                false,
                "Machine snapshot is not valid TOML",
                "Fix the snapshot syntax",
            ),
            ErrorMetadata::new(
                "E082",
                "Machine",
                Severity::Medium,
                true,
                false,
                "Machine snapshot names an unknown register",
                "Use ABI register names without the $ sigil",
            ),
            // Success codes
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "System initialization completed",
                "Continue",
            ),
            ErrorMetadata::new(
                "I010",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Token rule table compiled",
                "Continue",
            ),
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "Continue",
            ),
            ErrorMetadata::new(
                "I060",
                "Evaluation",
                Severity::Low,
                true,
                false,
                "Expression evaluated",
                "Continue",
            ),
            ErrorMetadata::new(
                "I080",
                "Machine",
                Severity::Low,
                true,
                false,
                "Machine snapshot loaded",
                "Continue",
            ),
            ErrorMetadata::new(
                "I090",
                "System",
                Severity::Low,
                true,
                false,
                "Pipeline validation passed",
                "Continue",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
