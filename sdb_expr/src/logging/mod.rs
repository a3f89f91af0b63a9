//! Global logging module for the expression evaluator
//!
//! Provides thread-safe global logging with per-expression context and a
//! small macro interface. Logging is a no-op until [`init_global_logging`]
//! has run.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Expression currently being processed on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionContext {
    pub expression: String,
    pub expression_id: usize,
}

thread_local! {
    static EXPRESSION_CONTEXT: RefCell<Option<ExpressionContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(LoggingService::with_config());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    // Validate error code system
    let test_codes = [
        codes::system::INTERNAL_ERROR,
        codes::lexical::NO_MATCHING_RULE,
        codes::syntax::NO_MAIN_OPERATOR,
        codes::evaluation::DIVISION_BY_ZERO,
    ];
    for code in test_codes {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));
    logging_service.log_event(LogEvent::debug(&config::get_config_summary()));

    Ok(())
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// EXPRESSION CONTEXT MANAGEMENT
// ============================================================================

pub fn set_expression_context(expression: &str, expression_id: usize) {
    EXPRESSION_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(ExpressionContext {
            expression: expression.to_string(),
            expression_id,
        });
    });
}

/// Execute function with the expression recorded in every event it logs
pub fn with_expression_context<F, R>(expression: &str, expression_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_expression_context();
    set_expression_context(expression, expression_id);
    let result = f();
    EXPRESSION_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

/// Get current expression context (used by macros)
pub fn get_current_expression_context() -> Option<ExpressionContext> {
    EXPRESSION_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Add the current expression, if any, to an event's context
pub fn attach_expression_context(event: LogEvent) -> LogEvent {
    match get_current_expression_context() {
        Some(ctx) => event
            .with_context("expression", &ctx.expression)
            .with_context("expression_id", &ctx.expression_id.to_string()),
        None => event,
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    let mut event = LogEvent::error(code, message);

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    logger.log_event(attach_expression_context(event));
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    logger.log_event(attach_expression_context(event));
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    let mut event = LogEvent::info(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    logger.log_event(attach_expression_context(event));
}
