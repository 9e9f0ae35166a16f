//! Logging module for the filter engine
//!
//! Structured, code-tagged events with `key => value` context, emitted through
//! the `log` facade so the host application decides where they go.

pub mod codes;
pub mod macros;

pub use codes::{Code, Severity};

use log::Level;

/// Render an event as a single line: `[CODE] message (key=value, ...)`
pub fn format_event(code: Option<Code>, message: &str, context: &[(&str, &str)]) -> String {
    let mut line = match code {
        Some(code) => format!("[{}] {}", code, message),
        None => message.to_string(),
    };

    if !context.is_empty() {
        let pairs: Vec<String> = context
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        line.push_str(" (");
        line.push_str(&pairs.join(", "));
        line.push(')');
    }

    line
}

fn emit(target: &str, level: Level, code: Option<Code>, message: &str, context: &[(&str, &str)]) {
    if log::log_enabled!(target: target, level) {
        log::log!(target: target, level, "{}", format_event(code, message, context));
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(target: &str, code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(target, Level::Error, Some(code), message, &context);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(
    target: &str,
    code: Code,
    message: &str,
    context: Vec<(&str, &str)>,
) {
    emit(target, Level::Info, Some(code), message, &context);
}

/// Log warning with context (used by log_warning! macro)
pub fn log_warning_with_context(target: &str, message: &str, context: Vec<(&str, &str)>) {
    emit(target, Level::Warn, None, message, &context);
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(target: &str, message: &str, context: Vec<(&str, &str)>) {
    emit(target, Level::Info, None, message, &context);
}

/// Log debug with context (used by log_debug! macro)
pub fn log_debug_with_context(target: &str, message: &str, context: Vec<(&str, &str)>) {
    emit(target, Level::Debug, None, message, &context);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_event_with_code_and_context() {
        let line = format_event(
            Some(codes::validation::UNKNOWN_FIELD),
            "Field validation failed",
            &[("field", "population"), ("operator", ">")],
        );
        assert_eq!(
            line,
            "[E120] Field validation failed (field=population, operator=>)"
        );
    }

    #[test]
    fn test_format_event_plain() {
        assert_eq!(format_event(None, "Filter cleared", &[]), "Filter cleared");
    }
}
