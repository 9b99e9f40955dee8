//! deeperror - augmented error values for diagnostics.
//!
//! A [`DeepError`] wraps an optional cause and adds everything needed to
//! track a failure down after the fact:
//!
//! - **Identity**: a caller-assigned numeric id ([`DeepError::num`])
//! - **Location**: file basename, function, and line of the call site
//! - **Stack**: a bounded stack trace captured at construction
//! - **Messages**: an end-user message plus an internal debug message
//! - **Debug fields**: free-form key/value context ([`serde_json::Value`])
//! - **Status**: an HTTP-style status code, inherited through chains
//!
//! Rendering a `DeepError` with `Display` produces a multi-line block where
//! each wrapped cause is nested under a `"-- "` marker (see [`render`]).
//!
//! The [`level`] module is independent of `DeepError` and maps severity
//! ordinals to canonical names.
//!
//! # Example
//!
//! ```
//! use deeperror::{DeepError, ResultExt};
//!
//! fn parse_port(raw: &str) -> Result<u16, DeepError> {
//!     raw.parse::<u16>()
//!         .deep_http_context(2_200_017, "Port must be a number", 400)
//! }
//!
//! let err = parse_port("eighty").unwrap_err();
//! assert_eq!(err.status_code(), 400);
//! assert!(err.to_string().contains("-- EndUserMsg: Port must be a number"));
//! ```

pub mod config;
pub mod level;
pub mod render;

mod error;
mod logging;
mod result_ext;
mod site;

pub use error::{Cause, Chain, DEFAULT_STATUS_CODE, DeepError, TODO_MESSAGE, status_text};
pub use level::{
    ErrorLevel, INVALID_LEVEL, UNKNOWN_LEVEL_NAME, UnknownLevel, level_name, level_ordinal,
};
pub use logging::{
    DEFAULT_STACK_TRACE_LIMIT, FATAL_EXIT_CODE, LoggingSuppressed, auto_log_level,
    error_logging_enabled, exec_without_error_logging, fatal, set_auto_log_level,
    set_error_logging_enabled, set_stack_trace_limit, stack_trace_limit,
};
pub use render::{NESTING_MARKER, prefix_lines};
pub use result_ext::ResultExt;
pub use site::CallSite;

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value;
}

/// Build a [`DeepError`] placeholder for an unhandled code path.
///
/// Every argument after the id is converted into a debug field keyed by
/// its position.
///
/// ```
/// let err = deeperror::deep_todo!(9_000_001, "a", 2, true);
///
/// assert_eq!(err.end_user_msg(), "TODO");
/// assert_eq!(err.debug_field("0"), Some(&serde_json::json!("a")));
/// assert_eq!(err.debug_field("2"), Some(&serde_json::json!(true)));
/// ```
#[macro_export]
macro_rules! deep_todo {
    ($num:expr $(, $value:expr)* $(,)?) => {
        $crate::DeepError::todo::<::std::vec::Vec<$crate::__private::Value>>(
            $num,
            ::std::vec![$(::std::convert::Into::<$crate::__private::Value>::into($value)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn test_deep_todo_macro() {
        let line = line!() + 1;
        let err = deep_todo!(9001, "a", 2, true);

        assert_eq!(err.end_user_msg(), crate::TODO_MESSAGE);
        assert_eq!(err.line(), line);
        assert_eq!(err.debug_field("0"), Some(&json!("a")));
        assert_eq!(err.debug_field("1"), Some(&json!(2)));
        assert_eq!(err.debug_field("2"), Some(&json!(true)));
    }

    #[test]
    fn test_deep_todo_macro_without_values() {
        let err = deep_todo!(9002);
        assert!(err.debug_fields().is_empty());
    }
}
