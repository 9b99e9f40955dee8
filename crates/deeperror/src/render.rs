//! Multi-line rendering of [`DeepError`].
//!
//! ```text
//! -- DeepError 4107221 500 handlers.rs app::handlers::load_user line: 42
//! -- EndUserMsg: Could not load your profile
//! -- DebugMsg: user store unavailable
//! -- DebugField[user_id]: 42
//! -- StackTrace:
//! --    0: std::backtrace::Backtrace::force_capture
//! -- ...
//! -- ParentError:
//! -- users.db missing
//! ```
//!
//! A cause is rendered through its own `Display` with [`NESTING_MARKER`]
//! prepended to every line, so each level of wrapping adds one marker.

use std::fmt;

use serde_json::Value;

use crate::DeepError;

/// Prefix that marks every line of a rendering, and each nesting level.
pub const NESTING_MARKER: &str = "-- ";

/// Prepend `prefix` to every line of `text`.
///
/// ```
/// assert_eq!(deeperror::prefix_lines("a\nb", "> "), "> a\n> b");
/// ```
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strings render bare; everything else as compact JSON.
struct FieldValue<'a>(&'a Value);

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for DeepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{NESTING_MARKER}DeepError {} {} {} {} line: {}",
            self.num(),
            self.status_code(),
            self.filename(),
            self.calling_method(),
            self.line()
        )?;
        writeln!(f, "{NESTING_MARKER}EndUserMsg: {}", self.end_user_msg())?;

        if !self.debug_msg().is_empty() {
            writeln!(f, "{NESTING_MARKER}DebugMsg: {}", self.debug_msg())?;
        }

        for (key, value) in self.debug_fields() {
            writeln!(f, "{NESTING_MARKER}DebugField[{key}]: {}", FieldValue(value))?;
        }

        writeln!(f, "{NESTING_MARKER}StackTrace:")?;
        let trace = self.stack_trace().trim_end();
        if !trace.is_empty() {
            writeln!(f, "{}", prefix_lines(trace, NESTING_MARKER))?;
        }

        match self.cause() {
            None => write!(f, "{NESTING_MARKER}ParentError: nil"),
            Some(cause) => {
                writeln!(f, "{NESTING_MARKER}ParentError:")?;
                let nested = cause.to_string();
                write!(f, "{}", prefix_lines(nested.trim_end(), NESTING_MARKER))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_prefix_lines() {
        assert_eq!(prefix_lines("one", "-- "), "-- one");
        assert_eq!(prefix_lines("one\ntwo", "-- "), "-- one\n-- two");
        assert_eq!(prefix_lines("", "-- "), "-- ");
    }

    #[test]
    fn test_render_header_and_messages() {
        let err = DeepError::new(2001, "Could not save", None)
            .with_debug_msg("disk quota exceeded")
            .with_debug_field("path", "/var/data")
            .with_debug_field("attempt", 3);
        let rendered = err.to_string();

        let header = rendered.lines().next().unwrap();
        assert!(header.starts_with("-- DeepError 2001 500 render.rs "), "{header}");
        assert!(header.ends_with(&format!("line: {}", err.line())), "{header}");
        assert!(rendered.contains("\n-- EndUserMsg: Could not save\n"));
        assert!(rendered.contains("\n-- DebugMsg: disk quota exceeded\n"));
        assert!(rendered.contains("\n-- DebugField[path]: /var/data\n"));
        assert!(rendered.contains("\n-- DebugField[attempt]: 3\n"));
        assert!(rendered.contains("\n-- StackTrace:\n"));
        assert!(rendered.ends_with("-- ParentError: nil"));
    }

    #[test]
    fn test_render_omits_empty_debug_msg() {
        let rendered = DeepError::new(2002, "plain", None).to_string();
        assert!(!rendered.contains("DebugMsg"));
    }

    #[test]
    fn test_render_nested_cause_is_prefixed() {
        let inner = DeepError::wrap(2003, "inner failure", io::Error::other("socket closed"));
        let inner_rendering = inner.to_string();
        let outer = DeepError::new(2004, "outer failure", Some(inner.into_cause()));
        let rendered = outer.to_string();

        let (_, nested) = rendered
            .split_once("-- ParentError:\n")
            .expect("cause section present");

        assert_eq!(nested.lines().count(), inner_rendering.lines().count());
        for (nested_line, inner_line) in nested.lines().zip(inner_rendering.lines()) {
            assert_eq!(nested_line, format!("{NESTING_MARKER}{inner_line}"));
        }
        assert!(nested.starts_with("-- -- DeepError 2003 "));
        assert!(nested.ends_with("-- -- ParentError:\n-- -- socket closed"));
    }

    #[test]
    fn test_render_foreign_cause() {
        let err = DeepError::wrap(2005, "read failed", io::Error::other("eof"));
        assert!(err.to_string().ends_with("-- ParentError:\n-- eof"));
    }
}
