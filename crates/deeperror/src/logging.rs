//! Process-wide logging policy for [`DeepError`] construction.
//!
//! When error logging is enabled, every newly constructed [`DeepError`] is
//! written to the [`log`] facade at the configured [`ErrorLevel`]. The host
//! application decides where records end up by installing a logger.
//!
//! All settings are atomics, so toggling them from one thread while another
//! constructs errors is well defined.
//!
//! # Example
//!
//! ```
//! use deeperror::{DeepError, exec_without_error_logging, set_error_logging_enabled};
//!
//! set_error_logging_enabled(true);
//!
//! // Errors built here are not logged, even though logging is enabled.
//! let err = exec_without_error_logging(|| DeepError::new(1001, "quiet", None));
//! assert_eq!(err.num(), 1001);
//!
//! assert!(deeperror::error_logging_enabled());
//! # set_error_logging_enabled(false);
//! ```

use std::{
    process,
    sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering},
};

use log::error;

use crate::{Cause, DeepError, ErrorLevel};

/// Default upper bound, in bytes, of a captured stack trace.
pub const DEFAULT_STACK_TRACE_LIMIT: usize = 4096;

/// Exit status used by [`fatal`].
pub const FATAL_EXIT_CODE: i32 = 1;

static ERROR_LOGGING_ENABLED: AtomicBool = AtomicBool::new(false);
static AUTO_LOG_LEVEL: AtomicI32 = AtomicI32::new(ErrorLevel::Error as i32);
static STACK_TRACE_LIMIT: AtomicUsize = AtomicUsize::new(DEFAULT_STACK_TRACE_LIMIT);

/// Returns `true` if new errors are logged on construction.
pub fn error_logging_enabled() -> bool {
    ERROR_LOGGING_ENABLED.load(Ordering::SeqCst)
}

/// Enable or disable logging on construction. Returns the previous value.
pub fn set_error_logging_enabled(enabled: bool) -> bool {
    ERROR_LOGGING_ENABLED.swap(enabled, Ordering::SeqCst)
}

/// The level at which errors are logged on construction.
pub fn auto_log_level() -> ErrorLevel {
    ErrorLevel::from_ordinal(AUTO_LOG_LEVEL.load(Ordering::Relaxed)).unwrap_or(ErrorLevel::Error)
}

/// Set the level at which errors are logged on construction.
///
/// `Undefined` and `Off` silence construction-time logging without
/// touching the enabled flag.
pub fn set_auto_log_level(level: ErrorLevel) {
    AUTO_LOG_LEVEL.store(level.ordinal(), Ordering::Relaxed);
}

/// Maximum number of bytes kept from a captured stack trace.
pub fn stack_trace_limit() -> usize {
    STACK_TRACE_LIMIT.load(Ordering::Relaxed)
}

/// Set the maximum number of bytes kept from a captured stack trace.
pub fn set_stack_trace_limit(bytes: usize) {
    STACK_TRACE_LIMIT.store(bytes, Ordering::Relaxed);
}

/// Guard that disables construction-time logging until dropped.
///
/// The previous flag value is restored on drop, which also runs while
/// unwinding out of a panicking scope.
#[must_use = "logging is re-enabled as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoggingSuppressed {
    previous: bool,
}

impl LoggingSuppressed {
    /// Disable logging and remember the current flag value.
    pub fn new() -> Self {
        Self {
            previous: set_error_logging_enabled(false),
        }
    }
}

impl Default for LoggingSuppressed {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoggingSuppressed {
    fn drop(&mut self) {
        ERROR_LOGGING_ENABLED.store(self.previous, Ordering::SeqCst);
    }
}

/// Run `action` with construction-time logging disabled.
///
/// The flag is restored afterwards, on every exit path.
pub fn exec_without_error_logging<R>(action: impl FnOnce() -> R) -> R {
    let _guard = LoggingSuppressed::new();
    action()
}

/// Log a freshly constructed error if the policy says so.
pub(crate) fn log_on_construction(err: &DeepError) {
    if !error_logging_enabled() {
        return;
    }
    if let Some(level) = auto_log_level().to_log_level() {
        log::log!(level, num = err.num(), status = err.status_code(); "{err}");
    }
}

/// Build a [`DeepError`], log it at error level, and terminate the process.
///
/// See [`DeepError::fatal`].
#[track_caller]
pub fn fatal(num: i64, end_user_msg: impl Into<String>, cause: Option<Cause>) -> ! {
    DeepError::new(num, end_user_msg, cause).fatal()
}

impl DeepError {
    /// Log this error at error level and terminate the process.
    ///
    /// The logger is flushed before exiting with [`FATAL_EXIT_CODE`]. When
    /// no installed logger accepts error records, the rendering is written
    /// to stderr instead, so it is never lost.
    pub fn fatal(self) -> ! {
        if log::log_enabled!(log::Level::Error) {
            error!(num = self.num(), status = self.status_code(); "{}", self);
            log::logger().flush();
        } else {
            eprintln!("{}", self);
        }
        process::exit(FATAL_EXIT_CODE)
    }
}
