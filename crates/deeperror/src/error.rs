//! The augmented error type.
//!
//! A [`DeepError`] records where it was created, the stack at that moment,
//! a message that is safe to show end users, an optional internal debug
//! message, free-form debug fields, an HTTP-style status code, and the
//! error that caused it.

use std::{collections::BTreeMap, error::Error, panic::Location, sync::Arc};

use serde_json::Value;

use crate::{
    logging,
    site::{self, CallSite},
};

/// Shared handle to a causing error.
///
/// Causes are reference counted so the same error can sit in several
/// chains at once.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// Status code used when neither the caller nor the cause provides one.
pub const DEFAULT_STATUS_CODE: u16 = 500;

/// End-user message of errors built by [`DeepError::todo`].
pub const TODO_MESSAGE: &str = "TODO";

/// An error enriched with diagnostic context.
///
/// Construction never fails: call-site and stack introspection are best
/// effort and leave their fields empty when unavailable.
///
/// # Example
///
/// ```
/// use std::io;
///
/// use deeperror::DeepError;
///
/// let io_err = io::Error::new(io::ErrorKind::NotFound, "users.db missing");
/// let mut err = DeepError::wrap(4_107_221, "Could not load your profile", io_err)
///     .with_debug_msg("user store unavailable");
/// err.add_debug_field("user_id", 42);
///
/// assert_eq!(err.status_code(), 500);
/// assert!(err.find_cause::<io::Error>().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct DeepError {
    num: i64,
    site: CallSite,
    end_user_msg: String,
    debug_msg: String,
    debug_fields: BTreeMap<String, Value>,
    cause: Option<Cause>,
    status_code: u16,
    stack_trace: String,
}

impl DeepError {
    /// Create an error attributed to the immediate caller.
    ///
    /// The status code is inherited from `cause` when it is itself a
    /// `DeepError`, and is [`DEFAULT_STATUS_CODE`] otherwise.
    #[track_caller]
    pub fn new(num: i64, end_user_msg: impl Into<String>, cause: Option<Cause>) -> Self {
        Self::build(num, end_user_msg.into(), cause, Location::caller(), 0)
    }

    /// Create an error attributed to a frame `skip` levels above the caller.
    ///
    /// `skip == 0` behaves like [`DeepError::new`]. For larger values the
    /// location is read from the captured stack and stays empty if that
    /// frame cannot be resolved.
    #[track_caller]
    pub fn new_with_skip(
        num: i64,
        end_user_msg: impl Into<String>,
        cause: Option<Cause>,
        skip: usize,
    ) -> Self {
        Self::build(num, end_user_msg.into(), cause, Location::caller(), skip)
    }

    /// Create an error caused by `err`.
    #[track_caller]
    pub fn wrap<E>(num: i64, end_user_msg: impl Into<String>, err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::new(num, end_user_msg, Some(Arc::new(err)))
    }

    /// Create an error with an explicit HTTP status code.
    ///
    /// An empty `end_user_msg` is replaced by the canonical reason phrase
    /// for `status_code`. A `status_code` of `0` keeps the inherited or
    /// default code.
    ///
    /// ```
    /// use deeperror::DeepError;
    ///
    /// let err = DeepError::new_http(4_040_001, "", None, 404);
    /// assert_eq!(err.end_user_msg(), "Not Found");
    /// ```
    #[track_caller]
    pub fn new_http(
        num: i64,
        end_user_msg: impl Into<String>,
        cause: Option<Cause>,
        status_code: u16,
    ) -> Self {
        let mut err = Self::new(num, end_user_msg, cause);
        err.apply_http_status(status_code);
        err
    }

    /// Create a placeholder error for unhandled code paths.
    ///
    /// The end-user message is [`TODO_MESSAGE`] and each value is stored as a
    /// debug field keyed by its position. See also [`deep_todo!`](crate::deep_todo).
    #[track_caller]
    pub fn todo<I>(num: i64, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut err = Self::new(num, TODO_MESSAGE, None);
        for (idx, value) in values.into_iter().enumerate() {
            err.add_debug_field(idx.to_string(), value);
        }
        err
    }

    /// Create an error only if there is a cause to wrap.
    ///
    /// ```
    /// use deeperror::DeepError;
    ///
    /// assert!(DeepError::new_or_none(7, "unused", None).is_none());
    /// ```
    #[track_caller]
    pub fn new_or_none(
        num: i64,
        end_user_msg: impl Into<String>,
        cause: Option<Cause>,
    ) -> Option<Self> {
        let location = Location::caller();
        cause.map(|cause| Self::build(num, end_user_msg.into(), Some(cause), location, 0))
    }

    /// Override the status and fill an empty message with its reason phrase.
    pub(crate) fn apply_http_status(&mut self, status_code: u16) {
        self.set_status_code(status_code);
        if self.end_user_msg.is_empty() {
            self.end_user_msg = status_text(self.status_code).to_string();
        }
    }

    pub(crate) fn build(
        num: i64,
        end_user_msg: String,
        cause: Option<Cause>,
        location: &Location<'_>,
        skip: usize,
    ) -> Self {
        let status_code = cause
            .as_deref()
            .and_then(|cause| cause.downcast_ref::<DeepError>())
            .map_or(DEFAULT_STATUS_CODE, DeepError::status_code);

        let capture = site::capture(location, skip, logging::stack_trace_limit());

        let err = Self {
            num,
            site: capture.site,
            end_user_msg,
            debug_msg: String::new(),
            debug_fields: BTreeMap::new(),
            cause,
            status_code,
            stack_trace: capture.stack_trace,
        };

        logging::log_on_construction(&err);
        err
    }
}

// Accessors
impl DeepError {
    /// Caller-assigned identifier of the error site.
    pub fn num(&self) -> i64 {
        self.num
    }

    /// Location the error is attributed to.
    pub fn call_site(&self) -> &CallSite {
        &self.site
    }

    /// File basename of the call site, or empty if unknown.
    pub fn filename(&self) -> &str {
        self.site.filename()
    }

    /// Function path of the call site, or empty if unknown.
    pub fn calling_method(&self) -> &str {
        self.site.calling_method()
    }

    /// Line of the call site, or `0` if unknown.
    pub fn line(&self) -> u32 {
        self.site.line()
    }

    pub fn end_user_msg(&self) -> &str {
        &self.end_user_msg
    }

    /// Internal message; empty when none was set.
    pub fn debug_msg(&self) -> &str {
        &self.debug_msg
    }

    pub fn debug_fields(&self) -> &BTreeMap<String, Value> {
        &self.debug_fields
    }

    pub fn debug_field(&self, key: &str) -> Option<&Value> {
        self.debug_fields.get(key)
    }

    /// The immediate cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns `true` if the status code is [`DEFAULT_STATUS_CODE`].
    pub fn status_code_is_default(&self) -> bool {
        self.status_code == DEFAULT_STATUS_CODE
    }

    /// Stack trace captured at construction, possibly truncated.
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }
}

// Post-construction mutation
impl DeepError {
    /// Insert a debug field, replacing any previous value under `key`.
    pub fn add_debug_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.debug_fields.insert(key.into(), value.into());
    }

    /// Builder form of [`DeepError::add_debug_field`].
    pub fn with_debug_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_debug_field(key, value);
        self
    }

    pub fn set_debug_msg(&mut self, debug_msg: impl Into<String>) {
        self.debug_msg = debug_msg.into();
    }

    pub fn with_debug_msg(mut self, debug_msg: impl Into<String>) -> Self {
        self.set_debug_msg(debug_msg);
        self
    }

    /// Override the status code. `0` is ignored.
    pub fn set_status_code(&mut self, status_code: u16) {
        if status_code != 0 {
            self.status_code = status_code;
        }
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.set_status_code(status_code);
        self
    }

    /// Convert into a shareable [`Cause`] for wrapping by another error.
    pub fn into_cause(self) -> Cause {
        Arc::new(self)
    }
}

// Chain walking
impl DeepError {
    /// Iterate over this error followed by every error in its cause chain.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// The first error below this one in the chain that is a `T`.
    pub fn find_cause<T>(&self) -> Option<&T>
    where
        T: Error + 'static,
    {
        self.chain().skip(1).find_map(|err| err.downcast_ref::<T>())
    }

    /// Returns `true` if any error below this one in the chain is a `T`.
    pub fn has_cause<T>(&self) -> bool
    where
        T: Error + 'static,
    {
        self.find_cause::<T>().is_some()
    }
}

impl Error for DeepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Iterator over an error and its sources, outermost first.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Canonical reason phrase for an HTTP status code, or `""` if unknown.
pub fn status_text(status_code: u16) -> &'static str {
    http::StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or_default()
}
