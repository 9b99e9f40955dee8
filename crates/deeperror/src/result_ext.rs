//! Wrapping `Err` values into [`DeepError`] at propagation points.

use std::{error::Error, panic::Location, sync::Arc};

use crate::DeepError;

/// Extension trait for turning any `Result` error into a [`DeepError`].
///
/// The new error is attributed to the caller of the extension method, and
/// the original error becomes its cause.
///
/// ```
/// use std::fs;
///
/// use deeperror::ResultExt;
///
/// let err = fs::read_to_string("/definitely/not/here.toml")
///     .deep_context(3_300_001, "Could not read settings")
///     .unwrap_err();
///
/// assert_eq!(err.num(), 3_300_001);
/// assert!(err.has_cause::<std::io::Error>());
/// ```
pub trait ResultExt<T> {
    /// Wrap the error as the cause of a new [`DeepError`].
    fn deep_context(self, num: i64, end_user_msg: impl Into<String>) -> Result<T, DeepError>;

    /// Like [`ResultExt::deep_context`], with an explicit status code.
    fn deep_http_context(
        self,
        num: i64,
        end_user_msg: impl Into<String>,
        status_code: u16,
    ) -> Result<T, DeepError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    #[track_caller]
    fn deep_context(self, num: i64, end_user_msg: impl Into<String>) -> Result<T, DeepError> {
        let location = Location::caller();
        self.map_err(|err| {
            DeepError::build(num, end_user_msg.into(), Some(Arc::new(err)), location, 0)
        })
    }

    #[track_caller]
    fn deep_http_context(
        self,
        num: i64,
        end_user_msg: impl Into<String>,
        status_code: u16,
    ) -> Result<T, DeepError> {
        let location = Location::caller();
        self.map_err(|err| {
            let mut deep =
                DeepError::build(num, end_user_msg.into(), Some(Arc::new(err)), location, 0);
            deep.apply_http_status(status_code);
            deep
        })
    }
}
