//! Severity levels for log filtering conventions.
//!
//! The convention is `TRACE < DEBUG < INFO < WARN < ERROR < FATAL` in terms
//! of importance, while the ordinals count the other way so that a larger
//! ordinal is more verbose. [`ErrorLevel`] is a standalone mapping between
//! those ordinals and their canonical names and carries no relationship to
//! the fields of [`DeepError`](crate::DeepError).
//!
//! Two total functions cover the untyped boundary:
//! - [`level_name`] maps any ordinal to a name, or [`UNKNOWN_LEVEL_NAME`].
//! - [`level_ordinal`] maps any name to an ordinal, or [`INVALID_LEVEL`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name returned for ordinals outside the known range.
pub const UNKNOWN_LEVEL_NAME: &str = "<UNKNOWN ERROR LEVEL STRING>";

/// Ordinal returned for names that do not match any level.
pub const INVALID_LEVEL: i32 = -1;

/// An ordinal severity level.
///
/// `Undefined` is the zero value. Later versions may add levels above
/// `Trace`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum ErrorLevel {
    /// Default value for uninitialized settings.
    #[default]
    #[serde(rename = "UNDEF")]
    Undefined = 0,
    #[serde(rename = "OFF")]
    Off = 1,
    #[serde(rename = "FATAL")]
    Fatal = 2,
    #[serde(rename = "ERROR")]
    Error = 3,
    #[serde(rename = "WARN")]
    Warn = 4,
    #[serde(rename = "INFO")]
    Info = 5,
    #[serde(rename = "DEBUG")]
    Debug = 6,
    #[serde(rename = "TRACE")]
    Trace = 7,
}

/// Error returned when parsing a name that is not a canonical level name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error level `{0}`")]
pub struct UnknownLevel(pub String);

impl ErrorLevel {
    /// Every level, in ordinal order.
    pub const ALL: [ErrorLevel; 8] = [
        ErrorLevel::Undefined,
        ErrorLevel::Off,
        ErrorLevel::Fatal,
        ErrorLevel::Error,
        ErrorLevel::Warn,
        ErrorLevel::Info,
        ErrorLevel::Debug,
        ErrorLevel::Trace,
    ];

    /// Look up the level for an ordinal, if it is in range.
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Returns the numeric ordinal of this level.
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Returns the canonical uppercase name (e.g., "WARN").
    pub fn name(self) -> &'static str {
        match self {
            ErrorLevel::Undefined => "UNDEF",
            ErrorLevel::Off => "OFF",
            ErrorLevel::Fatal => "FATAL",
            ErrorLevel::Error => "ERROR",
            ErrorLevel::Warn => "WARN",
            ErrorLevel::Info => "INFO",
            ErrorLevel::Debug => "DEBUG",
            ErrorLevel::Trace => "TRACE",
        }
    }

    /// The `log` level used when emitting at this severity.
    ///
    /// `Undefined` and `Off` do not emit anything.
    pub fn to_log_level(self) -> Option<log::Level> {
        match self {
            ErrorLevel::Undefined | ErrorLevel::Off => None,
            ErrorLevel::Fatal | ErrorLevel::Error => Some(log::Level::Error),
            ErrorLevel::Warn => Some(log::Level::Warn),
            ErrorLevel::Info => Some(log::Level::Info),
            ErrorLevel::Debug => Some(log::Level::Debug),
            ErrorLevel::Trace => Some(log::Level::Trace),
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

/// Canonical name for an ordinal, or [`UNKNOWN_LEVEL_NAME`] when out of range.
pub fn level_name(ordinal: i32) -> &'static str {
    ErrorLevel::from_ordinal(ordinal).map_or(UNKNOWN_LEVEL_NAME, ErrorLevel::name)
}

/// Ordinal for a canonical name, or [`INVALID_LEVEL`] when unrecognized.
pub fn level_ordinal(name: &str) -> i32 {
    name.parse::<ErrorLevel>()
        .map_or(INVALID_LEVEL, ErrorLevel::ordinal)
}
