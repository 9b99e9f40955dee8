//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between [`DeepError`] chains and miette's
//! rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`CliError::Deep`] is rendered as one report per link of its cause
//! chain, outermost first.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use deeperror::DeepError;

use crate::{CliError, ConfigError};

/// Adapter for a single [`DeepError`] link.
///
/// The error id becomes the diagnostic code (`deeperror::{num}`) and the
/// debug message, when present, becomes the help text.
pub struct DeepErrorAdapter<'a> {
    err: &'a DeepError,
    code: String,
}

impl<'a> DeepErrorAdapter<'a> {
    /// Create a new adapter for `err`.
    pub fn new(err: &'a DeepError) -> Self {
        Self {
            err,
            code: format!("deeperror::{}", err.num()),
        }
    }
}

impl fmt::Debug for DeepErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepErrorAdapter")
            .field("num", &self.err.num())
            .finish()
    }
}

impl fmt::Display for DeepErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (status {}, {}:{})",
            self.err.end_user_msg(),
            self.err.status_code(),
            self.err.filename(),
            self.err.line()
        )
    }
}

impl std::error::Error for DeepErrorAdapter<'_> {}

impl MietteDiagnostic for DeepErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code) as Box<dyn fmt::Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let debug_msg = self.err.debug_msg();
        if debug_msg.is_empty() {
            return None;
        }
        Some(Box::new(debug_msg) as Box<dyn fmt::Display + 'a>)
    }
}

/// Adapter for errors that carry no diagnostic information.
///
/// This covers foreign causes inside a chain as well as configuration, I/O,
/// and argument errors raised by the CLI itself.
pub struct ErrorAdapter<'a> {
    err: &'a (dyn std::error::Error + 'static),
    code: Option<&'static str>,
}

impl<'a> ErrorAdapter<'a> {
    /// Create a new adapter with an optional diagnostic code.
    pub fn new(err: &'a (dyn std::error::Error + 'static), code: Option<&'static str>) -> Self {
        Self { err, code }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.err, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code.map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A link that is itself a [`DeepError`].
    Deep(DeepErrorAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Deep(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Deep(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Deep(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`CliError`] into a list of reportable errors.
///
/// For [`CliError::Deep`], this returns one [`Reportable`] for each link of
/// the cause chain. For other variants, this returns a single [`Reportable`].
pub fn to_reportables(err: &CliError) -> Vec<Reportable<'_>> {
    match err {
        CliError::Deep(deep) => deep
            .chain()
            .map(|link| match link.downcast_ref::<DeepError>() {
                Some(deep) => Reportable::Deep(DeepErrorAdapter::new(deep)),
                None => Reportable::Error(ErrorAdapter::new(link, None)),
            })
            .collect(),
        CliError::Config(config_err) => {
            let code = match config_err {
                ConfigError::MissingFile(_) => "deeperror::config::missing",
                ConfigError::Read { .. } => "deeperror::config::read",
                ConfigError::Parse { .. } => "deeperror::config::parse",
            };
            vec![Reportable::Error(ErrorAdapter::new(err, Some(code)))]
        }
        CliError::InvalidField(_) => vec![Reportable::Error(ErrorAdapter::new(
            err,
            Some("deeperror::field"),
        ))],
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use miette::{GraphicalReportHandler, GraphicalTheme};

    use super::*;

    #[test]
    fn test_deep_chain_is_split_per_link() {
        let inner = DeepError::wrap(8001, "inner", io::Error::other("eof"))
            .with_debug_msg("socket closed early");
        let outer = DeepError::new(8002, "outer", Some(inner.into_cause()));
        let err = CliError::Deep(outer);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 3);

        match &reportables[0] {
            Reportable::Deep(d) => {
                assert!(d.to_string().starts_with("outer (status 500, error_adapter.rs:"));
                assert_eq!(d.code().unwrap().to_string(), "deeperror::8002");
                assert!(d.help().is_none());
            }
            Reportable::Error(_) => panic!("Expected Deep"),
        }

        match &reportables[1] {
            Reportable::Deep(d) => {
                assert_eq!(d.code().unwrap().to_string(), "deeperror::8001");
                assert_eq!(d.help().unwrap().to_string(), "socket closed early");
            }
            Reportable::Error(_) => panic!("Expected Deep"),
        }

        match &reportables[2] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "eof");
                assert!(e.code().is_none());
            }
            Reportable::Deep(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_config_error_has_code() {
        let err = CliError::Config(ConfigError::MissingFile(PathBuf::from("nope.toml")));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        assert_eq!(
            reportables[0].to_string(),
            "Missing configuration file: nope.toml"
        );
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "deeperror::config::missing"
        );
    }

    #[test]
    fn test_render_with_graphical_handler() {
        let err = CliError::InvalidField("oops".to_string());
        let reporter =
            GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());

        for reportable in to_reportables(&err) {
            let mut writer = String::new();
            reporter.render_report(&mut writer, &reportable).unwrap();
            assert!(writer.contains("Invalid debug field `oops`"));
            assert!(writer.contains("deeperror::field"));
        }
    }
}
