//! deeperror CLI library
//!
//! This module contains the core CLI logic: building a [`DeepError`] from
//! command-line arguments and rendering, raising, or aborting with it.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, ErrorArgs};
pub use config::{CONFIG_ENV, ConfigError, load_config};

use std::{fmt::Write as _, io, sync::Arc};

use log::{debug, info};
use thiserror::Error;

use deeperror::{Cause, DeepError, ErrorLevel};

/// Errors produced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid debug field `{0}`: expected KEY=VALUE")]
    InvalidField(String),

    #[error(transparent)]
    Deep(#[from] DeepError),
}

/// Run the deeperror CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - Malformed debug fields
/// - The error built by the `raise` command
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(command = args.command.name(); "Running command");

    let report_config = config::load_config(args.config.as_ref())?;
    report_config.apply();
    debug!(
        logging_enabled = report_config.logging().enabled(),
        trace_limit = report_config.trace().max_bytes();
        "Applied report configuration"
    );

    match &args.command {
        Command::Render(desc) => {
            let err = build_error(desc)?;
            println!("{err}");
        }
        Command::Raise(desc) => return Err(build_error(desc)?.into()),
        Command::Fatal(desc) => build_error(desc)?.fatal(),
        Command::Levels => print!("{}", levels_table()),
    }

    Ok(())
}

/// Build the error described by `desc`.
///
/// Causes are chained innermost first: the first one is an [`io::Error`],
/// every later one a [`DeepError`] wrapping the previous.
///
/// # Errors
///
/// Returns [`CliError::InvalidField`] if a field is not `KEY=VALUE`.
pub fn build_error(desc: &ErrorArgs) -> Result<DeepError, CliError> {
    let fields = desc
        .fields
        .iter()
        .map(|field| parse_field(field))
        .collect::<Result<Vec<_>, _>>()?;

    let cause = build_cause(desc);
    let mut err = match desc.status {
        Some(status) => DeepError::new_http(desc.num, desc.message.as_str(), cause, status),
        None => DeepError::new(desc.num, desc.message.as_str(), cause),
    };

    if let Some(debug_msg) = &desc.debug_msg {
        err.set_debug_msg(debug_msg.as_str());
    }
    for (key, value) in fields {
        err.add_debug_field(key, value);
    }

    Ok(err)
}

/// One line per level: ordinal, then canonical name.
pub fn levels_table() -> String {
    ErrorLevel::ALL
        .iter()
        .fold(String::new(), |mut table, level| {
            let _ = writeln!(table, "{} {}", level.ordinal(), level.name());
            table
        })
}

fn build_cause(desc: &ErrorArgs) -> Option<Cause> {
    let mut messages = desc.causes.iter();
    let innermost = messages.next()?;

    let mut cause: Cause = Arc::new(io::Error::other(innermost.clone()));
    for message in messages {
        cause = DeepError::new(desc.num, message.as_str(), Some(cause)).into_cause();
    }
    Some(cause)
}

fn parse_field(field: &str) -> Result<(&str, &str), CliError> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(CliError::InvalidField(field.to_string())),
    }
}
