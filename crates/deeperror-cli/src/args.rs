//! Command-line argument definitions for the deeperror CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the configuration file and the
//! logging verbosity; each [`Command`] describes one way of exercising a
//! [`DeepError`](deeperror::DeepError).

use clap::{Parser, Subcommand};

/// Command-line arguments for the deeperror tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the described error.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the multi-line rendering of the error to stdout
    Render(ErrorArgs),

    /// Fail with the error and report it as a diagnostic
    Raise(ErrorArgs),

    /// Log the error and terminate the process
    Fatal(ErrorArgs),

    /// Print every error level ordinal with its canonical name
    Levels,
}

impl Command {
    /// Short name used in log records.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Render(_) => "render",
            Command::Raise(_) => "raise",
            Command::Fatal(_) => "fatal",
            Command::Levels => "levels",
        }
    }
}

/// Description of the error to build.
#[derive(clap::Args, Debug, Clone)]
pub struct ErrorArgs {
    /// Numeric identifier of the error
    #[arg(short, long, allow_negative_numbers = true)]
    pub num: i64,

    /// End-user message
    #[arg(short, long, default_value = "")]
    pub message: String,

    /// HTTP status code; an empty message becomes its reason phrase
    #[arg(short, long)]
    pub status: Option<u16>,

    /// Internal debug message
    #[arg(long)]
    pub debug_msg: Option<String>,

    /// Debug field as KEY=VALUE (repeatable)
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Cause message, innermost first (repeatable)
    #[arg(long = "cause", value_name = "MESSAGE")]
    pub causes: Vec<String>,
}

impl ErrorArgs {
    /// Creates [`ErrorArgs`] with only an identifier and a message.
    pub fn new(num: i64, message: impl Into<String>) -> Self {
        Self {
            num,
            message: message.into(),
            status: None,
            debug_msg: None,
            fields: Vec::new(),
            causes: Vec::new(),
        }
    }
}
