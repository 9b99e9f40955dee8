//! deeperror CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, info, warn};
use miette::GraphicalReportHandler;

use deeperror_cli::{Args, CliError, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match deeperror_cli::run(&args) {
        Ok(()) => info!("Completed successfully"),
        Err(err) => {
            report(&err);
            process::exit(1);
        }
    }
}

/// Install `env_logger` filtered at `level`, falling back to `warn`.
fn init_logger(level: &str) {
    let filter = LevelFilter::from_str(level).ok();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter.unwrap_or(LevelFilter::Warn))
        .init();

    if filter.is_none() {
        warn!(requested = level; "Invalid log level, using 'warn'");
    }
}

/// Write one diagnostic per reportable error to stderr.
///
/// Reports bypass the logger so `--log-level off` never hides why the
/// process failed.
fn report(err: &CliError) {
    let reporter = GraphicalReportHandler::new();

    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        match reporter.render_report(&mut rendered, &reportable) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("{reportable}"),
        }
    }
}
