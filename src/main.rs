#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! minicat — compile a node's catalog locally with an overridable class list.

mod catalog;
mod cli;
mod commands;
mod config;
mod terminus;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use catalog::CatalogError;
use cli::{Cli, OutputCtx, write_error};
use config::Config;
use types::ErrorOutput;

/// Initialise tracing-based logging on stderr.
///
/// Uses `RUST_LOG` if set, otherwise defaults based on verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli, ctx: &OutputCtx) -> Result<(), CatalogError> {
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.overrides());
    commands::dispatch(&cli.command, ctx, &config)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let ctx = OutputCtx::new(cli.output, cli.quiet);

    if let Err(err) = run(&cli, &ctx) {
        tracing::debug!(error = ?err, "command failed");
        write_error(&ErrorOutput::from_catalog_error(&err), cli.output);
        std::process::exit(err.exit_code());
    }
}
