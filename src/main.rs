#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! alsweep — run active-learning simulations over every combination of model settings.

mod cli;
mod commands;
mod sweep;
mod types;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputCtx, write_error};
use types::ErrorOutput;

/// Install the stderr log subscriber. `RUST_LOG` overrides the level.
fn init_logging(debug: bool) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).context("building log filter")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.debug) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }

    let ctx = OutputCtx::new(cli.format, cli.json, cli.no_header);

    if let Err(err) = commands::dispatch(&cli, &ctx) {
        write_error(&ErrorOutput::from_sweep_error(&err), ctx.format);
        std::process::exit(err.exit_code());
    }
}
