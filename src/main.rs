//! Stubgraph CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stubgraph::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG takes precedence over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    cli::run(cli)
}
