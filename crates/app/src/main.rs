//! Chartpatch - Main Entry Point
//!
//! Reads a transformer configuration and a manifest stream, applies the
//! chart overrides and writes the patched stream.

mod cli;

use std::io::{self, IsTerminal};

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only the manifests
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();

    let cli = Cli::parse();
    let report = cli::run(&cli)?;

    tracing::debug!(
        patched = report.patched.len(),
        skipped = report.skipped.len(),
        "chartpatch finished"
    );
    Ok(())
}
