//! # vaultstat
//!
//! **CLI Binary**
//!
//! Entry point for the `vaultstat` command-line application.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Resolve settings (vault file, then flags)
//! * Dispatch `scan` and `watch`
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

mod cli;
mod commands;
mod config;
mod error_hints;
mod format;
mod logging;
mod watcher;

use anyhow::{Context, Result};
use clap::Parser;

/// Entry point used by the `vaultstat` binary.
pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.global.verbose);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(commands::dispatch(cli))
}

/// Render an error chain with hints for the terminal.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}
