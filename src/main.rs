//! # structmerge CLI
//!
//! This is the binary entry point for the `structmerge` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initialising logging from the global `--log-level` flag.
//! - Executing the selected subcommand and reporting fatal errors.
//!
//! The merge logic lives in the library crate; the binary is a thin wrapper
//! that reads files, builds settings and writes the result.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
