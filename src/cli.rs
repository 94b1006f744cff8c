//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// structmerge - Deep-merge structured documents
#[derive(Parser, Debug)]
#[command(name = "structmerge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge two documents of the same format
    Merge(commands::merge::MergeArgs),

    /// Show how a document and its top-level children are classified
    Classify(commands::classify::ClassifyArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level);

        match self.command {
            Commands::Merge(args) => commands::merge::execute(args),
            Commands::Classify(args) => commands::classify::execute(args),
        }
    }
}

/// Log to stderr at `level`. `RUST_LOG`, when set, refines the filter.
fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A logger may already be installed when running under a test harness
    let _ = builder.try_init();
}
