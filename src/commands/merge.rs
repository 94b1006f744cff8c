//! # Merge Command Implementation
//!
//! Implements the `merge` subcommand: read two documents of the same format,
//! merge the right one into the left one and write the result to stdout or a
//! file.
//!
//! Rules given on the command line are added after those from `--settings`,
//! so a `--merger` flag overrides a settings-file merger for the same type
//! pair.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use structmerge::format::{merge_documents, Format};
use structmerge::settings::{MergerRule, StopRule};

use super::{load_settings, read_document, resolve_format};

/// Merge two documents of the same format
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Left-hand document. Its values come first in conflict pairs.
    #[arg(value_name = "LHS")]
    pub lhs: PathBuf,

    /// Right-hand document, merged into the left one.
    #[arg(value_name = "RHS")]
    pub rhs: PathBuf,

    /// Document format. Detected from the LHS extension when omitted.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<Format>,

    /// Write the merged document here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// YAML or TOML file with stop rules, mergers and fractal settings.
    #[arg(short, long, value_name = "FILE", env = "STRUCTMERGE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Stop merging at a type and depth, e.g. `list@2`. Repeatable.
    #[arg(long = "stop-on", value_name = "TYPE@DEPTH")]
    pub stop_on: Vec<StopRule>,

    /// Combine scalars of a type pair with a strategy, e.g. `int,int=sum`.
    /// Repeatable.
    #[arg(long = "merger", value_name = "LHS,RHS=STRATEGY")]
    pub mergers: Vec<MergerRule>,

    /// How many levels the fractal probe follows.
    #[arg(long, value_name = "N")]
    pub fractal_check_depth: Option<usize>,
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs) -> Result<()> {
    let format = resolve_format(args.format, &args.lhs)?;

    let mut settings = load_settings(args.settings.as_ref())?;
    settings.extend(args.stop_on, args.mergers);
    if let Some(depth) = args.fractal_check_depth {
        settings.fractal_check_depth = Some(depth);
    }

    let lhs = read_document(&args.lhs)?;
    let rhs = read_document(&args.rhs)?;

    info!(
        "Merging {} into {} as {}",
        args.rhs.display(),
        args.lhs.display(),
        format
    );
    let merged = merge_documents(format, &lhs, &rhs, &settings).with_context(|| {
        format!(
            "Failed to merge {} into {}",
            args.rhs.display(),
            args.lhs.display()
        )
    })?;

    match &args.output {
        Some(path) => {
            fs::write(path, &merged)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote merged document to {}", path.display());
        }
        None => print!("{}", merged),
    }
    Ok(())
}
