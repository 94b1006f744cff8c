//! # Classify Command Implementation
//!
//! Implements the `classify` subcommand, which prints the shape category of a
//! document's root and of each of its top-level children, one per line as
//! `LABEL<TAB>CATEGORY`. Useful for checking how a settings file's fractal
//! policy treats a document before merging it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use structmerge::format::{classify_document, Format};

use super::{load_settings, read_document, resolve_format};

/// Show how a document and its top-level children are classified
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Document to classify.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Document format. Detected from the extension when omitted.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<Format>,

    /// YAML or TOML settings file; only the fractal settings are used.
    #[arg(short, long, value_name = "FILE", env = "STRUCTMERGE_SETTINGS")]
    pub settings: Option<PathBuf>,
}

/// Execute the `classify` command.
pub fn execute(args: ClassifyArgs) -> Result<()> {
    let format = resolve_format(args.format, &args.file)?;
    let settings = load_settings(args.settings.as_ref())?;
    let text = read_document(&args.file)?;

    let shapes = classify_document(format, &text, &settings)
        .with_context(|| format!("Failed to classify {}", args.file.display()))?;
    for (label, category) in shapes {
        println!("{}\t{}", label, category);
    }
    Ok(())
}
