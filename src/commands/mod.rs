//! # CLI Command Implementations
//!
//! Each subcommand of the `structmerge` tool lives in its own file with:
//! - An `Args` struct defining the command's arguments, derived using `clap`.
//! - An `execute` function taking the parsed `Args` and calling into the
//!   `structmerge` library.

pub mod classify;
pub mod merge;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use structmerge::format::Format;
use structmerge::settings::MergeSettings;

/// Resolve the document format from an explicit flag or the file extension.
pub(crate) fn resolve_format(explicit: Option<Format>, path: &Path) -> Result<Format> {
    match explicit {
        Some(format) => Ok(format),
        None => Format::from_path(path).with_context(|| {
            format!(
                "Cannot detect the format of {}; pass --format json|yaml|toml",
                path.display()
            )
        }),
    }
}

/// Load settings from an optional file.
pub(crate) fn load_settings(path: Option<&PathBuf>) -> Result<MergeSettings> {
    match path {
        Some(path) => MergeSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(MergeSettings::default()),
    }
}

pub(crate) fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
