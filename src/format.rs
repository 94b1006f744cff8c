//! # Document Formats
//!
//! Text-level entry points over the value backends in [`crate::merge`]. A
//! [`Format`] picks the backend, the document is parsed, merged or classified
//! with a configuration built from [`MergeSettings`], and written back out.
//!
//! ```
//! use structmerge::format::{merge_documents, Format};
//! use structmerge::settings::MergeSettings;
//!
//! let merged = merge_documents(
//!     Format::Json,
//!     r#"{"tags": ["a"]}"#,
//!     r#"{"tags": ["b"], "name": "web"}"#,
//!     &MergeSettings::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(merged, "{\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ],\n  \"name\": \"web\"\n}\n");
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{Error, Result};
use crate::merge::{self, json, toml, yaml, Mergeable};
use crate::settings::MergeSettings;
use crate::shape::{classify, ShapeCategory};
use crate::strategy::ScalarAccess;

/// A supported document format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFormat` for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| Error::UnsupportedFormat {
                path: path.display().to_string(),
            })
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            _ => Err(Error::UnsupportedFormat {
                path: s.to_string(),
            }),
        }
    }
}

/// Merge two documents of the same format and render the result.
///
/// The output always ends with a newline.
///
/// # Errors
///
/// Returns an error if either document fails to parse, the settings are
/// invalid, the merge fails, or the result cannot be rendered.
pub fn merge_documents(
    format: Format,
    lhs: &str,
    rhs: &str,
    settings: &MergeSettings,
) -> Result<String> {
    debug!("Merging {} documents", format);
    let rendered = match format {
        Format::Json => json::render(&merge_parsed(json::parse(lhs)?, json::parse(rhs)?, settings)?)?,
        Format::Yaml => yaml::render(&merge_parsed(yaml::parse(lhs)?, yaml::parse(rhs)?, settings)?)?,
        Format::Toml => toml::render(&merge_parsed(toml::parse(lhs)?, toml::parse(rhs)?, settings)?)?,
    };
    Ok(ensure_trailing_newline(rendered))
}

/// Classify a document's root and each of its direct children.
///
/// The first entry is labelled `<root>`. Children of a mapping are labelled
/// by key, children of a sequence or set by `[index]`.
///
/// # Errors
///
/// Returns an error if the document fails to parse or the settings are
/// invalid.
pub fn classify_document(
    format: Format,
    text: &str,
    settings: &MergeSettings,
) -> Result<Vec<(String, ShapeCategory)>> {
    match format {
        Format::Json => classify_parsed(json::parse(text)?, settings),
        Format::Yaml => classify_parsed(yaml::parse(text)?, settings),
        Format::Toml => classify_parsed(toml::parse(text)?, settings),
    }
}

fn merge_parsed<V>(lhs: V, rhs: V, settings: &MergeSettings) -> Result<V>
where
    V: Mergeable + ScalarAccess + 'static,
{
    let config = settings.to_config::<V>()?;
    merge::merge(lhs, rhs, &config)
}

fn classify_parsed<V>(value: V, settings: &MergeSettings) -> Result<Vec<(String, ShapeCategory)>>
where
    V: Mergeable + ScalarAccess + 'static,
{
    let config = settings.to_config::<V>()?;
    let policy = config.fractals();

    let root = classify(&value, policy);
    let mut shapes = vec![(merge::render_path(&[]), root)];
    match root {
        ShapeCategory::MappingLike => {
            for (key, child) in value.into_entries() {
                shapes.push((V::key_label(&key), classify(&child, policy)));
            }
        }
        ShapeCategory::SequenceLike | ShapeCategory::SetLike => {
            for (index, child) in value.into_items().into_iter().enumerate() {
                shapes.push((format!("[{}]", index), classify(&child, policy)));
            }
        }
        ShapeCategory::Scalar => {}
    }
    Ok(shapes)
}

fn ensure_trailing_newline(mut content: String) -> String {
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content
}
