//! # Error Handling
//!
//! This module defines the centralized error type for `structmerge`. It uses
//! the `thiserror` library to describe every way a merge, a settings file, or
//! a document codec can fail.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all fatal failures. A fatal failure always
//!   reaches the caller of [`crate::merge::merge`]; it is never used to steer
//!   the recursion. The recoverable "stop merging this branch" outcome is a
//!   separate value, [`crate::merge::Step::Stopped`], and never appears here.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Merge failures carry the rendered path of the node where they happened
//! (`servers[0].host`, or `<root>` for the top level) so that a failure deep
//! inside a large document can be located.

use thiserror::Error;

use crate::shape::{ShapeCategory, TypeTag};

/// Main error type for structmerge operations
#[derive(Error, Debug)]
pub enum Error {
    /// Two scalars met at the top level and no merger is registered for
    /// their type pair. There is no parent container to record the conflict.
    #[error("No merge behavior provided for types {lhs} and {rhs}")]
    NoMergeBehavior { lhs: TypeTag, rhs: TypeTag },

    /// A mapping on the left was paired with a scalar on the right. A mapping
    /// has no slot that could absorb a bare value, so this is fatal at any depth.
    #[error("Cannot merge basic types 'mapping-like' and 'scalar' at {path} (rhs type: {rhs})")]
    MappingWithScalar { path: String, rhs: TypeTag },

    /// A mapping was paired with a sequence or set on the right, or a
    /// sequence with a mapping on the right.
    #[error("Cannot merge basic types '{lhs}' and '{rhs}' at {path}")]
    IncompatibleShapes {
        path: String,
        lhs: ShapeCategory,
        rhs: ShapeCategory,
    },

    /// A stop rule matched the top-level call, where no parent exists to
    /// handle the stop.
    #[error("Merge stopped at the top level: stop rule matched type {type_tag} at depth 0")]
    StoppedAtRoot { type_tag: TypeTag },

    /// Declarative merge settings were invalid.
    #[error("Invalid merge settings: {message}")]
    Settings { message: String },

    /// A document could not be parsed.
    #[error("Failed to parse {format} document: {message}")]
    Parse { format: String, message: String },

    /// A merged document could not be serialized.
    #[error("Failed to serialize {format} document: {message}")]
    Serialize { format: String, message: String },

    /// The document format could not be determined from a file name.
    #[error("Unsupported document format: {path}")]
    UnsupportedFormat { path: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
