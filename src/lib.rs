//! # Structural Deep-Merge Library
//!
//! `structmerge` merges two arbitrarily nested data trees into one. Mappings
//! are unioned key by key, sequences are merged position by position and
//! sets absorb each other's items. Scalars are combined by user-registered
//! mergers; when no merger exists the two values are kept side by side as a
//! two-element conflict pair instead of one silently overwriting the other.
//!
//! ## Quick Example
//!
//! ```
//! use structmerge::config::MergeConfig;
//! use structmerge::merge::merge;
//! use structmerge::shape::TypeTag;
//! use structmerge::value::Value;
//!
//! let lhs = Value::map([("hits", Value::from(1)), ("name", Value::from("api"))]);
//! let rhs = Value::map([("hits", Value::from(2)), ("name", Value::from("web"))]);
//!
//! let config = MergeConfig::new().with_merger(TypeTag::INT, TypeTag::INT, |l: &Value, r: &Value| {
//!     match (l, r) {
//!         (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
//!         _ => l.clone(),
//!     }
//! });
//!
//! let merged = merge(lhs, rhs, &config).unwrap();
//! assert_eq!(merged.get("hits"), Some(&Value::from(3)));
//! assert_eq!(
//!     merged.get("name"),
//!     Some(&Value::list([Value::from("api"), Value::from("web")]))
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Shapes (`shape`)**: Values are probed for capabilities and classified
//!   as mapping-like, sequence-like, set-like or scalar. Values that contain
//!   themselves all the way down, like strings whose characters are strings,
//!   are detected as fractal and treated as scalars.
//! - **Merge engine (`merge`)**: The recursive merge over any type
//!   implementing [`merge::Mergeable`], with backends for `serde_json`,
//!   `serde_yaml` and `toml` values.
//! - **Configuration (`config`, `settings`, `strategy`)**: Stop rules, scalar
//!   mergers and the fractal policy, built in code or loaded from a settings
//!   file that names built-in strategies.
//! - **Documents (`format`)**: Parse, merge and render whole documents.
//! - **Generic values (`value`)**: A small dynamic value type with a native
//!   set variant.

pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod settings;
pub mod shape;
pub mod strategy;
pub mod value;

#[cfg(test)]
mod merge_proptest;
