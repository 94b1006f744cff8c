//! # Shape Classification
//!
//! This module decides the *practical* structural category of a value: does
//! it behave like a mapping, an ordered sequence, an unordered collection, or
//! an opaque scalar? The decision is made by probing capabilities through the
//! [`Probe`] trait rather than by matching on a fixed list of types, so any
//! container-like type can take part in a merge by implementing the probes it
//! supports.
//!
//! ## Decision Order
//!
//! The first matching rule wins:
//!
//! 1. A value that is a native mapping, or that can enumerate keys, is
//!    [`ShapeCategory::MappingLike`].
//! 2. A native sequence is [`ShapeCategory::SequenceLike`]. A value that
//!    allows reading index 0 is `SequenceLike` too, unless its type is a known
//!    fractal or it is fractal by probe, in which case it is
//!    [`ShapeCategory::Scalar`].
//! 3. A value that can be iterated is [`ShapeCategory::SetLike`].
//! 4. Everything else is `Scalar`.
//!
//! ## Fractal Values
//!
//! A fractal (self-similar) value yields more values of its own type when
//! iterated: the first character of a string is itself a string. Recursing
//! into such a value would never bottom out, so it must be treated as atomic.
//! [`is_fractal`] detects this by following "first element" links up to a
//! bounded depth.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The structural category of a value, derived on demand and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    /// Key-indexed container with unique keys
    MappingLike,
    /// Integer-indexed ordered container supporting append and insert
    SequenceLike,
    /// Unordered container supporting membership-preserving addition
    SetLike,
    /// Anything else, including self-similar atomic values such as strings
    Scalar,
}

impl ShapeCategory {
    /// Returns true for every category except `Scalar`.
    pub fn is_container(self) -> bool {
        !matches!(self, ShapeCategory::Scalar)
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeCategory::MappingLike => "mapping-like",
            ShapeCategory::SequenceLike => "sequence-like",
            ShapeCategory::SetLike => "set-like",
            ShapeCategory::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

/// Identifies the concrete type of a value.
///
/// Tags are plain names so they can be written in settings files and on the
/// command line. The bundled value backends share the names exposed as
/// associated constants; other implementations of [`Probe`] may use their own.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    pub const NULL: TypeTag = TypeTag::new("null");
    pub const BOOL: TypeTag = TypeTag::new("bool");
    pub const INT: TypeTag = TypeTag::new("int");
    pub const FLOAT: TypeTag = TypeTag::new("float");
    pub const STR: TypeTag = TypeTag::new("str");
    pub const LIST: TypeTag = TypeTag::new("list");
    pub const DICT: TypeTag = TypeTag::new("dict");
    pub const SET: TypeTag = TypeTag::new("set");
    pub const DATETIME: TypeTag = TypeTag::new("datetime");
    pub const TAGGED: TypeTag = TypeTag::new("tagged");

    /// Creates a tag from a static name.
    pub const fn new(name: &'static str) -> Self {
        TypeTag(Cow::Borrowed(name))
    }

    /// Returns the tag's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        TypeTag(Cow::Owned(name))
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        TypeTag(Cow::Owned(name.to_string()))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability probes used to classify a value.
///
/// Every probe has a default that reports "not supported", so a type only
/// needs to implement the capabilities it actually has. Probes must be pure.
pub trait Probe: Clone {
    /// The concrete type of this value.
    fn type_tag(&self) -> TypeTag;

    /// True if this value is the backend's native mapping type. Accepted
    /// without exercising key enumeration, so an empty mapping still counts.
    fn is_native_mapping(&self) -> bool {
        false
    }

    /// True if this value can enumerate its keys.
    fn enumerates_keys(&self) -> bool {
        false
    }

    /// True if this value is the backend's native ordered sequence type.
    fn is_native_sequence(&self) -> bool {
        false
    }

    /// Reads the element at `index`, if integer indexing is supported and the
    /// index exists.
    fn read_index(&self, _index: usize) -> Option<Cow<'_, Self>> {
        None
    }

    /// Returns an iterator over the value's elements, if it can be iterated.
    fn iterate(&self) -> Option<Box<dyn Iterator<Item = Cow<'_, Self>> + '_>> {
        None
    }
}

/// Parameters controlling how self-similar values are recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FractalPolicy {
    known_types: HashSet<TypeTag>,
    check_depth: usize,
}

impl FractalPolicy {
    /// Default number of "first element" steps probed by [`is_fractal`].
    pub const DEFAULT_CHECK_DEPTH: usize = 9;

    /// Creates a policy with explicit known fractal types and probe depth.
    pub fn new(known_types: impl IntoIterator<Item = TypeTag>, check_depth: usize) -> Self {
        Self {
            known_types: known_types.into_iter().collect(),
            check_depth,
        }
    }

    /// True if values of this type are always treated as atomic.
    pub fn is_known(&self, type_tag: &TypeTag) -> bool {
        self.known_types.contains(type_tag)
    }

    pub fn check_depth(&self) -> usize {
        self.check_depth
    }

    pub fn known_types(&self) -> &HashSet<TypeTag> {
        &self.known_types
    }

    pub(crate) fn add_known(&mut self, type_tag: TypeTag) {
        self.known_types.insert(type_tag);
    }

    pub(crate) fn clear_known(&mut self) {
        self.known_types.clear();
    }

    pub(crate) fn set_check_depth(&mut self, depth: usize) {
        self.check_depth = depth;
    }
}

impl Default for FractalPolicy {
    fn default() -> Self {
        Self::new([TypeTag::STR], Self::DEFAULT_CHECK_DEPTH)
    }
}

/// Determine the structural category of `value`.
///
/// Pure and infallible: anything that matches no container probe is a
/// [`ShapeCategory::Scalar`].
///
/// # Examples
///
/// ```
/// use structmerge::shape::{classify, FractalPolicy, ShapeCategory};
/// use structmerge::value::Value;
///
/// let policy = FractalPolicy::default();
/// assert_eq!(classify(&Value::from("text"), &policy), ShapeCategory::Scalar);
/// assert_eq!(classify(&Value::list([Value::from(1)]), &policy), ShapeCategory::SequenceLike);
/// ```
pub fn classify<V: Probe>(value: &V, policy: &FractalPolicy) -> ShapeCategory {
    if value.is_native_mapping() || value.enumerates_keys() {
        return ShapeCategory::MappingLike;
    }

    if value.is_native_sequence() {
        return ShapeCategory::SequenceLike;
    }

    if value.read_index(0).is_some() {
        // Only non-fractal indexable values are real sequences
        if policy.is_known(&value.type_tag()) || is_fractal(value, policy.check_depth()) {
            return ShapeCategory::Scalar;
        }
        return ShapeCategory::SequenceLike;
    }

    if value.iterate().is_some() {
        return ShapeCategory::SetLike;
    }

    ShapeCategory::Scalar
}

/// Check whether `value` is made of elements of its own type.
///
/// Takes the first element yielded by iteration and compares its type with
/// the value's type, repeating on that element. The chain must hold for
/// `max_depth + 1` steps; an empty or non-iterable value, or an element of a
/// different type, ends the check with `false`.
pub fn is_fractal<V: Probe>(value: &V, max_depth: usize) -> bool {
    fractal_from(value, max_depth, 0)
}

fn fractal_from<V: Probe>(value: &V, max_depth: usize, depth: usize) -> bool {
    let Some(first) = value.iterate().and_then(|mut items| items.next()) else {
        return false;
    };

    if first.type_tag() != value.type_tag() {
        return false;
    }

    depth == max_depth || fractal_from(first.as_ref(), max_depth, depth + 1)
}
