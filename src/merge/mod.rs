//! Recursive structural merge
//!
//! This module walks two trees in lock-step and folds the right-hand tree
//! into the left-hand one. Both operands are classified on every call (see
//! [`crate::shape`]) and the left operand's category picks the behaviour:
//!
//! - **Scalar**: a registered merger for the `(left type, right type)` pair
//!   replaces the left value. Without one, the pair is unresolved.
//! - **Set-like**: union. A scalar on the right is added as one element,
//!   otherwise every element the right side iterates over is added (the keys,
//!   for a mapping).
//! - **Sequence-like**: a scalar on the right is appended. Otherwise elements
//!   at matching positions are merged recursively; an unresolved pair keeps
//!   both elements next to each other, left first. Surplus right-hand elements
//!   are appended in order.
//! - **Mapping-like**: values under shared keys are merged recursively; an
//!   unresolved pair becomes a conflict pair `[left, right]`. Keys only on the
//!   right are moved over.
//!
//! ## Outcomes
//!
//! Each recursive call produces one of three outcomes: the pair merged, the
//! pair was left alone ([`Step::Stopped`], which hands the right value back
//! to the parent untouched), or a fatal [`Error`] that aborts the whole merge.
//! An unresolved scalar pair is fatal only at the top level, where no parent
//! can record it.
//!
//! ## Ownership
//!
//! The right-hand tree is consumed. Its children are moved into the left tree,
//! never copied, so a caller that still needs the right tree must clone it
//! first. Backends whose nodes are shared pointers keep sharing them after the
//! merge.
//!
//! ## Backends
//!
//! - `serde_json::Value` (json.rs)
//! - `serde_yaml::Value` (yaml.rs)
//! - `toml::Value` (toml.rs)
//! - [`crate::value::Value`], the only one with a native set

pub mod json;
pub mod toml;
pub mod yaml;

use std::fmt;

use log::{debug, trace};

use crate::config::MergeConfig;
use crate::error::{Error, Result};
use crate::shape::{classify, Probe, ShapeCategory};

/// Container operations the merge engine performs on the left tree, and the
/// ways it takes the right tree apart.
///
/// The engine only calls the operations that match the category the value
/// was classified as, so implementations may ignore calls that do not apply
/// to a value's actual variant.
pub trait Mergeable: Probe {
    /// Mapping key type
    type Key: Clone + Eq;

    /// Renders a key for error messages and logs.
    fn key_label(key: &Self::Key) -> String;

    fn map_get_mut(&mut self, key: &Self::Key) -> Option<&mut Self>;

    fn map_insert(&mut self, key: Self::Key, value: Self);

    /// Consumes a mapping into its entries, in the mapping's own order.
    fn into_entries(self) -> Vec<(Self::Key, Self)>;

    fn seq_len(&self) -> usize;

    fn seq_get_mut(&mut self, index: usize) -> Option<&mut Self>;

    /// Inserts at `index`, shifting later elements right.
    fn seq_insert(&mut self, index: usize, value: Self);

    fn seq_push(&mut self, value: Self);

    /// Adds to an unordered collection, leaving duplicates to the
    /// collection's own semantics.
    fn set_add(&mut self, value: Self);

    /// Consumes a container into what [`Probe::iterate`] yields: the elements
    /// of a sequence or set, or the keys of a mapping.
    fn into_items(self) -> Vec<Self>;

    /// Replaces this value with the two-element sequence `[self, right]`.
    fn make_conflict_pair(&mut self, right: Self);
}

/// Outcome of merging one pair that did not fail.
#[derive(Debug, PartialEq)]
pub enum Step<V> {
    /// The right value was folded into the left one.
    Merged,
    /// The pair was not merged; the right value is returned untouched for the
    /// parent container to place.
    Stopped(V),
}

/// Represents a segment in the path from the root to the node being merged
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A mapping key
    Key(String),
    /// A position in the left-hand sequence
    Index(usize),
}

/// Render a path as `servers[0].host`, or `<root>` when empty.
pub fn render_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }

    let mut rendered = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
                rendered.push_str(key);
            }
            PathSegment::Index(idx) => {
                rendered.push_str(&format!("[{}]", idx));
            }
        }
    }
    rendered
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// Merge `rhs` into `lhs` and return the result.
///
/// When `lhs` is a container the returned value is `lhs` itself, updated in
/// place. When both operands are scalars the result is whatever the
/// registered merger produced.
///
/// # Errors
///
/// - [`Error::NoMergeBehavior`] if both operands are scalars with no merger
///   registered for their types.
/// - [`Error::MappingWithScalar`] if a mapping meets a scalar at any depth.
/// - [`Error::IncompatibleShapes`] if a mapping meets a sequence or set.
/// - [`Error::StoppedAtRoot`] if a stop rule matches the top-level `lhs`.
///
/// # Examples
///
/// ```
/// use structmerge::config::MergeConfig;
/// use structmerge::merge::merge;
/// use structmerge::value::Value;
///
/// let lhs = Value::map([("a", Value::from(1))]);
/// let rhs = Value::map([("a", Value::from(2)), ("b", Value::from(3))]);
/// let merged = merge(lhs, rhs, &MergeConfig::new()).unwrap();
///
/// assert_eq!(merged, Value::map([
///     ("a", Value::list([Value::from(1), Value::from(2)])),
///     ("b", Value::from(3)),
/// ]));
/// ```
pub fn merge<V: Mergeable>(mut lhs: V, rhs: V, config: &MergeConfig<V>) -> Result<V> {
    merge_into(&mut lhs, rhs, config)?;
    Ok(lhs)
}

/// Merge `rhs` into the value behind `lhs`.
///
/// Same behaviour and errors as [`merge`]. On error `lhs` may already hold
/// part of the merge.
pub fn merge_into<V: Mergeable>(lhs: &mut V, rhs: V, config: &MergeConfig<V>) -> Result<()> {
    let mut walk = Walk::new(config);
    match walk.merge_node(lhs, rhs)? {
        Step::Merged => Ok(()),
        Step::Stopped(_) => Err(Error::StoppedAtRoot {
            type_tag: lhs.type_tag(),
        }),
    }
}

/// State of one merge call. The depth is the length of the path.
struct Walk<'c, V> {
    config: &'c MergeConfig<V>,
    path: Vec<PathSegment>,
}

impl<'c, V: Mergeable> Walk<'c, V> {
    fn new(config: &'c MergeConfig<V>) -> Self {
        Self {
            config,
            path: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        self.path.len()
    }

    fn merge_node(&mut self, lhs: &mut V, rhs: V) -> Result<Step<V>> {
        let lhs_tag = lhs.type_tag();
        if self.config.should_stop(&lhs_tag, self.depth()) {
            trace!(
                "Stop rule matched {} at depth {} ({})",
                lhs_tag,
                self.depth(),
                render_path(&self.path)
            );
            return Ok(Step::Stopped(rhs));
        }

        let fractals = self.config.fractals();
        let lhs_shape = classify(lhs, fractals);
        let rhs_shape = classify(&rhs, fractals);
        trace!(
            "Merging {} into {} at '{}'",
            rhs_shape,
            lhs_shape,
            render_path(&self.path)
        );

        match lhs_shape {
            ShapeCategory::Scalar => self.merge_scalar(lhs, rhs),
            ShapeCategory::SetLike => self.merge_set(lhs, rhs, rhs_shape),
            ShapeCategory::SequenceLike => self.merge_sequence(lhs, rhs, rhs_shape),
            ShapeCategory::MappingLike => self.merge_mapping(lhs, rhs, rhs_shape),
        }
    }

    fn merge_scalar(&self, lhs: &mut V, rhs: V) -> Result<Step<V>> {
        let lhs_tag = lhs.type_tag();
        let rhs_tag = rhs.type_tag();

        if let Some(merger) = self.config.merger(&lhs_tag, &rhs_tag) {
            let merged = merger(&*lhs, &rhs);
            *lhs = merged;
            return Ok(Step::Merged);
        }

        if self.depth() == 0 {
            return Err(Error::NoMergeBehavior {
                lhs: lhs_tag,
                rhs: rhs_tag,
            });
        }
        Ok(Step::Stopped(rhs))
    }

    fn merge_set(&mut self, lhs: &mut V, rhs: V, rhs_shape: ShapeCategory) -> Result<Step<V>> {
        if rhs_shape == ShapeCategory::Scalar {
            lhs.set_add(rhs);
        } else {
            for item in rhs.into_items() {
                lhs.set_add(item);
            }
        }
        Ok(Step::Merged)
    }

    fn merge_sequence(
        &mut self,
        lhs: &mut V,
        rhs: V,
        rhs_shape: ShapeCategory,
    ) -> Result<Step<V>> {
        match rhs_shape {
            ShapeCategory::Scalar => {
                lhs.seq_push(rhs);
                return Ok(Step::Merged);
            }
            ShapeCategory::MappingLike => {
                return Err(self.incompatible(ShapeCategory::SequenceLike, rhs_shape));
            }
            ShapeCategory::SequenceLike | ShapeCategory::SetLike => {}
        }

        let mut right = rhs.into_items().into_iter();
        let mut index = 0;
        while index < lhs.seq_len() {
            let Some(item) = right.next() else {
                break;
            };
            let Some(slot) = lhs.seq_get_mut(index) else {
                // Reported length and element access disagree; keep the item.
                lhs.seq_push(item);
                break;
            };

            self.path.push(PathSegment::Index(index));
            let step = self.merge_node(slot, item)?;
            if let Step::Stopped(item) = step {
                debug!(
                    "Unmerged pair at '{}', inserting right element after left",
                    render_path(&self.path)
                );
                lhs.seq_insert(index + 1, item);
                index += 1;
            }
            self.path.pop();
            index += 1;
        }

        for item in right {
            lhs.seq_push(item);
        }
        Ok(Step::Merged)
    }

    fn merge_mapping(
        &mut self,
        lhs: &mut V,
        rhs: V,
        rhs_shape: ShapeCategory,
    ) -> Result<Step<V>> {
        match rhs_shape {
            ShapeCategory::MappingLike => {}
            ShapeCategory::Scalar => {
                return Err(Error::MappingWithScalar {
                    path: render_path(&self.path),
                    rhs: rhs.type_tag(),
                });
            }
            ShapeCategory::SequenceLike | ShapeCategory::SetLike => {
                return Err(self.incompatible(ShapeCategory::MappingLike, rhs_shape));
            }
        }

        for (key, value) in rhs.into_entries() {
            let Some(slot) = lhs.map_get_mut(&key) else {
                lhs.map_insert(key, value);
                continue;
            };

            self.path.push(PathSegment::Key(V::key_label(&key)));
            let step = self.merge_node(slot, value)?;
            if let Step::Stopped(value) = step {
                debug!("Conflict at '{}', keeping both values", render_path(&self.path));
                slot.make_conflict_pair(value);
            }
            self.path.pop();
        }
        Ok(Step::Merged)
    }

    fn incompatible(&self, lhs: ShapeCategory, rhs: ShapeCategory) -> Error {
        Error::IncompatibleShapes {
            path: render_path(&self.path),
            lhs,
            rhs,
        }
    }
}
