//! # Merge Configuration
//!
//! [`MergeConfig`] carries everything the merge engine consults while walking
//! two trees:
//!
//! - **Stop rules**: `(type, depth)` pairs. When the left operand's type and
//!   the current depth match a rule, that branch is not merged and the parent
//!   container decides how to keep both sides.
//! - **Scalar mergers**: functions keyed by the `(left type, right type)` pair,
//!   used only when both operands are scalars. The merger's result replaces
//!   the left value.
//! - **Fractal policy**: which types are always atomic, and how deep
//!   [`crate::shape::is_fractal`] probes.
//!
//! A configuration is built once with the builder methods and then passed by
//! reference to every call; nothing in it changes during a merge.
//!
//! ```
//! use structmerge::config::MergeConfig;
//! use structmerge::shape::TypeTag;
//! use structmerge::value::Value;
//!
//! let config: MergeConfig<Value> = MergeConfig::new()
//!     .with_merger(TypeTag::INT, TypeTag::INT, |l: &Value, r: &Value| match (l, r) {
//!         (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
//!         _ => l.clone(),
//!     })
//!     .stop_on(TypeTag::LIST, 2);
//!
//! assert!(config.should_stop(&TypeTag::LIST, 2));
//! assert!(config.merger(&TypeTag::INT, &TypeTag::INT).is_some());
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::shape::{FractalPolicy, TypeTag};

/// A function combining two scalars into the value stored in the left slot.
pub type ScalarMerger<V> = Box<dyn Fn(&V, &V) -> V + Send + Sync>;

/// Immutable settings for one merge call.
pub struct MergeConfig<V> {
    stop_on: HashSet<(TypeTag, usize)>,
    mergers: HashMap<(TypeTag, TypeTag), ScalarMerger<V>>,
    fractals: FractalPolicy,
}

impl<V> MergeConfig<V> {
    /// Creates a configuration with no stop rules, no scalar mergers, and
    /// the default fractal policy (strings are atomic, probe depth 9).
    pub fn new() -> Self {
        Self {
            stop_on: HashSet::new(),
            mergers: HashMap::new(),
            fractals: FractalPolicy::default(),
        }
    }

    /// Stop merging when the left operand has `type_tag` at `depth`.
    pub fn stop_on(mut self, type_tag: TypeTag, depth: usize) -> Self {
        self.stop_on.insert((type_tag, depth));
        self
    }

    /// Register a merger for scalars of the given type pair. A later
    /// registration for the same pair replaces the earlier one.
    pub fn with_merger<F>(mut self, lhs: TypeTag, rhs: TypeTag, merger: F) -> Self
    where
        F: Fn(&V, &V) -> V + Send + Sync + 'static,
    {
        self.mergers.insert((lhs, rhs), Box::new(merger));
        self
    }

    /// Register an already boxed merger.
    pub fn with_boxed_merger(mut self, lhs: TypeTag, rhs: TypeTag, merger: ScalarMerger<V>) -> Self {
        self.mergers.insert((lhs, rhs), merger);
        self
    }

    /// Treat values of `type_tag` as atomic regardless of their probes.
    pub fn known_fractal(mut self, type_tag: TypeTag) -> Self {
        self.fractals.add_known(type_tag);
        self
    }

    /// Forget every known fractal type, including the default `str`.
    pub fn without_known_fractals(mut self) -> Self {
        self.fractals.clear_known();
        self
    }

    /// Set how many "first element" steps the fractal probe follows.
    pub fn fractal_check_depth(mut self, depth: usize) -> Self {
        self.fractals.set_check_depth(depth);
        self
    }

    /// True if a stop rule matches this left-hand type at this depth.
    pub fn should_stop(&self, type_tag: &TypeTag, depth: usize) -> bool {
        !self.stop_on.is_empty() && self.stop_on.contains(&(type_tag.clone(), depth))
    }

    /// The merger registered for a scalar type pair, if any.
    pub fn merger(&self, lhs: &TypeTag, rhs: &TypeTag) -> Option<&ScalarMerger<V>> {
        if self.mergers.is_empty() {
            return None;
        }
        self.mergers.get(&(lhs.clone(), rhs.clone()))
    }

    pub fn fractals(&self) -> &FractalPolicy {
        &self.fractals
    }
}

impl<V> Default for MergeConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for MergeConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stop_on: Vec<_> = self.stop_on.iter().collect();
        stop_on.sort();
        let mut mergers: Vec<_> = self.mergers.keys().collect();
        mergers.sort();
        f.debug_struct("MergeConfig")
            .field("stop_on", &stop_on)
            .field("mergers", &mergers)
            .field("fractals", &self.fractals)
            .finish()
    }
}
