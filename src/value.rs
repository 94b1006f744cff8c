//! # In-Memory Value Tree
//!
//! A small dynamically-shaped value type covering every shape the merge
//! engine understands. Unlike the JSON, YAML, and TOML backends it has a
//! native unordered collection, [`Value::Set`], which makes it the natural
//! choice for accumulator records built in code. Maps keep insertion order.
//!
//! ```
//! use structmerge::config::MergeConfig;
//! use structmerge::merge::merge;
//! use structmerge::value::Value;
//!
//! let lhs = Value::set([Value::from(1), Value::from(2)]);
//! let rhs = Value::set([Value::from(2), Value::from(3)]);
//! let merged = merge(lhs, rhs, &MergeConfig::new()).unwrap();
//! assert_eq!(merged, Value::set([Value::from(1), Value::from(2), Value::from(3)]));
//! ```

use std::borrow::Cow;
use indexmap::IndexMap;

use crate::merge::Mergeable;
use crate::shape::{Probe, TypeTag};
use crate::strategy::ScalarAccess;

/// A node of a dynamically-shaped tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Set(ValueSet),
}

impl Value {
    /// Builds a list from its items.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Builds a set from its items, dropping duplicates.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    /// Builds a map from key/value pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Looks up a key in a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Unordered collection of values with duplicate suppression by equality.
///
/// Iteration follows insertion order. Equality ignores order. Values hold
/// floats and so cannot be hashed; membership is a linear scan, which makes
/// `insert` O(n) and a union of two sets O(n * m).
#[derive(Clone, Debug, Default)]
pub struct ValueSet(Vec<Value>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value unless an equal one is already present. Returns true if
    /// the value was added.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.0.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Probe for Value {
    fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::NULL,
            Value::Bool(_) => TypeTag::BOOL,
            Value::Int(_) => TypeTag::INT,
            Value::Float(_) => TypeTag::FLOAT,
            Value::Str(_) => TypeTag::STR,
            Value::List(_) => TypeTag::LIST,
            Value::Map(_) => TypeTag::DICT,
            Value::Set(_) => TypeTag::SET,
        }
    }

    fn is_native_mapping(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    fn is_native_sequence(&self) -> bool {
        matches!(self, Value::List(_))
    }

    fn read_index(&self, index: usize) -> Option<Cow<'_, Self>> {
        match self {
            Value::List(items) => items.get(index).map(Cow::Borrowed),
            Value::Str(text) => text
                .chars()
                .nth(index)
                .map(|c| Cow::Owned(Value::Str(c.to_string()))),
            _ => None,
        }
    }

    fn iterate(&self) -> Option<Box<dyn Iterator<Item = Cow<'_, Self>> + '_>> {
        match self {
            Value::List(items) => Some(Box::new(items.iter().map(Cow::Borrowed))),
            Value::Set(items) => Some(Box::new(items.iter().map(Cow::Borrowed))),
            Value::Map(map) => Some(Box::new(
                map.keys().map(|k| Cow::Owned(Value::Str(k.clone()))),
            )),
            Value::Str(text) if !text.is_empty() => Some(Box::new(
                text.chars().map(|c| Cow::Owned(Value::Str(c.to_string()))),
            )),
            _ => None,
        }
    }
}

impl Mergeable for Value {
    type Key = String;

    fn key_label(key: &String) -> String {
        key.clone()
    }

    fn map_get_mut(&mut self, key: &String) -> Option<&mut Self> {
        match self {
            Value::Map(map) => map.get_mut(key),
            _ => None,
        }
    }

    fn map_insert(&mut self, key: String, value: Self) {
        if let Value::Map(map) = self {
            map.insert(key, value);
        }
    }

    fn into_entries(self) -> Vec<(String, Self)> {
        match self {
            Value::Map(map) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn seq_len(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            _ => 0,
        }
    }

    fn seq_get_mut(&mut self, index: usize) -> Option<&mut Self> {
        match self {
            Value::List(items) => items.get_mut(index),
            _ => None,
        }
    }

    fn seq_insert(&mut self, index: usize, value: Self) {
        if let Value::List(items) = self {
            items.insert(index.min(items.len()), value);
        }
    }

    fn seq_push(&mut self, value: Self) {
        if let Value::List(items) = self {
            items.push(value);
        }
    }

    fn set_add(&mut self, value: Self) {
        if let Value::Set(items) = self {
            items.insert(value);
        }
    }

    fn into_items(self) -> Vec<Self> {
        match self {
            Value::List(items) => items,
            Value::Set(items) => items.into_iter().collect(),
            Value::Map(map) => map.into_keys().map(Value::Str).collect(),
            _ => Vec::new(),
        }
    }

    fn make_conflict_pair(&mut self, right: Self) {
        let left = std::mem::take(self);
        *self = Value::List(vec![left, right]);
    }
}

impl ScalarAccess for Value {
    fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    fn from_int(value: i64) -> Self {
        Value::Int(value)
    }

    fn from_float(value: f64) -> Self {
        Value::Float(value)
    }

    fn from_text(value: String) -> Self {
        Value::Str(value)
    }
}
