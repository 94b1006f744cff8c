//! JSON backend
//!
//! Lets `serde_json::Value` trees take part in a structural merge. Objects are
//! mappings and arrays are sequences. JSON has no unordered collection, so a
//! JSON tree never classifies as set-like. Strings answer the indexing and
//! iteration probes with one-character strings, which makes them fractal.
//!
//! Object key order is preserved (serde_json's `preserve_order` feature):
//! keys that exist only on the right are appended after the left's keys.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use structmerge::config::MergeConfig;
//! use structmerge::merge::merge;
//!
//! let merged = merge(
//!     json!({"name": "api", "ports": [80]}),
//!     json!({"name": "web", "ports": [443]}),
//!     &MergeConfig::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(merged, json!({"name": ["api", "web"], "ports": [80, 443]}));
//! ```

use std::borrow::Cow;

use serde_json::Value as JsonValue;

use super::Mergeable;
use crate::error::{Error, Result};
use crate::shape::{Probe, TypeTag};
use crate::strategy::ScalarAccess;

/// Parse a JSON document.
///
/// # Errors
///
/// Returns `Error::Parse` if the text is not valid JSON.
pub fn parse(text: &str) -> Result<JsonValue> {
    serde_json::from_str(text).map_err(|err| Error::Parse {
        format: "json".to_string(),
        message: err.to_string(),
    })
}

/// Serialize a JSON value as pretty-printed text.
///
/// # Errors
///
/// Returns `Error::Serialize` if serialization fails.
pub fn render(value: &JsonValue) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| Error::Serialize {
        format: "json".to_string(),
        message: err.to_string(),
    })
}

fn chars_of(text: &str) -> impl Iterator<Item = Cow<'_, JsonValue>> + '_ {
    text.chars()
        .map(|c| Cow::Owned(JsonValue::String(c.to_string())))
}

impl Probe for JsonValue {
    fn type_tag(&self) -> TypeTag {
        match self {
            JsonValue::Null => TypeTag::NULL,
            JsonValue::Bool(_) => TypeTag::BOOL,
            JsonValue::Number(n) if n.is_i64() || n.is_u64() => TypeTag::INT,
            JsonValue::Number(_) => TypeTag::FLOAT,
            JsonValue::String(_) => TypeTag::STR,
            JsonValue::Array(_) => TypeTag::LIST,
            JsonValue::Object(_) => TypeTag::DICT,
        }
    }

    fn is_native_mapping(&self) -> bool {
        self.is_object()
    }

    fn is_native_sequence(&self) -> bool {
        self.is_array()
    }

    fn read_index(&self, index: usize) -> Option<Cow<'_, Self>> {
        match self {
            JsonValue::Array(items) => items.get(index).map(Cow::Borrowed),
            JsonValue::String(text) => chars_of(text).nth(index),
            _ => None,
        }
    }

    fn iterate(&self) -> Option<Box<dyn Iterator<Item = Cow<'_, Self>> + '_>> {
        match self {
            JsonValue::Array(items) => Some(Box::new(items.iter().map(Cow::Borrowed))),
            JsonValue::Object(map) => Some(Box::new(
                map.keys().map(|k| Cow::Owned(JsonValue::String(k.clone()))),
            )),
            JsonValue::String(text) if !text.is_empty() => Some(Box::new(chars_of(text))),
            _ => None,
        }
    }
}

impl Mergeable for JsonValue {
    type Key = String;

    fn key_label(key: &String) -> String {
        key.clone()
    }

    fn map_get_mut(&mut self, key: &String) -> Option<&mut Self> {
        self.as_object_mut().and_then(|map| map.get_mut(key))
    }

    fn map_insert(&mut self, key: String, value: Self) {
        if let Some(map) = self.as_object_mut() {
            map.insert(key, value);
        }
    }

    fn into_entries(self) -> Vec<(String, Self)> {
        match self {
            JsonValue::Object(map) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn seq_len(&self) -> usize {
        self.as_array().map_or(0, Vec::len)
    }

    fn seq_get_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.as_array_mut().and_then(|items| items.get_mut(index))
    }

    fn seq_insert(&mut self, index: usize, value: Self) {
        if let Some(items) = self.as_array_mut() {
            items.insert(index.min(items.len()), value);
        }
    }

    fn seq_push(&mut self, value: Self) {
        if let Some(items) = self.as_array_mut() {
            items.push(value);
        }
    }

    fn set_add(&mut self, value: Self) {
        if let Some(items) = self.as_array_mut() {
            if !items.contains(&value) {
                items.push(value);
            }
        }
    }

    fn into_items(self) -> Vec<Self> {
        match self {
            JsonValue::Array(items) => items,
            JsonValue::Object(map) => map.into_iter().map(|(k, _)| JsonValue::String(k)).collect(),
            _ => Vec::new(),
        }
    }

    fn make_conflict_pair(&mut self, right: Self) {
        let left = std::mem::replace(self, JsonValue::Null);
        *self = JsonValue::Array(vec![left, right]);
    }
}

impl ScalarAccess for JsonValue {
    fn as_int(&self) -> Option<i64> {
        self.as_i64()
    }

    fn as_float(&self) -> Option<f64> {
        self.as_f64()
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn from_int(value: i64) -> Self {
        JsonValue::from(value)
    }

    fn from_float(value: f64) -> Self {
        // Non-finite floats have no JSON form and become null
        JsonValue::from(value)
    }

    fn from_text(value: String) -> Self {
        JsonValue::String(value)
    }
}
