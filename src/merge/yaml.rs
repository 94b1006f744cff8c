//! YAML backend
//!
//! Lets `serde_yaml::Value` trees take part in a structural merge. Mappings
//! and sequences map onto the engine's categories directly. Mapping keys may
//! be any YAML value; they are compared by equality and rendered with their
//! debug form in paths unless they are strings. Tagged values (`!Tag value`)
//! are atomic and carry the `tagged` type.

use std::borrow::Cow;

use serde_yaml::Value as YamlValue;

use super::Mergeable;
use crate::error::{Error, Result};
use crate::shape::{Probe, TypeTag};
use crate::strategy::ScalarAccess;

/// Parse a YAML document.
///
/// # Errors
///
/// Returns `Error::Parse` if the text is not valid YAML.
pub fn parse(text: &str) -> Result<YamlValue> {
    serde_yaml::from_str(text).map_err(|err| Error::Parse {
        format: "yaml".to_string(),
        message: err.to_string(),
    })
}

/// Serialize a YAML value.
///
/// # Errors
///
/// Returns `Error::Serialize` if serialization fails.
pub fn render(value: &YamlValue) -> Result<String> {
    serde_yaml::to_string(value).map_err(|err| Error::Serialize {
        format: "yaml".to_string(),
        message: err.to_string(),
    })
}

fn chars_of(text: &str) -> impl Iterator<Item = Cow<'_, YamlValue>> + '_ {
    text.chars()
        .map(|c| Cow::Owned(YamlValue::String(c.to_string())))
}

impl Probe for YamlValue {
    fn type_tag(&self) -> TypeTag {
        match self {
            YamlValue::Null => TypeTag::NULL,
            YamlValue::Bool(_) => TypeTag::BOOL,
            YamlValue::Number(n) if n.is_i64() || n.is_u64() => TypeTag::INT,
            YamlValue::Number(_) => TypeTag::FLOAT,
            YamlValue::String(_) => TypeTag::STR,
            YamlValue::Sequence(_) => TypeTag::LIST,
            YamlValue::Mapping(_) => TypeTag::DICT,
            YamlValue::Tagged(_) => TypeTag::TAGGED,
        }
    }

    fn is_native_mapping(&self) -> bool {
        self.is_mapping()
    }

    fn is_native_sequence(&self) -> bool {
        self.is_sequence()
    }

    fn read_index(&self, index: usize) -> Option<Cow<'_, Self>> {
        match self {
            YamlValue::Sequence(items) => items.get(index).map(Cow::Borrowed),
            YamlValue::String(text) => chars_of(text).nth(index),
            _ => None,
        }
    }

    fn iterate(&self) -> Option<Box<dyn Iterator<Item = Cow<'_, Self>> + '_>> {
        match self {
            YamlValue::Sequence(items) => Some(Box::new(items.iter().map(Cow::Borrowed))),
            YamlValue::Mapping(map) => Some(Box::new(map.keys().map(Cow::Borrowed))),
            YamlValue::String(text) if !text.is_empty() => Some(Box::new(chars_of(text))),
            _ => None,
        }
    }
}

impl Mergeable for YamlValue {
    type Key = YamlValue;

    fn key_label(key: &YamlValue) -> String {
        match key {
            YamlValue::String(s) => s.clone(),
            _ => format!("{:?}", key),
        }
    }

    fn map_get_mut(&mut self, key: &YamlValue) -> Option<&mut Self> {
        self.as_mapping_mut().and_then(|map| map.get_mut(key))
    }

    fn map_insert(&mut self, key: YamlValue, value: Self) {
        if let Some(map) = self.as_mapping_mut() {
            map.insert(key, value);
        }
    }

    fn into_entries(self) -> Vec<(YamlValue, Self)> {
        match self {
            YamlValue::Mapping(map) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn seq_len(&self) -> usize {
        self.as_sequence().map_or(0, Vec::len)
    }

    fn seq_get_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.as_sequence_mut().and_then(|items| items.get_mut(index))
    }

    fn seq_insert(&mut self, index: usize, value: Self) {
        if let Some(items) = self.as_sequence_mut() {
            items.insert(index.min(items.len()), value);
        }
    }

    fn seq_push(&mut self, value: Self) {
        if let Some(items) = self.as_sequence_mut() {
            items.push(value);
        }
    }

    fn set_add(&mut self, value: Self) {
        if let Some(items) = self.as_sequence_mut() {
            if !items.contains(&value) {
                items.push(value);
            }
        }
    }

    fn into_items(self) -> Vec<Self> {
        match self {
            YamlValue::Sequence(items) => items,
            YamlValue::Mapping(map) => map.into_iter().map(|(k, _)| k).collect(),
            _ => Vec::new(),
        }
    }

    fn make_conflict_pair(&mut self, right: Self) {
        let left = std::mem::replace(self, YamlValue::Null);
        *self = YamlValue::Sequence(vec![left, right]);
    }
}

impl ScalarAccess for YamlValue {
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
        YamlValue::Number(value.into())
    }

    fn from_float(value: f64) -> Self {
        YamlValue::Number(value.into())
    }

    fn from_text(value: String) -> Self {
        YamlValue::String(value)
    }
}
