//! TOML backend
//!
//! Lets `toml::Value` trees take part in a structural merge. Tables are
//! mappings and arrays are sequences; datetimes are atomic and carry the
//! `datetime` type. A TOML document's root is always a table.
//!
//! TOML arrays may mix types, so conflict pairs such as `[1, "x"]` can be
//! written back out.

use std::borrow::Cow;

use toml::Value as TomlValue;

use super::Mergeable;
use crate::error::{Error, Result};
use crate::shape::{Probe, TypeTag};
use crate::strategy::ScalarAccess;

/// Parse a TOML document into a table value.
///
/// # Errors
///
/// Returns `Error::Parse` if the text is not a valid TOML document.
pub fn parse(text: &str) -> Result<TomlValue> {
    toml::from_str::<toml::Table>(text)
        .map(TomlValue::Table)
        .map_err(|err| Error::Parse {
            format: "toml".to_string(),
            message: err.to_string(),
        })
}

/// Serialize a TOML value as a document.
///
/// # Errors
///
/// Returns `Error::Serialize` if the value is not a table or cannot be
/// represented in TOML.
pub fn render(value: &TomlValue) -> Result<String> {
    let TomlValue::Table(table) = value else {
        return Err(Error::Serialize {
            format: "toml".to_string(),
            message: format!("document root must be a table, found {}", value.type_str()),
        });
    };
    toml::to_string(table).map_err(|err| Error::Serialize {
        format: "toml".to_string(),
        message: err.to_string(),
    })
}

fn chars_of(text: &str) -> impl Iterator<Item = Cow<'_, TomlValue>> + '_ {
    text.chars()
        .map(|c| Cow::Owned(TomlValue::String(c.to_string())))
}

impl Probe for TomlValue {
    fn type_tag(&self) -> TypeTag {
        match self {
            TomlValue::String(_) => TypeTag::STR,
            TomlValue::Integer(_) => TypeTag::INT,
            TomlValue::Float(_) => TypeTag::FLOAT,
            TomlValue::Boolean(_) => TypeTag::BOOL,
            TomlValue::Datetime(_) => TypeTag::DATETIME,
            TomlValue::Array(_) => TypeTag::LIST,
            TomlValue::Table(_) => TypeTag::DICT,
        }
    }

    fn is_native_mapping(&self) -> bool {
        self.is_table()
    }

    fn is_native_sequence(&self) -> bool {
        self.is_array()
    }

    fn read_index(&self, index: usize) -> Option<Cow<'_, Self>> {
        match self {
            TomlValue::Array(items) => items.get(index).map(Cow::Borrowed),
            TomlValue::String(text) => chars_of(text).nth(index),
            _ => None,
        }
    }

    fn iterate(&self) -> Option<Box<dyn Iterator<Item = Cow<'_, Self>> + '_>> {
        match self {
            TomlValue::Array(items) => Some(Box::new(items.iter().map(Cow::Borrowed))),
            TomlValue::Table(table) => Some(Box::new(
                table.keys().map(|k| Cow::Owned(TomlValue::String(k.clone()))),
            )),
            TomlValue::String(text) if !text.is_empty() => Some(Box::new(chars_of(text))),
            _ => None,
        }
    }
}

impl Mergeable for TomlValue {
    type Key = String;

    fn key_label(key: &String) -> String {
        key.clone()
    }

    fn map_get_mut(&mut self, key: &String) -> Option<&mut Self> {
        self.as_table_mut().and_then(|table| table.get_mut(key))
    }

    fn map_insert(&mut self, key: String, value: Self) {
        if let Some(table) = self.as_table_mut() {
            table.insert(key, value);
        }
    }

    fn into_entries(self) -> Vec<(String, Self)> {
        match self {
            TomlValue::Table(table) => table.into_iter().collect(),
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
            TomlValue::Array(items) => items,
            TomlValue::Table(table) => table.into_iter().map(|(k, _)| TomlValue::String(k)).collect(),
            _ => Vec::new(),
        }
    }

    fn make_conflict_pair(&mut self, right: Self) {
        let left = std::mem::replace(self, TomlValue::Array(Vec::new()));
        *self = TomlValue::Array(vec![left, right]);
    }
}

impl ScalarAccess for TomlValue {
    fn as_int(&self) -> Option<i64> {
        self.as_integer()
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            TomlValue::Integer(i) => Some(*i as f64),
            TomlValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn from_int(value: i64) -> Self {
        TomlValue::Integer(value)
    }

    fn from_float(value: f64) -> Self {
        TomlValue::Float(value)
    }

    fn from_text(value: String) -> Self {
        TomlValue::String(value)
    }
}
