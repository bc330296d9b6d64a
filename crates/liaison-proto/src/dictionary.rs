//! Key/value dictionaries with typed accessors.

use std::collections::BTreeMap;

use crate::{
    errors::{ProtocolError, Result},
    value::Value,
};

/// A wire dictionary: string keys mapped to typed values.
///
/// Keys are kept sorted so encoding is deterministic. Typed getters return
/// [`ProtocolError::MissingKey`] for absent keys and
/// [`ProtocolError::WrongType`] for values of another kind; the `optional_*`
/// getters treat absence as `None` but still reject a wrong kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: BTreeMap<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`put`](Self::put).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(key, value);
        self
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    fn require(&self, key: &'static str) -> Result<&Value> {
        self.entries.get(key).ok_or(ProtocolError::MissingKey { key })
    }

    /// Read an integer.
    pub fn get_long(&self, key: &'static str) -> Result<i64> {
        match self.require(key)? {
            Value::Int(v) => Ok(*v),
            other => Err(wrong_type(key, "int", other)),
        }
    }

    /// Read a string.
    pub fn get_string(&self, key: &'static str) -> Result<&str> {
        match self.require(key)? {
            Value::String(v) => Ok(v),
            other => Err(wrong_type(key, "string", other)),
        }
    }

    /// Read a raw byte string.
    pub fn get_raw(&self, key: &'static str) -> Result<&[u8]> {
        match self.require(key)? {
            Value::Raw(v) => Ok(v),
            other => Err(wrong_type(key, "raw", other)),
        }
    }

    /// Read a boolean.
    pub fn get_bool(&self, key: &'static str) -> Result<bool> {
        match self.require(key)? {
            Value::Bool(v) => Ok(*v),
            other => Err(wrong_type(key, "bool", other)),
        }
    }

    /// Read a nested dictionary.
    pub fn get_dictionary(&self, key: &'static str) -> Result<&Self> {
        match self.require(key)? {
            Value::Dictionary(v) => Ok(v),
            other => Err(wrong_type(key, "dictionary", other)),
        }
    }

    /// Read an optional string.
    pub fn optional_string(&self, key: &'static str) -> Result<Option<&str>> {
        if self.contains_key(key) { self.get_string(key).map(Some) } else { Ok(None) }
    }

    /// Read an optional raw byte string.
    pub fn optional_raw(&self, key: &'static str) -> Result<Option<&[u8]>> {
        if self.contains_key(key) { self.get_raw(key).map(Some) } else { Ok(None) }
    }
}

fn wrong_type(key: &'static str, expected: &'static str, found: &Value) -> ProtocolError {
    ProtocolError::WrongType { key, expected, found: found.kind() }
}

impl FromIterator<(String, Value)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl IntoIterator for Dictionary {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
