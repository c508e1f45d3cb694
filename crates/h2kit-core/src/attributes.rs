//! Ordered attribute sets for instruments and layers.
//!
//! Every instrument and layer in a kit is a flat, ordered list of named scalar
//! values. The order matters: the manifest writes one child element per
//! attribute, in insertion order, and the consuming application is sensitive
//! to the layout it has always seen.

use crate::error::Error;
use crate::Result;
use serde_yaml::{Number, Value};
use std::fmt;

/// A scalar attribute value.
///
/// Numbers keep the YAML number they were decoded from so that `1`, `1.0`
/// and `0.8` are written back exactly as a reader would expect.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Free text, also used for booleans (`true` / `false`).
    Text(String),
    /// Integer or finite float.
    Number(Number),
}

impl AttrValue {
    /// Convert a decoded YAML value into an attribute value.
    ///
    /// `key` and `ident` only feed the error message.
    pub fn from_yaml(key: &str, value: &Value, ident: &str) -> Result<Self> {
        match value {
            Value::String(s) => Ok(AttrValue::Text(s.clone())),
            Value::Bool(b) => Ok(AttrValue::Text(b.to_string())),
            Value::Number(n) if n.is_nan() || n.is_infinite() => Err(Error::IllegalValue {
                key: key.to_string(),
                value: n.to_string(),
                ident: ident.to_string(),
            }),
            Value::Number(n) => Ok(AttrValue::Number(n.clone())),
            other => Err(Error::IllegalValue {
                key: key.to_string(),
                value: describe_value(other),
                ident: ident.to_string(),
            }),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(Number::from(n))
    }
}

impl From<usize> for AttrValue {
    fn from(n: usize) -> Self {
        AttrValue::Number(Number::from(n as u64))
    }
}

/// Insertion-ordered attribute map.
///
/// Inserting an existing key replaces its value in place, so the key keeps
/// its original position. New keys are appended.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Return a copy of `self` with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    fn set(&mut self, key: String, value: AttrValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl FromIterator<(String, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.set(key, value);
        }
        attributes
    }
}

/// Build a new attribute set from `defaults` with `overrides` applied on top.
///
/// Overrides always win. Keys already present in `defaults` stay where they
/// are; keys only present in `overrides` follow in their own order.
pub fn merge(defaults: &Attributes, overrides: &Attributes) -> Attributes {
    let replaced = defaults.iter().map(|(key, value)| {
        let value = overrides.get(key).unwrap_or(value);
        (key.to_string(), value.clone())
    });
    let added = overrides
        .iter()
        .filter(|(key, _)| !defaults.contains_key(key))
        .map(|(key, value)| (key.to_string(), value.clone()));

    replaced.chain(added).collect()
}

/// Check that `key` can be used verbatim as an XML element name.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Short human readable description of a YAML value for error messages.
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{:?}", s),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("a value tagged {}", tagged.tag),
    }
}
