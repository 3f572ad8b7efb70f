//! Mutable record objects with named fields.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// A record object: named fields holding runtime values.
///
/// Records are the usual shape of captured shared objects
/// (`{x: 1, y: 2, z: 3}` and friends). A record is always reached
/// through a [`crate::Captured`] handle; this type is just the payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordValue {
    fields: FxHashMap<String, Value>,
}

impl RecordValue {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from field/value pairs.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        RecordValue {
            fields: fields.into_iter().collect(),
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field, inserting it if absent.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RecordValue {
    /// Deterministic rendering: fields in sorted name order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        write!(f, "{{")?;
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.fields.get(*name) {
                Some(value) => write!(f, "{name}: {value}")?,
                None => write!(f, "{name}: <missing>")?,
            }
        }
        write!(f, "}}")
    }
}
