//! Ordered attribute sets.

use relmodel_core::Value;
use serde::Serialize;

/// An ordered `column -> value` map used to seed new records.
///
/// Later writes to the same column replace the earlier value, so merge
/// order encodes precedence: caller attributes first, then reflection
/// conditions, then the create scope (the association owns the keys it
/// injects).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeSet {
    entries: Vec<(String, Value)>,
}

impl AttributeSet {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any existing value for the column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    /// Builder-style `set`.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Get an attribute value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Check whether a column is present.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Merge `other` into this set; `other` wins on conflicts.
    pub fn merge(&mut self, other: &AttributeSet) {
        for (column, value) in &other.entries {
            self.set(column.clone(), value.clone());
        }
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<C: Into<String>, V: Into<Value>> FromIterator<(C, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (column, value) in iter {
            attrs.set(column, value);
        }
        attrs
    }
}
