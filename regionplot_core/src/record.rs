// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform data records and the annotation-aware read view over them.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::Value;

/// Per-element annotation fields, keyed by field name.
pub type Annotations = HashMap<String, Value>;

/// One data record: a mapping from field name to scalar value.
///
/// Field names may be namespaced (`"assoc:position"`). A field that is absent from the map is
/// "missing"; there is no separate null value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, returning the record (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Removes a field.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Returns a field value, or `None` if the field is missing.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns `true` if the field is present (even if its value is falsy).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of present fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the fields sorted by name.
    ///
    /// Use this whenever the output must be deterministic (identity fallbacks, debug output).
    pub fn sorted_fields(&self) -> Vec<(&str, &Value)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Record {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // JSON nulls become missing fields.
        let raw: HashMap<String, Option<Value>> = HashMap::deserialize(deserializer)?;
        Ok(Self {
            fields: raw.into_iter().filter_map(|(k, v)| Some((k, v?))).collect(),
        })
    }
}

/// A read view over a record plus the annotations stored for the same element.
///
/// Lookups consult the record first and fall back to the annotations only when the record does
/// not have the field at all. A present real field always wins, even when it is falsy.
#[derive(Clone, Copy, Debug)]
pub struct RecordView<'a> {
    record: &'a Record,
    annotations: Option<&'a Annotations>,
}

impl<'a> RecordView<'a> {
    /// Creates a view over `record` with optional annotations.
    pub fn new(record: &'a Record, annotations: Option<&'a Annotations>) -> Self {
        Self {
            record,
            annotations,
        }
    }

    /// Creates a view with no annotations.
    pub fn bare(record: &'a Record) -> Self {
        Self::new(record, None)
    }

    /// Returns the underlying record.
    pub fn record(&self) -> &'a Record {
        self.record
    }

    /// Returns a real record field, ignoring annotations.
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        self.record.get(name)
    }

    /// Returns an annotation field, ignoring the record.
    pub fn annotation(&self, name: &str) -> Option<&'a Value> {
        self.annotations?.get(name)
    }

    /// Returns the record field, falling back to the annotation of the same name.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.field(name).or_else(|| self.annotation(name))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn real_fields_take_precedence_over_annotations() {
        let record = Record::new().with("some_field", false);
        let mut notes = Annotations::new();
        notes.insert("some_field".into(), Value::Bool(true));
        notes.insert("custom".into(), Value::from("note"));

        let view = RecordView::new(&record, Some(&notes));
        assert_eq!(view.get("some_field"), Some(&Value::Bool(false)));
        assert_eq!(view.get("custom"), Some(&Value::from("note")));
        assert_eq!(view.get("absent"), None);
    }

    #[test]
    fn sorted_fields_are_ordered_by_name() {
        let record: Record = [("b", 2), ("a", 1), ("c", 3)].into_iter().collect();
        let names: Vec<&str> = record.sorted_fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
