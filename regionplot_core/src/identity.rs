// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity.
//!
//! Every element of a data layer is addressed by a layer-scoped [`ElementId`]. Callers may refer
//! to an element by its record, by the raw key from the layout's id field, or by an id they got
//! back earlier; [`IdentityScheme::resolve`] is the single place that turns any of those into an
//! [`ElementId`].

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;

use crate::Record;

/// A layer-scoped element identity, e.g. `"plot_assoc-rs7412"`.
///
/// Ids are stable for as long as the record's id field is stable, which is what lets
/// interaction state and annotations survive data reloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    /// Wraps an already scoped id string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something that identifies an element.
#[derive(Clone, Copy, Debug)]
pub enum ElementRef<'a> {
    /// A full record; the id is read from the layout's id field.
    Record(&'a Record),
    /// A raw key, as it would appear in the record's id field.
    Key(&'a str),
    /// An id that is already layer-scoped.
    Id(&'a ElementId),
}

impl<'a> From<&'a Record> for ElementRef<'a> {
    fn from(value: &'a Record) -> Self {
        Self::Record(value)
    }
}

impl<'a> From<&'a str> for ElementRef<'a> {
    fn from(value: &'a str) -> Self {
        Self::Key(value)
    }
}

impl<'a> From<&'a String> for ElementRef<'a> {
    fn from(value: &'a String) -> Self {
        Self::Key(value)
    }
}

impl<'a> From<&'a ElementId> for ElementRef<'a> {
    fn from(value: &'a ElementId) -> Self {
        Self::Id(value)
    }
}

/// How a layer derives element ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityScheme {
    base_id: String,
    id_field: String,
}

impl IdentityScheme {
    /// Creates a scheme for the layer `base_id` (e.g. `"panel.layer"`) reading `id_field`.
    ///
    /// Characters that commonly appear in panel/layer names but are awkward in selectors
    /// (`:`, `.`, `[`, `]`, `,`) are replaced with `_` in the base id.
    pub fn new(base_id: &str, id_field: impl Into<String>) -> Self {
        let base_id = base_id
            .chars()
            .map(|c| if matches!(c, ':' | '.' | '[' | ']' | ',') { '_' } else { c })
            .collect();
        Self {
            base_id,
            id_field: id_field.into(),
        }
    }

    /// Returns the sanitized layer base id.
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Returns the name of the record field holding the element key.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Reads the raw element key of a record, if it has one.
    pub fn key_of(&self, record: &Record) -> Option<String> {
        record.get(&self.id_field).map(ToString::to_string)
    }

    /// Resolves anything that identifies an element into its layer-scoped id.
    ///
    /// This never fails: a record without the id field gets a deterministic id derived from
    /// all of its fields, so partially loaded data still has somewhere to hang state.
    pub fn resolve(&self, element: ElementRef<'_>) -> ElementId {
        match element {
            ElementRef::Id(id) => id.clone(),
            ElementRef::Key(key) => self.scoped(key),
            ElementRef::Record(record) => match record.get(&self.id_field) {
                Some(value) => self.scoped(&value.to_string()),
                None => {
                    let fallback = fallback_key(record);
                    crate::debug!(
                        id_field = %self.id_field,
                        fallback = %fallback,
                        "record has no id field; using stringified fallback"
                    );
                    self.scoped(&fallback)
                }
            },
        }
    }

    fn scoped(&self, key: &str) -> ElementId {
        let mut raw = String::with_capacity(self.base_id.len() + 1 + key.len());
        raw.push_str(&self.base_id);
        raw.push('-');
        raw.extend(key.chars().filter(|c| c.is_alphanumeric() || *c == '_'));
        ElementId(raw)
    }
}

fn fallback_key(record: &Record) -> String {
    if record.is_empty() {
        return String::from("element");
    }
    let mut out = String::new();
    for (name, value) in record.sorted_fields() {
        out.push_str(name);
        out.push('_');
        out.push_str(&value.to_string());
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn record_and_key_resolve_to_the_same_id() {
        let scheme = IdentityScheme::new("plot.assoc", "assoc:variant");
        let record = Record::new().with("assoc:variant", "1:100_A/G");

        let from_record = scheme.resolve(ElementRef::Record(&record));
        let from_key = scheme.resolve(ElementRef::Key("1:100_A/G"));
        assert_eq!(from_record, from_key);
        assert_eq!(from_record.as_str(), "plot_assoc-1100_AG");
    }

    #[test]
    fn scoped_ids_pass_through_unchanged() {
        let scheme = IdentityScheme::new("p.l", "id");
        let id = ElementId::from_raw("p_l-abc");
        assert_eq!(scheme.resolve(ElementRef::Id(&id)), id);
    }

    #[test]
    fn missing_id_field_falls_back_deterministically() {
        let scheme = IdentityScheme::new("p.l", "id");
        let record = Record::new().with("b", 2).with("a", "x");
        let first = scheme.resolve(ElementRef::Record(&record));
        let second = scheme.resolve(ElementRef::Record(&record.clone()));
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "p_l-a_x_b_2_");

        let empty = scheme.resolve(ElementRef::Record(&Record::new()));
        assert_eq!(empty.as_str(), "p_l-element");
    }
}
