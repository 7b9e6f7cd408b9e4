// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element annotations.

extern crate alloc;

use alloc::string::String;

use hashbrown::HashMap;
use regionplot_core::{Annotations, ElementId, Value};

/// User annotations for the elements of one layer.
///
/// Entries are keyed by [`ElementId`], not by data position, so they outlive data reloads and
/// re-attach to the same element when it comes back into view.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    entries: HashMap<ElementId, Annotations>,
}

impl AnnotationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` on the element, creating its entry on first use.
    pub fn set(&mut self, id: ElementId, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.entry(id).or_default().insert(key.into(), value)
    }

    /// Returns the annotation `key` of the element.
    pub fn get(&self, id: &ElementId, key: &str) -> Option<&Value> {
        self.entries.get(id)?.get(key)
    }

    /// Returns every annotation of the element.
    pub fn entry(&self, id: &ElementId) -> Option<&Annotations> {
        self.entries.get(id)
    }

    /// Removes one annotation. The element's entry is dropped once it is empty.
    pub fn remove(&mut self, id: &ElementId, key: &str) -> Option<Value> {
        let entry = self.entries.get_mut(id)?;
        let removed = entry.remove(key);
        if entry.is_empty() {
            self.entries.remove(id);
        }
        removed
    }

    /// Removes every annotation of one element.
    pub fn clear_element(&mut self, id: &ElementId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Removes every annotation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of annotated elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no element is annotated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = AnnotationStore::new();
        let id = ElementId::from_raw("p_l-rs1");
        assert_eq!(store.get(&id, "note"), None);

        assert_eq!(store.set(id.clone(), "note", Value::from("x")), None);
        assert_eq!(store.set(id.clone(), "note", Value::from("y")), Some(Value::from("x")));
        store.set(id.clone(), "flag", Value::Bool(true));
        assert_eq!(store.get(&id, "note"), Some(&Value::from("y")));
        assert_eq!(store.entry(&id).map(Annotations::len), Some(2));

        store.remove(&id, "note");
        store.remove(&id, "flag");
        assert!(store.entry(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn clear_element_only_touches_that_element() {
        let mut store = AnnotationStore::new();
        let a = ElementId::from_raw("a");
        let b = ElementId::from_raw("b");
        store.set(a.clone(), "k", Value::from(1));
        store.set(b.clone(), "k", Value::from(2));
        assert!(store.clear_element(&a));
        assert!(!store.clear_element(&a));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&b, "k"), Some(&Value::from(2)));
    }
}
