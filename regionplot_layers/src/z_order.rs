// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint order of the layers in a panel.
//!
//! A layer's z-index is its position in the panel's order: `0` paints first (bottom). The
//! order is always contiguous, so `order.as_slice()[z] == id` exactly when `id` has z-index `z`.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

/// The ordered layer ids of one panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerOrder {
    ids: SmallVec<[String; 4]>,
}

/// Normalizes an explicit z-index against `len` slots: negative values count from the end.
fn normalize(z: i32, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let z = i64::from(z);
    let z = if z < 0 { len_i + z } else { z };
    usize::try_from(z.max(0)).unwrap_or(usize::MAX)
}

impl LayerOrder {
    /// Creates an empty order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial order for layers in declaration order.
    ///
    /// Explicit z-indexes are placed first (negative values count from the end, out-of-range
    /// values clamp to the nearest slot). A layer whose slot is already taken, and every layer
    /// without an explicit z-index, then fills the free slots from the bottom up in
    /// declaration order.
    pub fn from_requests<'a>(requests: impl IntoIterator<Item = (&'a str, Option<i32>)>) -> Self {
        let requests: Vec<_> = requests.into_iter().collect();
        let len = requests.len();
        let mut slots: Vec<Option<&str>> = alloc::vec![None; len];
        let mut unplaced = Vec::new();
        for (id, z) in &requests {
            match z {
                Some(z) if len > 0 => {
                    let slot = normalize(*z, len).min(len - 1);
                    if slots[slot].is_none() {
                        slots[slot] = Some(*id);
                    } else {
                        unplaced.push(*id);
                    }
                }
                _ => unplaced.push(*id),
            }
        }
        let mut unplaced = unplaced.into_iter();
        let ids = slots
            .into_iter()
            .filter_map(|slot| slot.or_else(|| unplaced.next()))
            .map(String::from)
            .collect();
        Self { ids }
    }

    /// Inserts a layer.
    ///
    /// Without a z-index the layer goes on top. With one, it is spliced in at that position
    /// (negative values count from the end) and the layers above it move up by one.
    /// Returns the new layer's position.
    pub fn insert(&mut self, id: impl Into<String>, z_index: Option<i32>) -> usize {
        let position = match z_index {
            Some(z) if !self.ids.is_empty() => normalize(z, self.ids.len()).min(self.ids.len()),
            _ => self.ids.len(),
        };
        self.ids.insert(position, id.into());
        position
    }

    /// Removes a layer, returning its former position.
    pub fn remove(&mut self, id: &str) -> Option<usize> {
        let position = self.position(id)?;
        self.ids.remove(position);
        Some(position)
    }

    /// Swaps a layer with the one above it. Returns `false` at the top or for unknown ids.
    pub fn move_up(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(p) if p + 1 < self.ids.len() => {
                self.ids.swap(p, p + 1);
                true
            }
            _ => false,
        }
    }

    /// Swaps a layer with the one below it. Returns `false` at the bottom or for unknown ids.
    pub fn move_down(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(p) if p > 0 => {
                self.ids.swap(p, p - 1);
                true
            }
            _ => false,
        }
    }

    /// Returns the z-index of a layer.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|other| other == id)
    }

    /// Returns the layer ids from bottom to top.
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if there are no layers.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn ids(order: &LayerOrder) -> alloc::vec::Vec<&str> {
        order.as_slice().iter().map(String::as_str).collect()
    }

    #[test]
    fn explicit_indexes_win_and_others_fill_gaps() {
        let order = LayerOrder::from_requests([
            ("a", None),
            ("b", Some(0)),
            ("c", Some(-1)),
            ("d", None),
        ]);
        assert_eq!(ids(&order), ["b", "a", "d", "c"]);
    }

    #[test]
    fn conflicting_claims_fall_back_to_fill() {
        let order = LayerOrder::from_requests([("a", Some(1)), ("b", Some(1)), ("c", Some(9))]);
        assert_eq!(ids(&order), ["b", "a", "c"]);
    }

    #[test]
    fn insert_splices() {
        let mut order = LayerOrder::new();
        order.insert("a", Some(3));
        order.insert("b", None);
        order.insert("c", Some(0));
        order.insert("d", Some(-1));
        assert_eq!(ids(&order), ["c", "a", "d", "b"]);
        assert_eq!(order.remove("a"), Some(1));
        assert_eq!(ids(&order), ["c", "d", "b"]);
    }

    #[test]
    fn moves_stop_at_the_boundaries() {
        let mut order = LayerOrder::from_requests([("a", None), ("b", None)]);
        assert!(!order.move_down("a"));
        assert!(order.move_up("a"));
        assert!(!order.move_up("a"));
        assert_eq!(ids(&order), ["b", "a"]);
        assert!(!order.move_up("missing"));
    }
}
