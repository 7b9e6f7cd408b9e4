// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panels: ordered containers of data layers.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use regionplot_core::ConfigError;

use crate::{DataLayer, LayerLayout, LayerOrder};

/// A panel holding data layers in paint order.
///
/// Every layer's [`z_index`](DataLayer::z_index) equals its position in
/// [`layer_ids`](Self::layer_ids) after every operation.
#[derive(Debug)]
pub struct Panel {
    id: String,
    layers: HashMap<String, DataLayer>,
    order: LayerOrder,
}

impl Panel {
    /// Creates an empty panel.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layers: HashMap::new(),
            order: LayerOrder::new(),
        }
    }

    /// Creates a panel from layer layouts in declaration order.
    ///
    /// Layouts with an explicit `z_index` claim that slot (negative values count from the
    /// top); the rest fill the remaining slots in declaration order.
    pub fn with_layers(
        id: impl Into<String>,
        layouts: impl IntoIterator<Item = LayerLayout>,
    ) -> Result<Self, ConfigError> {
        let mut panel = Self::new(id);
        let mut requests: Vec<(String, Option<i32>)> = Vec::new();
        for layout in layouts {
            let layer = DataLayer::new(&panel.id, layout)?;
            let layer_id = String::from(layer.id());
            if panel.layers.contains_key(&layer_id) {
                return Err(ConfigError::DuplicateLayer(layer_id));
            }
            requests.push((layer_id.clone(), layer.config().z_index));
            panel.layers.insert(layer_id, layer);
        }
        panel.order =
            LayerOrder::from_requests(requests.iter().map(|(id, z)| (id.as_str(), *z)));
        panel.sync_z_indexes();
        Ok(panel)
    }

    /// Returns the panel id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the layer ids from bottom to top.
    pub fn layer_ids(&self) -> &[String] {
        self.order.as_slice()
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the panel has no layers.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns a layer.
    pub fn layer(&self, id: &str) -> Option<&DataLayer> {
        self.layers.get(id)
    }

    /// Returns a layer for mutation.
    pub fn layer_mut(&mut self, id: &str) -> Option<&mut DataLayer> {
        self.layers.get_mut(id)
    }

    /// Iterates over the layers from bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &DataLayer> + '_ {
        self.order.as_slice().iter().filter_map(|id| self.layers.get(id))
    }

    /// Adds a layer.
    ///
    /// Without a `z_index` the layer goes on top. With one, the layer is inserted at that
    /// position (negative values count from the top) and the layers above shift up.
    pub fn add_layer(&mut self, layout: LayerLayout) -> Result<&mut DataLayer, ConfigError> {
        let layer = DataLayer::new(&self.id, layout)?;
        let layer_id = String::from(layer.id());
        if self.layers.contains_key(&layer_id) {
            return Err(ConfigError::DuplicateLayer(layer_id));
        }
        let _position = self.order.insert(layer_id.clone(), layer.config().z_index);
        regionplot_core::debug!(
            panel = self.id.as_str(),
            layer = layer_id.as_str(),
            z_index = _position,
            "layer added"
        );
        self.layers.insert(layer_id.clone(), layer);
        self.sync_z_indexes();
        self.layers
            .get_mut(&layer_id)
            .ok_or(ConfigError::UnknownLayer(layer_id))
    }

    /// Removes a layer; the layers above it shift down.
    pub fn remove_layer(&mut self, id: &str) -> Result<DataLayer, ConfigError> {
        let layer = self
            .layers
            .remove(id)
            .ok_or_else(|| ConfigError::UnknownLayer(id.into()))?;
        self.order.remove(id);
        self.sync_z_indexes();
        Ok(layer)
    }

    /// Moves a layer one step towards the top. Does nothing if it is already on top.
    pub fn move_layer_up(&mut self, id: &str) -> Result<&mut Self, ConfigError> {
        self.check_layer(id)?;
        if self.order.move_up(id) {
            self.sync_z_indexes();
        }
        Ok(self)
    }

    /// Moves a layer one step towards the bottom. Does nothing if it is already at the
    /// bottom.
    pub fn move_layer_down(&mut self, id: &str) -> Result<&mut Self, ConfigError> {
        self.check_layer(id)?;
        if self.order.move_down(id) {
            self.sync_z_indexes();
        }
        Ok(self)
    }

    fn check_layer(&self, id: &str) -> Result<(), ConfigError> {
        if self.layers.contains_key(id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownLayer(id.into()))
        }
    }

    fn sync_z_indexes(&mut self) {
        for (z, id) in self.order.as_slice().iter().enumerate() {
            if let Some(layer) = self.layers.get_mut(id) {
                layer.set_z_index(z);
            }
        }
        regionplot_core::trace!(panel = self.id.as_str(), order = ?self.order.as_slice(), "layer order");
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut panel = Panel::new("p");
        panel.add_layer(LayerLayout::new("a")).unwrap();
        assert_eq!(
            panel.add_layer(LayerLayout::new("a")).map(|l| l.z_index()),
            Err(ConfigError::DuplicateLayer("a".into()))
        );
        assert!(matches!(
            Panel::with_layers("p", [LayerLayout::new("x"), LayerLayout::new("x")]),
            Err(ConfigError::DuplicateLayer(_))
        ));
    }

    #[test]
    fn unknown_layers_are_config_errors() {
        let mut panel = Panel::new("p");
        assert!(matches!(
            panel.move_layer_up("nope"),
            Err(ConfigError::UnknownLayer(_))
        ));
        assert!(matches!(
            panel.remove_layer("nope"),
            Err(ConfigError::UnknownLayer(_))
        ));
    }

    #[test]
    fn z_indexes_track_positions() {
        let mut panel = Panel::with_layers(
            "p",
            [
                LayerLayout::new("a"),
                LayerLayout::new("b").with_z_index(0),
            ],
        )
        .unwrap();
        assert_eq!(panel.layer_ids(), ["b", "a"]);
        assert_eq!(panel.layer("a").map(DataLayer::z_index), Some(1));

        panel.add_layer(LayerLayout::new("c").with_z_index(1)).unwrap();
        assert_eq!(panel.layer_ids(), ["b", "c", "a"]);
        assert_eq!(panel.layer("a").map(DataLayer::z_index), Some(2));

        panel.remove_layer("b").unwrap();
        assert_eq!(panel.layer("c").map(DataLayer::z_index), Some(0));
    }
}
