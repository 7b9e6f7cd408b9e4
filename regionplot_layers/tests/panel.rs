// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer ordering within panels.

use regionplot_core::ConfigError;
use regionplot_layers::{DataLayer, LayerLayout, Panel};

fn z_indexes(panel: &Panel) -> Vec<(String, usize)> {
    panel
        .layers()
        .map(|layer| (layer.id().to_owned(), layer.z_index()))
        .collect()
}

fn assert_contiguous(panel: &Panel) {
    for (position, id) in panel.layer_ids().iter().enumerate() {
        assert_eq!(panel.layer(id).map(DataLayer::z_index), Some(position), "{id}");
    }
}

#[test]
fn initial_order_honours_explicit_and_negative_indexes() {
    let panel = Panel::with_layers(
        "p",
        [
            LayerLayout::new("significance").with_z_index(-1),
            LayerLayout::new("recomb"),
            LayerLayout::new("assoc"),
            LayerLayout::new("background").with_z_index(0),
        ],
    )
    .unwrap();
    assert_eq!(panel.layer_ids(), ["background", "recomb", "assoc", "significance"]);
    assert_contiguous(&panel);
}

#[test]
fn moves_chain_and_are_idempotent_at_the_boundaries() {
    let mut panel = Panel::with_layers(
        "p",
        [LayerLayout::new("a"), LayerLayout::new("b"), LayerLayout::new("c")],
    )
    .unwrap();

    panel
        .move_layer_up("a")
        .unwrap()
        .move_layer_up("a")
        .unwrap()
        .move_layer_up("a")
        .unwrap();
    assert_eq!(panel.layer_ids(), ["b", "c", "a"]);
    assert_contiguous(&panel);

    panel
        .move_layer_down("b")
        .unwrap()
        .move_layer_down("b")
        .unwrap();
    assert_eq!(panel.layer_ids(), ["b", "c", "a"]);

    panel.move_layer_down("a").unwrap();
    assert_eq!(
        z_indexes(&panel),
        [("b".to_owned(), 0), ("a".to_owned(), 1), ("c".to_owned(), 2)]
    );
}

#[test]
fn negative_insert_counts_from_the_top() {
    let mut panel = Panel::new("p");
    panel.add_layer(LayerLayout::new("a")).unwrap();
    panel.add_layer(LayerLayout::new("b")).unwrap();
    let layer = panel.add_layer(LayerLayout::new("c").with_z_index(-1)).unwrap();
    assert_eq!(layer.z_index(), 1);
    assert_eq!(panel.layer_ids(), ["a", "c", "b"]);
    assert_contiguous(&panel);
}

#[test]
fn removing_reindexes() {
    let mut panel = Panel::with_layers(
        "p",
        [LayerLayout::new("a"), LayerLayout::new("b"), LayerLayout::new("c")],
    )
    .unwrap();
    let removed = panel.remove_layer("a").unwrap();
    assert_eq!(removed.id(), "a");
    assert_eq!(panel.len(), 2);
    assert_contiguous(&panel);
    assert_eq!(
        panel.move_layer_up("a").map(|p| p.len()),
        Err(ConfigError::UnknownLayer("a".into()))
    );
}

#[test]
fn layers_in_different_panels_scope_ids_separately() {
    let mut top = Panel::new("top");
    let mut bottom = Panel::new("bottom");
    let a = top.add_layer(LayerLayout::new("genes")).unwrap().element_id("APOE");
    let b = bottom.add_layer(LayerLayout::new("genes")).unwrap().element_id("APOE");
    assert_ne!(a, b);
    assert_eq!(a.as_str(), "top_genes-APOE");
}
