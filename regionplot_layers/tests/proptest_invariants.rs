// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for `regionplot_layers`.
//!
//! 1. Status sets never hold an id twice, whatever the operation sequence.
//! 2. Layer z-indexes stay contiguous and match positions after any move sequence.
//! 3. Buffers and `min_extent` only ever widen an extent.

use std::collections::HashSet;

use proptest::prelude::*;
use regionplot_core::{Record, RecordView};
use regionplot_layers::{
    AxisId, AxisLayout, DataLayer, Extent, LayerLayout, LayerOrder, Panel, Status, TooltipLayout,
    compute_extent,
};
use regionplot_transforms::FieldRef;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Op {
    Set { key: u8, active: bool, exclusive: bool },
    All(bool),
    Destroy(u8),
    Reload(Vec<u8>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8, any::<bool>(), any::<bool>()).prop_map(|(key, active, exclusive)| Op::Set {
            key,
            active,
            exclusive
        }),
        any::<bool>().prop_map(Op::All),
        (0u8..8).prop_map(Op::Destroy),
        prop::collection::vec(0u8..8, 0..8).prop_map(Op::Reload),
    ]
}

fn records(keys: &[u8]) -> Vec<Record> {
    keys.iter().map(|k| Record::new().with("id", u32::from(*k))).collect()
}

// ── Status sets ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn status_sets_stay_unique(ops in prop::collection::vec(op(), 0..40)) {
        let layout = LayerLayout::new("l").with_tooltip(TooltipLayout::new());
        let mut layer = DataLayer::new("p", layout).unwrap();
        layer.set_data(records(&[0, 1, 2, 3]));
        for op in ops {
            match op {
                Op::Set { key, active, exclusive } => {
                    layer.set_element_status(Status::Selected, key.to_string().as_str(), active, exclusive);
                }
                Op::All(active) => layer.set_all_status(Status::Selected, active),
                Op::Destroy(key) => {
                    layer.destroy_tooltip(key.to_string().as_str());
                }
                Op::Reload(keys) => layer.set_data(records(&keys)),
            }
            for set in [layer.status(Status::Selected), layer.state().has_tooltip()] {
                let unique: HashSet<_> = set.iter().collect();
                prop_assert_eq!(unique.len(), set.len());
            }
            // Every open tooltip belongs to an element in the current data.
            for tooltip in layer.tooltips() {
                prop_assert!(layer.element_ids().contains(&tooltip.id));
            }
        }
    }
}

// ── Layer order ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn z_indexes_stay_contiguous(
        requested in prop::collection::vec(prop::option::of(-6i32..6), 1..6),
        moves in prop::collection::vec((0usize..6, any::<bool>()), 0..30),
    ) {
        let layouts = requested.iter().enumerate().map(|(i, z)| {
            let layout = LayerLayout::new(format!("l{i}"));
            match z {
                Some(z) => layout.with_z_index(*z),
                None => layout,
            }
        });
        let mut panel = Panel::with_layers("p", layouts).unwrap();
        for (target, up) in moves {
            let id = format!("l{}", target % requested.len());
            if up {
                panel.move_layer_up(&id).unwrap();
            } else {
                panel.move_layer_down(&id).unwrap();
            }
            let ids = panel.layer_ids().to_vec();
            prop_assert_eq!(ids.len(), requested.len());
            for (position, id) in ids.iter().enumerate() {
                prop_assert_eq!(panel.layer(id).map(DataLayer::z_index), Some(position));
            }
        }
    }

    #[test]
    fn initial_order_is_a_permutation(
        requested in prop::collection::vec(prop::option::of(-8i32..8), 0..8),
    ) {
        let names: Vec<String> = (0..requested.len()).map(|i| format!("l{i}")).collect();
        let order = LayerOrder::from_requests(
            names.iter().map(String::as_str).zip(requested.iter().copied()),
        );
        let mut placed: Vec<_> = order.as_slice().to_vec();
        placed.sort();
        let mut expected = names.clone();
        expected.sort();
        prop_assert_eq!(placed, expected);
    }
}

// ── Extents ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn buffers_and_min_extent_only_widen(
        values in prop::collection::vec(-1e6f64..1e6, 1..20),
        lower in 0.0f64..2.0,
        upper in 0.0f64..2.0,
        lo in -1e6f64..1e6,
        span in 0.0f64..1e6,
    ) {
        let data: Vec<Record> = values.iter().map(|v| Record::new().with("y", *v)).collect();
        let field = FieldRef::parse("y").unwrap();
        let views = || data.iter().map(RecordView::bare);

        let plain = compute_extent(AxisId::Y1, &AxisLayout::new(field.clone()), views()).unwrap();
        let widened = compute_extent(
            AxisId::Y1,
            &AxisLayout::new(field)
                .with_lower_buffer(lower)
                .with_upper_buffer(upper)
                .with_min_extent(lo, lo + span),
            views(),
        )
        .unwrap();

        let (Extent::Range { min: a, max: b }, Extent::Range { min: c, max: d }) = (plain, widened)
        else {
            return Err(TestCaseError::fail("numeric data must give a range"));
        };
        prop_assert!(c <= a && d >= b);
        prop_assert!(c <= lo && d >= lo + span);
    }
}
