// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `regionplot_layers`: data layers and panels for RegionPlot.
//!
//! This crate turns a layer layout plus a list of records into everything a painting layer
//! needs, without painting anything itself:
//! - resolved visual encodings ([`ScalableParam`] evaluated through a [`ScaleRegistry`]),
//! - axis extents ([`compute_extent`], [`DataLayer::axis_extent`]),
//! - per-element interaction state and tooltips ([`ElementStateTracker`], [`Tooltip`]),
//! - user annotations ([`AnnotationStore`]),
//! - the paint order of the layers in a panel ([`Panel`], [`LayerOrder`]).
//!
//! A typical re-render:
//! 1. the data provider hands the layer a fresh `Vec<Record>` via [`DataLayer::set_data`],
//! 2. the renderer reads [`DataLayer::filtered_indices`], [`DataLayer::resolve_encoding`] and
//!    [`DataLayer::axis_extent`],
//! 3. interaction handlers call [`DataLayer::select_element`] and friends, which keep tooltips
//!    in sync with the layout's show/hide rules.
//!
//! ```
//! use regionplot_core::Record;
//! use regionplot_layers::{AxisId, AxisLayout, Extent, LayerLayout, Panel};
//! use regionplot_transforms::FieldRef;
//!
//! let layout = LayerLayout::new("assoc")
//!     .with_id_field("variant")
//!     .with_y_axis(1, AxisLayout::new(FieldRef::parse("log_pvalue").unwrap()).with_min_extent(0.0, 10.0));
//! let mut panel = Panel::new("plot");
//! let layer = panel.add_layer(layout).unwrap();
//! layer.set_data(vec![
//!     Record::new().with("variant", "rs1").with("log_pvalue", 3.2),
//!     Record::new().with("variant", "rs2").with("log_pvalue", 12.5),
//! ]);
//! assert_eq!(layer.axis_extent(AxisId::Y1), Ok(Extent::Range { min: 0.0, max: 12.5 }));
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod annotations;
mod data_layer;
mod extent;
#[cfg(not(feature = "std"))]
mod float;
mod layout;
mod panel;
mod scale;
mod scale_functions;
mod status;
mod tooltip;
mod z_order;

pub use annotations::AnnotationStore;
pub use data_layer::DataLayer;
pub use extent::{AxisId, AxisLayout, Extent, compute_extent};
pub use layout::{LayerConfig, LayerLayout, TooltipConfig, TooltipLayout, YAxisLayout};
pub use panel::Panel;
pub use scale::{ParamValue, Params, ScalableParam, ScaleFn, ScaleInput, ScaleRegistry, ScaleRule};
pub use status::{ElementStateTracker, Status, StatusExpr, StatusSet};
pub use tooltip::Tooltip;
pub use z_order::LayerOrder;
