// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer layouts and their resolved configuration.
//!
//! A [`LayerLayout`] is what the caller writes (every setting optional). It is merged with
//! defaults exactly once, by [`LayerLayout::resolve`], into an immutable [`LayerConfig`].

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use regionplot_core::{ConfigError, IdentityScheme};
use regionplot_transforms::{Filter, Template};
use smallvec::SmallVec;

use crate::{AxisId, AxisLayout, ScalableParam, Status, StatusExpr};

/// Tooltip settings of a layer layout.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct TooltipLayout {
    /// When the tooltip should be open. Defaults to `highlighted or selected`.
    pub show: Option<StatusExpr>,
    /// When the tooltip should be closed. Defaults to `unhighlighted and unselected`.
    pub hide: Option<StatusExpr>,
    /// Whether the tooltip shows a close control.
    pub closable: Option<bool>,
    /// Content template.
    pub html: Option<Template>,
}

impl TooltipLayout {
    /// Creates a tooltip layout with default rules and no content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content template.
    pub fn with_html(mut self, html: Template) -> Self {
        self.html = Some(html);
        self
    }

    /// Sets the show rule.
    pub fn with_show(mut self, show: StatusExpr) -> Self {
        self.show = Some(show);
        self
    }

    /// Sets the hide rule.
    pub fn with_hide(mut self, hide: StatusExpr) -> Self {
        self.hide = Some(hide);
        self
    }

    /// Sets whether the tooltip is closable.
    pub fn with_closable(mut self, closable: bool) -> Self {
        self.closable = Some(closable);
        self
    }
}

/// Vertical axis settings: which axis (`1` or `2`) plus the usual extent settings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct YAxisLayout {
    /// Axis number; defaults to `1`.
    pub axis: Option<u8>,
    /// Extent settings.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub extent: AxisLayout,
}

/// The layout of one data layer, as written by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct LayerLayout {
    /// Layer id, unique within its panel.
    pub id: String,
    /// Record field that identifies an element. Defaults to `"id"`.
    pub id_field: Option<String>,
    /// Requested paint position; negative values count from the top.
    pub z_index: Option<i32>,
    /// Horizontal axis settings.
    pub x_axis: Option<AxisLayout>,
    /// Vertical axis settings.
    pub y_axis: Option<YAxisLayout>,
    /// Named visual encodings (`color`, `point_size`, ...).
    pub encodings: BTreeMap<String, ScalableParam>,
    /// Row filters; all must match for a record to be drawn.
    pub filters: Vec<Filter>,
    /// Tooltip settings; a layer without them has no tooltips.
    pub tooltip: Option<TooltipLayout>,
}

impl LayerLayout {
    /// Creates a layout for the layer `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the id field.
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = Some(id_field.into());
        self
    }

    /// Sets the requested z-index.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Sets the horizontal axis.
    pub fn with_x_axis(mut self, axis: AxisLayout) -> Self {
        self.x_axis = Some(axis);
        self
    }

    /// Sets a vertical axis (`1` or `2`).
    pub fn with_y_axis(mut self, number: u8, axis: AxisLayout) -> Self {
        self.y_axis = Some(YAxisLayout {
            axis: Some(number),
            extent: axis,
        });
        self
    }

    /// Adds a named encoding.
    pub fn with_encoding(mut self, name: impl Into<String>, param: impl Into<ScalableParam>) -> Self {
        self.encodings.insert(name.into(), param.into());
        self
    }

    /// Adds a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sets the tooltip layout.
    pub fn with_tooltip(mut self, tooltip: TooltipLayout) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Merges the layout with defaults.
    ///
    /// `panel_id` scopes element ids, so two layers showing the same records keep separate
    /// interaction state.
    pub fn resolve(self, panel_id: &str) -> Result<LayerConfig, ConfigError> {
        let id_field = self.id_field.unwrap_or_else(|| String::from("id"));
        let identity = IdentityScheme::new(&alloc::format!("{panel_id}.{}", self.id), id_field);

        let mut axes = SmallVec::new();
        if let Some(x) = self.x_axis {
            axes.push((AxisId::X, x));
        }
        if let Some(y) = self.y_axis {
            axes.push((AxisId::vertical(y.axis.unwrap_or(1))?, y.extent));
        }

        let tooltip = self.tooltip.map(|t| TooltipConfig {
            show: t.show.unwrap_or_else(|| {
                StatusExpr::Any(alloc::vec![
                    StatusExpr::Is(Status::Highlighted),
                    StatusExpr::Is(Status::Selected),
                ])
            }),
            hide: t.hide.unwrap_or_else(|| {
                StatusExpr::All(alloc::vec![
                    StatusExpr::IsNot(Status::Highlighted),
                    StatusExpr::IsNot(Status::Selected),
                ])
            }),
            closable: t.closable.unwrap_or(false),
            template: t.html,
        });

        Ok(LayerConfig {
            id: self.id,
            identity,
            z_index: self.z_index,
            axes,
            encodings: self.encodings,
            filters: self.filters,
            tooltip,
        })
    }
}

/// Resolved tooltip settings.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipConfig {
    /// When the tooltip should be open.
    pub show: StatusExpr,
    /// When the tooltip should be closed; wins over `show`.
    pub hide: StatusExpr,
    /// Whether the tooltip shows a close control.
    pub closable: bool,
    /// Content template; no template means empty content.
    pub template: Option<Template>,
}

/// The effective configuration of a data layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerConfig {
    /// Layer id.
    pub id: String,
    /// How element ids are derived.
    pub identity: IdentityScheme,
    /// Requested paint position.
    pub z_index: Option<i32>,
    /// Axis settings, keyed by axis.
    pub axes: SmallVec<[(AxisId, AxisLayout); 2]>,
    /// Named visual encodings.
    pub encodings: BTreeMap<String, ScalableParam>,
    /// Row filters.
    pub filters: Vec<Filter>,
    /// Tooltip settings.
    pub tooltip: Option<TooltipConfig>,
}

impl LayerConfig {
    /// Returns the settings of one axis.
    pub fn axis(&self, axis: AxisId) -> Option<&AxisLayout> {
        self.axes
            .iter()
            .find_map(|(id, layout)| (*id == axis).then_some(layout))
    }
}
