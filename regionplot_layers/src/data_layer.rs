// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data layers.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;
use regionplot_core::{
    ConfigError, ElementId, ElementRef, Error, Record, RecordView, UsageError, Value,
};
use regionplot_transforms::Filter;

use crate::{
    AnnotationStore, AxisId, ElementStateTracker, Extent, LayerConfig, LayerLayout,
    ScalableParam, ScaleRegistry, Status, StatusSet, Tooltip, compute_extent,
};

/// One data layer: its records, per-element interaction state and annotations.
///
/// Records are replaced wholesale by [`set_data`](Self::set_data) on every re-render; status
/// flags, annotations and dismissed tooltips are keyed by [`ElementId`] and carry over.
#[derive(Debug)]
pub struct DataLayer {
    config: LayerConfig,
    data: Vec<Record>,
    ids: Vec<ElementId>,
    positions: HashMap<ElementId, usize>,
    annotations: AnnotationStore,
    state: ElementStateTracker,
    z_index: usize,
}

impl DataLayer {
    /// Creates an empty layer in the panel `panel_id`.
    pub fn new(panel_id: &str, layout: LayerLayout) -> Result<Self, ConfigError> {
        Ok(Self::from_config(layout.resolve(panel_id)?))
    }

    /// Creates an empty layer from an already resolved configuration.
    pub fn from_config(config: LayerConfig) -> Self {
        Self {
            config,
            data: Vec::new(),
            ids: Vec::new(),
            positions: HashMap::new(),
            annotations: AnnotationStore::new(),
            state: ElementStateTracker::new(),
            z_index: 0,
        }
    }

    /// Returns the layer id.
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Returns the layer's position in its panel's paint order.
    pub fn z_index(&self) -> usize {
        self.z_index
    }

    pub(crate) fn set_z_index(&mut self, z_index: usize) {
        self.z_index = z_index;
    }

    /// Returns the current records.
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Returns the element id of every current record, in data order.
    pub fn element_ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// Replaces the layer's records.
    ///
    /// Status flags and annotations are kept. Tooltips of elements that left the data are
    /// closed; every remaining element then has its tooltip re-evaluated in data order.
    pub fn set_data(&mut self, data: Vec<Record>) {
        self.ids = data
            .iter()
            .map(|record| self.config.identity.resolve(ElementRef::Record(record)))
            .collect();
        self.data = data;
        self.positions.clear();
        for (index, id) in self.ids.iter().enumerate() {
            self.positions.entry(id.clone()).or_insert(index);
        }
        regionplot_core::debug!(
            layer = self.config.id.as_str(),
            records = self.data.len(),
            unique = self.positions.len(),
            "layer data replaced"
        );

        let positions = &self.positions;
        self.state.retain_tooltips(|id| positions.contains_key(id));
        for index in 0..self.ids.len() {
            if self.positions.get(&self.ids[index]) == Some(&index) {
                let id = self.ids[index].clone();
                self.refresh_tooltip(&id);
            }
        }
    }

    /// Resolves anything that identifies an element into its id.
    pub fn element_id<'a>(&self, element: impl Into<ElementRef<'a>>) -> ElementId {
        self.config.identity.resolve(element.into())
    }

    /// Returns the data index of an element, if it is in the current data.
    pub fn position_of<'a>(&self, element: impl Into<ElementRef<'a>>) -> Option<usize> {
        self.positions.get(&self.element_id(element)).copied()
    }

    /// Returns an annotation-aware view of the record at `index`.
    pub fn view(&self, index: usize) -> Option<RecordView<'_>> {
        let record = self.data.get(index)?;
        let notes = self.ids.get(index).and_then(|id| self.annotations.entry(id));
        Some(RecordView::new(record, notes))
    }

    fn views(&self) -> impl Iterator<Item = RecordView<'_>> + '_ {
        self.data
            .iter()
            .zip(&self.ids)
            .map(|(record, id)| RecordView::new(record, self.annotations.entry(id)))
    }

    // Scale resolution

    /// Resolves a scalable parameter for `record`, the record at `index` in its originating
    /// collection. Annotations of the record's element back-fill missing fields.
    pub fn resolve_scalable_parameter(
        &self,
        registry: &ScaleRegistry,
        spec: &ScalableParam,
        record: &Record,
        index: usize,
    ) -> Result<Option<Value>, Error> {
        let id = self.element_id(record);
        let view = RecordView::new(record, self.annotations.entry(&id));
        spec.resolve(registry, &view, index)
    }

    /// Resolves a named encoding for every current record, in data order.
    pub fn resolve_encoding(
        &self,
        registry: &ScaleRegistry,
        name: &str,
    ) -> Result<Vec<Option<Value>>, Error> {
        let spec = self
            .config
            .encodings
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEncoding(name.into()))?;
        self.views()
            .enumerate()
            .map(|(index, view)| spec.resolve(registry, &view, index))
            .collect()
    }

    /// Returns the indices of the records that pass every layout filter, in data order.
    pub fn filtered_indices(&self) -> Result<Vec<usize>, UsageError> {
        let mut out = Vec::new();
        for (index, view) in self.views().enumerate() {
            if Filter::all_match(&self.config.filters, &view)? {
                out.push(index);
            }
        }
        Ok(out)
    }

    /// Computes the extent of one axis over the current data.
    pub fn axis_extent(&self, axis: AxisId) -> Result<Extent, Error> {
        let layout = self
            .config
            .axis(axis)
            .ok_or_else(|| ConfigError::MissingAxisField {
                axis: axis.name().into(),
            })?;
        compute_extent(axis, layout, self.views())
    }

    // Annotations

    /// Annotates an element. Annotations survive data reloads.
    ///
    /// An open tooltip of the element is re-rendered, since its content may read the
    /// annotation. If its template fails, the tooltip stays open with empty content and the
    /// failure is logged.
    pub fn set_element_annotation<'a>(
        &mut self,
        element: impl Into<ElementRef<'a>>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let id = self.element_id(element);
        self.annotations.set(id.clone(), key, value.into());
        if let Some(index) = self.state.tooltip(&id).map(|t| t.index) {
            let tooltip = self.render_or_blank(&id, index);
            self.state.open_tooltip(tooltip);
        }
    }

    /// Returns an element annotation.
    pub fn element_annotation<'a>(
        &self,
        element: impl Into<ElementRef<'a>>,
        key: &str,
    ) -> Option<&Value> {
        self.annotations.get(&self.element_id(element), key)
    }

    /// Returns the annotation store.
    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// Returns the annotation store for bulk edits.
    pub fn annotations_mut(&mut self) -> &mut AnnotationStore {
        &mut self.annotations
    }

    // Status

    /// Returns the interaction state.
    pub fn state(&self) -> &ElementStateTracker {
        &self.state
    }

    /// Returns the elements with `status`, in the order they gained it.
    pub fn status(&self, status: Status) -> &StatusSet {
        self.state.status(status)
    }

    /// Returns `true` if the element has `status`.
    pub fn element_has<'a>(&self, status: Status, element: impl Into<ElementRef<'a>>) -> bool {
        self.state.has(status, &self.element_id(element))
    }

    /// Adds (`active`) or removes an element's status, then re-evaluates the tooltips of
    /// every element whose membership changed.
    ///
    /// With `exclusive`, every other element loses the status first. Adding a status to an
    /// element that is not in the current data does nothing.
    pub fn set_element_status<'a>(
        &mut self,
        status: Status,
        element: impl Into<ElementRef<'a>>,
        active: bool,
        exclusive: bool,
    ) {
        let id = self.element_id(element);
        if active && !self.positions.contains_key(&id) {
            regionplot_core::debug!(
                layer = self.config.id.as_str(),
                id = id.as_str(),
                status = status.name(),
                "ignoring status change for an element not in the data"
            );
            return;
        }
        for changed in self.state.set(status, &id, active, exclusive) {
            self.refresh_tooltip(&changed);
        }
    }

    /// Adds `status` to every element in the current data, in data order, or clears it from
    /// every element that has it, including elements no longer in the data.
    pub fn set_all_status(&mut self, status: Status, active: bool) {
        let ids: Vec<ElementId> = if active {
            self.ids.clone()
        } else {
            self.state.status(status).as_slice().to_vec()
        };
        for id in ids {
            if self.state.set(status, &id, active, false).is_empty() {
                continue;
            }
            self.refresh_tooltip(&id);
        }
    }

    /// Highlights an element.
    pub fn highlight_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Highlighted, element, true, false);
    }

    /// Removes an element's highlight.
    pub fn unhighlight_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Highlighted, element, false, false);
    }

    /// Selects an element.
    pub fn select_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Selected, element, true, false);
    }

    /// Removes an element's selection.
    pub fn unselect_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Selected, element, false, false);
    }

    /// Fades an element.
    pub fn fade_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Faded, element, true, false);
    }

    /// Removes an element's fade.
    pub fn unfade_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Faded, element, false, false);
    }

    /// Hides an element.
    pub fn hide_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Hidden, element, true, false);
    }

    /// Shows a hidden element again.
    pub fn unhide_element<'a>(&mut self, element: impl Into<ElementRef<'a>>) {
        self.set_element_status(Status::Hidden, element, false, false);
    }

    /// Highlights every element.
    pub fn highlight_all_elements(&mut self) {
        self.set_all_status(Status::Highlighted, true);
    }

    /// Removes every highlight.
    pub fn unhighlight_all_elements(&mut self) {
        self.set_all_status(Status::Highlighted, false);
    }

    /// Selects every element.
    pub fn select_all_elements(&mut self) {
        self.set_all_status(Status::Selected, true);
    }

    /// Removes every selection.
    pub fn unselect_all_elements(&mut self) {
        self.set_all_status(Status::Selected, false);
    }

    /// Fades every element.
    pub fn fade_all_elements(&mut self) {
        self.set_all_status(Status::Faded, true);
    }

    /// Removes every fade.
    pub fn unfade_all_elements(&mut self) {
        self.set_all_status(Status::Faded, false);
    }

    /// Hides every element.
    pub fn hide_all_elements(&mut self) {
        self.set_all_status(Status::Hidden, true);
    }

    /// Shows every hidden element.
    pub fn unhide_all_elements(&mut self) {
        self.set_all_status(Status::Hidden, false);
    }

    // Tooltips

    /// Opens (or refreshes) the tooltip of an element in the current data.
    ///
    /// Calling this again for the same element updates the content in place. Returns
    /// `Ok(None)` for elements that are not in the data.
    pub fn create_tooltip<'a>(
        &mut self,
        element: impl Into<ElementRef<'a>>,
    ) -> Result<Option<&Tooltip>, Error> {
        if self.config.tooltip.is_none() {
            return Err(ConfigError::MissingTooltipLayout(self.config.id.clone()).into());
        }
        let id = self.element_id(element);
        let Some(&index) = self.positions.get(&id) else {
            regionplot_core::debug!(
                layer = self.config.id.as_str(),
                id = id.as_str(),
                "no tooltip for an element not in the data"
            );
            return Ok(None);
        };
        let tooltip = self.render_tooltip(&id, index)?;
        self.state.open_tooltip(tooltip);
        Ok(self.state.tooltip(&id))
    }

    /// Closes an element's tooltip without touching its status.
    ///
    /// The tooltip stays closed across re-renders until the element's status changes or
    /// [`create_tooltip`](Self::create_tooltip) is called. Returns `true` if a tooltip was open.
    pub fn destroy_tooltip<'a>(&mut self, element: impl Into<ElementRef<'a>>) -> bool {
        let id = self.element_id(element);
        self.state.close_tooltip(&id, true).is_some()
    }

    /// Records where the renderer placed an element's tooltip.
    pub fn position_tooltip<'a>(
        &mut self,
        element: impl Into<ElementRef<'a>>,
        anchor: Option<Point>,
    ) -> Result<(), UsageError> {
        let id = self.element_id(element);
        let Some(tooltip) = self.state.tooltip_mut(&id) else {
            return Err(UsageError::TooltipNotFound(id));
        };
        let Some(anchor) = anchor else {
            return Err(UsageError::MissingTooltipAnchor(id));
        };
        tooltip.anchor = Some(anchor);
        Ok(())
    }

    /// Returns an element's open tooltip.
    pub fn tooltip<'a>(&self, element: impl Into<ElementRef<'a>>) -> Option<&Tooltip> {
        self.state.tooltip(&self.element_id(element))
    }

    /// Iterates over open tooltips in the order they opened.
    pub fn tooltips(&self) -> impl Iterator<Item = &Tooltip> + '_ {
        self.state.tooltips()
    }

    fn render_tooltip(&self, id: &ElementId, index: usize) -> Result<Tooltip, Error> {
        let Some(config) = &self.config.tooltip else {
            return Err(ConfigError::MissingTooltipLayout(self.config.id.clone()).into());
        };
        let content = match (&config.template, self.data.get(index)) {
            (Some(template), Some(record)) => {
                template.render(&RecordView::new(record, self.annotations.entry(id)))?
            }
            _ => String::new(),
        };
        Ok(Tooltip::new(id.clone(), index, content).with_closable(config.closable))
    }

    /// Opens or closes an element's tooltip according to the layout's show/hide rules.
    fn refresh_tooltip(&mut self, id: &ElementId) {
        let Some(config) = &self.config.tooltip else {
            return;
        };
        let Some(&index) = self.positions.get(id) else {
            self.state.close_tooltip(id, false);
            return;
        };
        let visible = config.show.eval(&self.state, id) && !config.hide.eval(&self.state, id);
        if !visible {
            self.state.close_tooltip(id, false);
            return;
        }
        if self.state.is_dismissed(id) {
            return;
        }
        let tooltip = self.render_or_blank(id, index);
        self.state.open_tooltip(tooltip);
    }

    /// Renders a tooltip, falling back to empty content when the template fails.
    fn render_or_blank(&self, id: &ElementId, index: usize) -> Tooltip {
        self.render_tooltip(id, index).unwrap_or_else(|_err| {
            regionplot_core::warn!(
                layer = self.config.id.as_str(),
                id = id.as_str(),
                error = %_err,
                "tooltip content failed to render"
            );
            let closable = self.config.tooltip.as_ref().is_some_and(|t| t.closable);
            Tooltip::new(id.clone(), index, String::new()).with_closable(closable)
        })
    }
}
