// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip descriptors.

extern crate alloc;

use alloc::string::String;

use kurbo::Point;
use regionplot_core::ElementId;

/// An open tooltip, ready for the painting layer.
///
/// Descriptors carry no geometry beyond an optional anchor; where the tooltip box ends up
/// relative to the anchor is left to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// The element the tooltip belongs to.
    pub id: ElementId,
    /// Index of the element's record in the current data.
    pub index: usize,
    /// Rendered tooltip content.
    pub content: String,
    /// Anchor position in panel coordinates, once the renderer has placed the tooltip.
    pub anchor: Option<Point>,
    /// Whether the tooltip shows a close control.
    pub closable: bool,
}

impl Tooltip {
    /// Creates an unanchored tooltip.
    pub fn new(id: ElementId, index: usize, content: String) -> Self {
        Self {
            id,
            index,
            content,
            anchor: None,
            closable: false,
        }
    }

    /// Sets whether the tooltip is closable.
    pub fn with_closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }
}
