// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis extents.

extern crate alloc;

use core::fmt;
use core::str::FromStr;

use regionplot_core::{ConfigError, Error, RecordView, Value};
use regionplot_transforms::FieldRef;

/// A layer axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisId {
    /// The horizontal axis.
    X,
    /// The primary vertical axis.
    Y1,
    /// The secondary vertical axis.
    Y2,
}

impl AxisId {
    /// Returns the axis name (`x`, `y1`, `y2`).
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y1 => "y1",
            Self::Y2 => "y2",
        }
    }

    /// Returns the vertical axis with the given number (`1` or `2`).
    pub fn vertical(number: u8) -> Result<Self, ConfigError> {
        match number {
            1 => Ok(Self::Y1),
            2 => Ok(Self::Y2),
            other => Err(ConfigError::UnknownAxis(alloc::format!("y{other}"))),
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::X),
            "y1" => Ok(Self::Y1),
            "y2" => Ok(Self::Y2),
            other => Err(ConfigError::UnknownAxis(other.into())),
        }
    }
}

/// Axis layout for one layer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct AxisLayout {
    /// Field whose values span the axis.
    pub field: Option<FieldRef>,
    /// Padding below the data, as a fraction of the data range.
    pub lower_buffer: Option<f64>,
    /// Padding above the data, as a fraction of the data range.
    pub upper_buffer: Option<f64>,
    /// A range the extent always covers.
    pub min_extent: Option<[f64; 2]>,
    /// Absolute lower clamp, applied last.
    pub floor: Option<f64>,
    /// Absolute upper clamp, applied last.
    pub ceiling: Option<f64>,
}

impl AxisLayout {
    /// Creates an axis layout reading `field`.
    pub fn new(field: FieldRef) -> Self {
        Self {
            field: Some(field),
            ..Self::default()
        }
    }

    /// Sets the lower buffer.
    pub fn with_lower_buffer(mut self, buffer: f64) -> Self {
        self.lower_buffer = Some(buffer);
        self
    }

    /// Sets the upper buffer.
    pub fn with_upper_buffer(mut self, buffer: f64) -> Self {
        self.upper_buffer = Some(buffer);
        self
    }

    /// Sets the minimum extent.
    pub fn with_min_extent(mut self, lo: f64, hi: f64) -> Self {
        self.min_extent = Some([lo, hi]);
        self
    }

    /// Sets the floor.
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Sets the ceiling.
    pub fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }
}

/// A computed axis extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
    /// No data and no minimum extent.
    Empty,
    /// The field is not numeric, so no range exists.
    Undefined,
    /// A numeric range.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

impl Extent {
    /// Returns `(min, max)` for a numeric range.
    pub fn range(self) -> Option<(f64, f64)> {
        match self {
            Self::Range { min, max } => Some((min, max)),
            _ => None,
        }
    }
}

/// Computes the extent of `axis` over `records`.
///
/// Order of operations:
/// 1. collect the field values; a non-numeric value makes the extent [`Extent::Undefined`],
/// 2. pad the data range by the buffers,
/// 3. widen to `min_extent`,
/// 4. clamp to `floor` and `ceiling`.
///
/// Missing and non-finite values are skipped. With no records the extent is `min_extent`
/// (clamped), or [`Extent::Empty`].
pub fn compute_extent<'a>(
    axis: AxisId,
    layout: &AxisLayout,
    records: impl IntoIterator<Item = RecordView<'a>>,
) -> Result<Extent, Error> {
    let field = layout
        .field
        .as_ref()
        .ok_or_else(|| ConfigError::MissingAxisField {
            axis: axis.name().into(),
        })?;

    let mut seen_records = false;
    let mut bounds: Option<(f64, f64)> = None;
    for view in records {
        seen_records = true;
        match field.resolve(&view)? {
            None => {}
            Some(Value::Number(x)) if !x.is_finite() => {}
            Some(Value::Number(x)) => {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(x), hi.max(x)),
                    None => (x, x),
                });
            }
            Some(_) => return Ok(Extent::Undefined),
        }
    }

    let (mut min, mut max) = match (seen_records, bounds, layout.min_extent) {
        (false, _, None) => return Ok(Extent::Empty),
        (false, _, Some([lo, hi])) => (lo, hi),
        (true, None, _) => return Ok(Extent::Undefined),
        (true, Some((data_min, data_max)), min_extent) => {
            let range = data_max - data_min;
            let min = data_min - layout.lower_buffer.unwrap_or(0.0) * range;
            let max = data_max + layout.upper_buffer.unwrap_or(0.0) * range;
            match min_extent {
                Some([lo, hi]) => (min.min(lo), max.max(hi)),
                None => (min, max),
            }
        }
    };

    if let (Some(floor), Some(ceiling)) = (layout.floor, layout.ceiling)
        && floor > ceiling
    {
        regionplot_core::debug!(
            axis = axis.name(),
            floor,
            ceiling,
            "axis floor is above its ceiling; extent will be inverted"
        );
    }
    if let Some(floor) = layout.floor {
        min = min.max(floor);
    }
    if let Some(ceiling) = layout.ceiling {
        max = max.min(ceiling);
    }
    Ok(Extent::Range { min, max })
}
