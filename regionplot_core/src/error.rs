// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Two kinds of failure are reported:
//! - [`ConfigError`]: the layout or registry the caller built is malformed. Not retryable.
//! - [`UsageError`]: an API was called with arguments it cannot work with.
//!
//! Incomplete data is never an error: missing fields resolve to `None`, unknown element ids
//! are ignored, and non-numeric extents degrade to an undefined extent.

extern crate alloc;

use alloc::string::String;
use core::fmt;

use crate::{ElementId, Value};

/// A malformed layout or registry configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// An axis extent was requested but the axis layout has no `field`.
    MissingAxisField {
        /// The axis name (`x`, `y1`, `y2`).
        axis: String,
    },
    /// The axis identifier is not one of the supported axes.
    UnknownAxis(String),
    /// A scale rule names a function that is not registered.
    UnknownScaleFunction(String),
    /// A scale function is missing a parameter it cannot work without.
    MissingParameter {
        /// The scale function name.
        function: &'static str,
        /// The missing parameter.
        parameter: &'static str,
    },
    /// A status expression names an unknown status.
    UnknownStatus(String),
    /// A field reference names an unknown value transform.
    UnknownTransform(String),
    /// A field reference is empty or otherwise unparsable.
    InvalidField(String),
    /// A filter names an unknown comparison operator.
    UnknownOperator(String),
    /// A tooltip template is malformed.
    InvalidTemplate {
        /// What went wrong.
        reason: &'static str,
    },
    /// A layer id is not present in the container.
    UnknownLayer(String),
    /// A layer id is used twice within the same container.
    DuplicateLayer(String),
    /// A named encoding is not declared by the layer layout.
    UnknownEncoding(String),
    /// A tooltip was requested from a layer whose layout has no tooltip section.
    MissingTooltipLayout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAxisField { axis } => {
                write!(f, "axis `{axis}` has no field to compute an extent from")
            }
            Self::UnknownAxis(axis) => write!(f, "unknown axis `{axis}` (expected x, y1 or y2)"),
            Self::UnknownScaleFunction(name) => {
                write!(f, "scale function `{name}` is not registered")
            }
            Self::MissingParameter {
                function,
                parameter,
            } => write!(f, "scale function `{function}` requires parameter `{parameter}`"),
            Self::UnknownStatus(name) => write!(f, "unknown element status `{name}`"),
            Self::UnknownTransform(name) => write!(f, "unknown value transform `{name}`"),
            Self::InvalidField(raw) => write!(f, "invalid field reference `{raw}`"),
            Self::UnknownOperator(op) => write!(f, "unknown filter operator `{op}`"),
            Self::InvalidTemplate { reason } => write!(f, "invalid template: {reason}"),
            Self::UnknownLayer(id) => write!(f, "no layer with id `{id}`"),
            Self::DuplicateLayer(id) => write!(f, "layer id `{id}` is already in use"),
            Self::UnknownEncoding(name) => write!(f, "layer has no encoding named `{name}`"),
            Self::MissingTooltipLayout(layer) => {
                write!(f, "layer `{layer}` has no tooltip layout")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// An API called with arguments it cannot work with.
#[derive(Clone, Debug, PartialEq)]
pub enum UsageError {
    /// The element has no open tooltip.
    TooltipNotFound(ElementId),
    /// Tooltip positioning was requested without an anchor.
    MissingTooltipAnchor(ElementId),
    /// A value transform was applied to a value of the wrong type.
    InvalidTransformArgument {
        /// The transform name.
        transform: &'static str,
        /// The offending value.
        value: Value,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooltipNotFound(id) => write!(f, "element `{id}` has no open tooltip"),
            Self::MissingTooltipAnchor(id) => {
                write!(f, "positioning the tooltip of `{id}` requires an anchor")
            }
            Self::InvalidTransformArgument { transform, value } => {
                write!(f, "transform `{transform}` cannot be applied to `{value}`")
            }
        }
    }
}

impl core::error::Error for UsageError {}

/// Any error produced by RegionPlot.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// See [`ConfigError`].
    Config(ConfigError),
    /// See [`UsageError`].
    Usage(UsageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Usage(err) => write!(f, "usage error: {err}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Usage(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<UsageError> for Error {
    fn from(value: UsageError) -> Self {
        Self::Usage(value)
    }
}
