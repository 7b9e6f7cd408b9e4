// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field-level building blocks for RegionPlot layouts.
//!
//! This crate provides:
//! - [`FieldRef`]: a parsed `namespace:name|transform|...` field reference,
//! - [`ValueTransform`]: the value transforms a field reference can apply,
//! - [`Filter`]: layout-driven row predicates, and
//! - [`Template`]: `{{field}}` text templates used for tooltip content.
//!
//! Everything here reads records through a [`regionplot_core::RecordView`], so element
//! annotations transparently back-fill fields the record does not have, while real fields
//! always take precedence.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod field;
mod filter;
#[cfg(not(feature = "std"))]
mod float;
mod template;
mod transform;

pub use field::FieldRef;
pub use filter::{Filter, FilterOp, FilterOperand};
pub use template::Template;
pub use transform::ValueTransform;
