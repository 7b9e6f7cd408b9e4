// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `regionplot_core`: the data model shared by RegionPlot data layers.
//!
//! This crate provides:
//! - scalar field values ([`Value`]) and uniform data records ([`Record`])
//! - an annotation-aware read view over a record ([`RecordView`])
//! - layer-scoped element identity ([`ElementId`], [`ElementRef`], [`IdentityScheme`])
//! - the error types used across the workspace ([`Error`], [`ConfigError`], [`UsageError`])
//!
//! Records are supplied by an external data provider; nothing in this crate fetches or caches
//! data. Conceptually, a data layer:
//! - receives a complete `Vec<Record>` per re-render
//! - derives one [`ElementId`] per record through its [`IdentityScheme`]
//! - keeps interaction state and annotations keyed by those ids, so they survive reloads.

#![no_std]

extern crate alloc;

mod error;
mod identity;
#[doc(hidden)]
pub mod logging;
mod record;
mod value;

pub use error::{ConfigError, Error, UsageError};
pub use identity::{ElementId, ElementRef, IdentityScheme};
pub use record::{Annotations, Record, RecordView};
pub use value::Value;
