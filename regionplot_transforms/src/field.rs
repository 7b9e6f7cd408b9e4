// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field references.

extern crate alloc;

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use regionplot_core::{ConfigError, RecordView, UsageError, Value};
use smallvec::SmallVec;

use crate::ValueTransform;

/// A parsed field reference: `[namespace:]name[|transform...]`.
///
/// Resolution reads, in order:
/// 1. the qualified record field (`namespace:name`),
/// 2. the bare record field (`name`), when a namespace was given,
/// 3. the element annotation stored under the qualified name,
///
/// and then applies the transforms left to right.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub struct FieldRef {
    raw: String,
    qualified: String,
    name_start: usize,
    transforms: SmallVec<[ValueTransform; 2]>,
}

impl FieldRef {
    /// Parses a field reference.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut parts = raw.split('|');
        let field = parts.next().unwrap_or_default().trim();
        if field.is_empty() {
            return Err(ConfigError::InvalidField(raw.into()));
        }
        let name_start = match field.split_once(':') {
            Some((namespace, name)) => {
                if namespace.is_empty() || name.is_empty() {
                    return Err(ConfigError::InvalidField(raw.into()));
                }
                namespace.len() + 1
            }
            None => 0,
        };
        let transforms = parts
            .map(|t| t.trim().parse::<ValueTransform>())
            .collect::<Result<SmallVec<_>, _>>()?;
        Ok(Self {
            raw: raw.into(),
            qualified: field.into(),
            name_start,
            transforms,
        })
    }

    /// The reference as written in the layout.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The field name including its namespace, without transforms.
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// The namespace, if one was given.
    pub fn namespace(&self) -> Option<&str> {
        (self.name_start > 0).then(|| &self.qualified[..self.name_start - 1])
    }

    /// The field name without namespace.
    pub fn name(&self) -> &str {
        &self.qualified[self.name_start..]
    }

    /// The transforms applied after lookup.
    pub fn transforms(&self) -> &[ValueTransform] {
        &self.transforms
    }

    /// Looks the field up without applying transforms.
    pub fn lookup<'a>(&self, view: &RecordView<'a>) -> Option<&'a Value> {
        view.field(&self.qualified)
            .or_else(|| {
                self.namespace()
                    .is_some()
                    .then(|| view.field(self.name()))
                    .flatten()
            })
            .or_else(|| view.annotation(&self.qualified))
    }

    /// Looks the field up and applies the transforms.
    pub fn resolve(&self, view: &RecordView<'_>) -> Result<Option<Value>, UsageError> {
        self.transforms
            .iter()
            .try_fold(self.lookup(view).cloned(), |value, t| t.apply(value))
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FieldRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldRef {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for FieldRef {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
