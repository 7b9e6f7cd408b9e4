// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar field values.

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// A scalar value held by a record field, an annotation, or produced by a scale function.
///
/// Missing values are modelled as `Option<Value>::None` rather than as a variant, so "null" and
/// "undefined" collapse into one state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A number. Integers are stored as `f64`.
    Number(f64),
    /// A string (categories, labels, colors, ...).
    String(String),
}

impl Value {
    /// Returns the numeric payload, if this is a finite number.
    ///
    /// `NaN` and infinities are treated as missing by every numeric consumer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` for numbers, including non-finite ones.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Truthiness as used by template conditionals and filters.
    ///
    /// `false`, `0`, `NaN` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(v) => *v != 0.0 && !v.is_nan(),
            Self::String(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(v) => {
                // Integral values print without a fractional part ("5", not "5.0").
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "only used when the round trip through i64 is exact"
                )]
                let int = *v as i64;
                if v.is_finite() && *v == int as f64 {
                    write!(f, "{int}")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(-12.0).to_string(), "-12");
        assert_eq!(Value::from(0.25).to_string(), "0.25");
    }

    #[test]
    fn non_finite_numbers_are_not_numeric_payloads() {
        assert_eq!(Value::Number(f64::NAN).as_f64(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_f64(), None);
        assert!(Value::Number(f64::NAN).is_number());
    }

    #[test]
    fn truthiness_follows_falsy_scalars() {
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::from(-1).is_truthy());
    }
}
