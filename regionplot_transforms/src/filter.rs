// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-driven row filters.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::str::FromStr;

use regionplot_core::{ConfigError, RecordView, UsageError, Value};

use crate::FieldRef;

/// Comparison operators for filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `in`: the field value is one of the operand values.
    In,
    /// `match`: the field value, as a string, contains the operand.
    Match,
}

impl FromStr for FilterOp {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "=" | "==" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "in" => Self::In,
            "match" => Self::Match,
            other => return Err(ConfigError::UnknownOperator(other.into())),
        })
    }
}

/// The right-hand side of a filter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum FilterOperand {
    /// A single value.
    One(Value),
    /// A list of values (used by [`FilterOp::In`]).
    Many(Vec<Value>),
}

impl From<Value> for FilterOperand {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Value>> for FilterOperand {
    fn from(value: Vec<Value>) -> Self {
        Self::Many(value)
    }
}

/// A row predicate: `field operator value`.
///
/// Fields resolve through [`FieldRef`], so annotations participate as a fallback: a filter on
/// `custom_field = true` matches records whose element was annotated with `custom_field`,
/// unless the record carries a real `custom_field` of its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "FilterLayout"))]
pub struct Filter {
    /// Field to read.
    pub field: FieldRef,
    /// Comparison operator.
    pub op: FilterOp,
    /// Right-hand operand.
    pub operand: FilterOperand,
}

impl Filter {
    /// Creates a filter.
    pub fn new(field: FieldRef, op: FilterOp, operand: impl Into<FilterOperand>) -> Self {
        Self {
            field,
            op,
            operand: operand.into(),
        }
    }

    /// Evaluates the filter for one record.
    ///
    /// A missing field only satisfies `!=`.
    pub fn matches(&self, view: &RecordView<'_>) -> Result<bool, UsageError> {
        let Some(value) = self.field.resolve(view)? else {
            return Ok(self.op == FilterOp::Ne);
        };
        Ok(match (&self.operand, self.op) {
            (FilterOperand::Many(values), FilterOp::In) => values.contains(&value),
            (FilterOperand::Many(values), FilterOp::Ne) => !values.contains(&value),
            (FilterOperand::Many(_), _) => false,
            (FilterOperand::One(operand), op) => compare(&value, op, operand),
        })
    }

    /// Returns `true` if every filter matches.
    pub fn all_match(filters: &[Self], view: &RecordView<'_>) -> Result<bool, UsageError> {
        for filter in filters {
            if !filter.matches(view)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn compare(value: &Value, op: FilterOp, operand: &Value) -> bool {
    match op {
        FilterOp::Eq | FilterOp::In => value == operand,
        FilterOp::Ne => value != operand,
        FilterOp::Match => value.to_string().contains(&operand.to_string()),
        FilterOp::Lt | FilterOp::Le | FilterOp::Gt | FilterOp::Ge => {
            let Some(ord) = partial_cmp(value, operand) else {
                return false;
            };
            match op {
                FilterOp::Lt => ord == Ordering::Less,
                FilterOp::Le => ord != Ordering::Greater,
                FilterOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            }
        }
    }
}

fn partial_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct FilterLayout {
    field: FieldRef,
    operator: String,
    value: FilterOperand,
}

#[cfg(feature = "serde")]
impl TryFrom<FilterLayout> for Filter {
    type Error = ConfigError;

    fn try_from(layout: FilterLayout) -> Result<Self, Self::Error> {
        Ok(Self {
            field: layout.field,
            op: layout.operator.parse()?,
            operand: layout.value,
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use regionplot_core::{Annotations, Record};

    use super::*;

    fn filter(field: &str, op: &str, operand: impl Into<FilterOperand>) -> Filter {
        Filter::new(
            FieldRef::parse(field).unwrap(),
            op.parse().unwrap(),
            operand,
        )
    }

    #[test]
    fn numeric_comparisons() {
        let record = Record::new().with("pvalue", 0.01);
        let view = RecordView::bare(&record);
        assert_eq!(filter("pvalue", "<", Value::from(0.05)).matches(&view), Ok(true));
        assert_eq!(filter("pvalue", ">=", Value::from(0.05)).matches(&view), Ok(false));
        assert_eq!(filter("pvalue", "<=", Value::from(0.01)).matches(&view), Ok(true));
    }

    #[test]
    fn mixed_types_never_order() {
        let record = Record::new().with("chrom", "10");
        let view = RecordView::bare(&record);
        assert_eq!(filter("chrom", "<", Value::from(20)).matches(&view), Ok(false));
        assert_eq!(filter("chrom", ">", Value::from(20)).matches(&view), Ok(false));
    }

    #[test]
    fn membership_and_match() {
        let record = Record::new().with("gene", "APOE");
        let view = RecordView::bare(&record);
        let genes = vec![Value::from("APOC1"), Value::from("APOE")];
        assert_eq!(filter("gene", "in", genes.clone()).matches(&view), Ok(true));
        assert_eq!(filter("gene", "!=", genes).matches(&view), Ok(false));
        assert_eq!(filter("gene", "match", Value::from("PO")).matches(&view), Ok(true));
    }

    #[test]
    fn missing_fields_only_satisfy_not_equal() {
        let record = Record::new();
        let view = RecordView::bare(&record);
        assert_eq!(filter("x", "=", Value::from(1)).matches(&view), Ok(false));
        assert_eq!(filter("x", "!=", Value::from(1)).matches(&view), Ok(true));
    }

    #[test]
    fn real_false_field_beats_true_annotation() {
        let record = Record::new().with("some_field", false);
        let mut notes = Annotations::new();
        notes.insert("some_field".into(), Value::Bool(true));
        let view = RecordView::new(&record, Some(&notes));
        assert_eq!(
            filter("some_field", "=", Value::Bool(true)).matches(&view),
            Ok(false)
        );
    }

    #[test]
    fn unknown_operator_is_a_config_error() {
        assert_eq!(
            "~=".parse::<FilterOp>(),
            Err(ConfigError::UnknownOperator("~=".into()))
        );
    }
}
