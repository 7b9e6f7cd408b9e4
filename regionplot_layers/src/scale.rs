// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalable parameters and the scale-function registry.
//!
//! A layout value such as a point color can be a literal, a rule that calls a named scale
//! function on one field (or the whole record), or an ordered list of candidates where the
//! first non-missing result wins:
//!
//! ```
//! use regionplot_core::{Record, RecordView, Value};
//! use regionplot_layers::{Params, ScalableParam, ScaleRegistry, ScaleRule};
//! use regionplot_transforms::FieldRef;
//!
//! let registry = ScaleRegistry::with_builtins();
//! let color = ScalableParam::List(vec![
//!     ScaleRule::new("categorical_bin")
//!         .with_field(FieldRef::parse("gene:biotype").unwrap())
//!         .with_parameters(
//!             Params::new()
//!                 .with("categories", vec![Value::from("protein_coding")])
//!                 .with("values", vec![Value::from("#1f77b4")]),
//!         )
//!         .into(),
//!     Value::from("#cccccc").into(),
//! ]);
//!
//! let record = Record::new().with("gene:biotype", "lncRNA");
//! let view = RecordView::bare(&record);
//! assert_eq!(color.resolve(&registry, &view, 0), Ok(Some(Value::from("#cccccc"))));
//! ```

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use regionplot_core::{ConfigError, Error, RecordView, Value};
use regionplot_transforms::FieldRef;

use crate::scale_functions;

/// One scale-function parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum ParamValue {
    /// An explicit `null`.
    Null,
    /// A scalar.
    Scalar(Value),
    /// A list of scalars (`breaks`, `values`, `categories`, ...).
    List(Vec<Value>),
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Value>> for ParamValue {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value.into())
    }
}

/// Named parameters passed to a scale function.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(transparent))]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Returns a scalar parameter; `null` and lists read as missing.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.0.get(name)? {
            ParamValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a list parameter; a missing or non-list parameter reads as empty.
    pub fn list(&self, name: &str) -> &[Value] {
        match self.0.get(name) {
            Some(ParamValue::List(values)) => values,
            _ => &[],
        }
    }

    /// Returns a string parameter.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }
}

/// The input handed to a scale function.
#[derive(Clone, Debug)]
pub enum ScaleInput<'a> {
    /// The resolved value of the rule's field (`None` if missing).
    Value(Option<Value>),
    /// The whole record, for rules without a field.
    Record(RecordView<'a>),
}

impl ScaleInput<'_> {
    /// Returns the field value, if this input is a present field value.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => v.as_ref(),
            Self::Record(_) => None,
        }
    }
}

/// A scale function: `(parameters, input, index) -> value`.
///
/// Returning `Ok(None)` means "no value", which lets a [`ScalableParam::List`] fall through
/// to its next candidate.
pub type ScaleFn =
    Box<dyn Fn(&Params, &ScaleInput<'_>, usize) -> Result<Option<Value>, Error> + 'static>;

/// A named registry of scale functions.
///
/// The registry is mutated only through [`register`](Self::register) and
/// [`unregister`](Self::unregister), which take `&mut self`; resolution borrows it shared, so
/// it cannot change in the middle of a resolution pass.
#[derive(Default)]
pub struct ScaleRegistry {
    functions: HashMap<String, ScaleFn>,
}

impl fmt::Debug for ScaleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort_unstable();
        f.debug_struct("ScaleRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl ScaleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in scale functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        scale_functions::register_builtins(&mut registry);
        registry
    }

    /// Registers `function` under `name`, returning `true` if it replaced an existing one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&Params, &ScaleInput<'_>, usize) -> Result<Option<Value>, Error> + 'static,
    ) -> bool {
        self.functions
            .insert(name.into(), Box::new(function))
            .is_some()
    }

    /// Removes the function registered under `name`, returning `true` if there was one.
    ///
    /// Removing a function that a layout still references is not detected here; resolving
    /// that layout later reports [`ConfigError::UnknownScaleFunction`].
    pub fn unregister(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Calls the function registered under `name`.
    pub fn call(
        &self,
        name: &str,
        params: &Params,
        input: &ScaleInput<'_>,
        index: usize,
    ) -> Result<Option<Value>, Error> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| ConfigError::UnknownScaleFunction(name.into()))?;
        function(params, input, index)
    }
}

/// A scale rule: call `scale_function` on `field` (or the whole record).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ScaleRule {
    /// Name of a registered scale function.
    pub scale_function: String,
    /// Field whose value is passed to the function; the whole record is passed if unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub field: Option<FieldRef>,
    /// Function parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Params,
}

impl ScaleRule {
    /// Creates a rule calling `scale_function` on the whole record.
    pub fn new(scale_function: impl Into<String>) -> Self {
        Self {
            scale_function: scale_function.into(),
            field: None,
            parameters: Params::new(),
        }
    }

    /// Sets the input field.
    pub fn with_field(mut self, field: FieldRef) -> Self {
        self.field = Some(field);
        self
    }

    /// Sets the parameters.
    pub fn with_parameters(mut self, parameters: Params) -> Self {
        self.parameters = parameters;
        self
    }

    /// Resolves the rule for one record.
    pub fn resolve(
        &self,
        registry: &ScaleRegistry,
        view: &RecordView<'_>,
        index: usize,
    ) -> Result<Option<Value>, Error> {
        let input = match &self.field {
            Some(field) => ScaleInput::Value(field.resolve(view)?),
            None => ScaleInput::Record(*view),
        };
        registry.call(&self.scale_function, &self.parameters, &input, index)
    }
}

/// A layout value that may depend on the data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum ScalableParam {
    /// A constant. Strings are literals here, never field references.
    Literal(Value),
    /// A scale-function call.
    Rule(ScaleRule),
    /// Candidates tried in order; the first non-missing result wins.
    List(Vec<ScalableParam>),
}

impl From<Value> for ScalableParam {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<ScaleRule> for ScalableParam {
    fn from(value: ScaleRule) -> Self {
        Self::Rule(value)
    }
}

impl ScalableParam {
    /// Resolves the parameter for the record at `index` in its originating collection.
    ///
    /// Fields are read through `view`, so element annotations back-fill missing fields.
    pub fn resolve(
        &self,
        registry: &ScaleRegistry,
        view: &RecordView<'_>,
        index: usize,
    ) -> Result<Option<Value>, Error> {
        match self {
            Self::Literal(value) => Ok(Some(value.clone())),
            Self::Rule(rule) => rule.resolve(registry, view, index),
            Self::List(candidates) => {
                for candidate in candidates {
                    if let Some(value) = candidate.resolve(registry, view, index)? {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
        }
    }
}
