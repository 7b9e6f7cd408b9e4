// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value transforms applied by field references (`assoc:pvalue|neglog10`).

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt::Write as _;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use regionplot_core::{ConfigError, UsageError, Value};

/// A named transform applied to a resolved field value.
///
/// Missing values pass through every transform unchanged, so a transform chain never turns
/// "no data" into an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueTransform {
    /// `-log10(x)`; non-positive inputs become missing.
    NegLog10,
    /// `log10(x)`; non-positive inputs become missing.
    Log10,
    /// Formats a `-log10(p)` value back as a p-value string (`"3.16 × 10^-8"`).
    LogToSciNotation,
    /// Formats a number in scientific notation when its magnitude warrants it.
    SciNotation,
    /// Escapes `&`, `<`, `>`, `"` and `'` for HTML output.
    HtmlEscape,
    /// Percent-encodes a value for use in a URL component.
    UrlEncode,
    /// `true` if the value is a number.
    IsNumeric,
    /// The display string of the value.
    ToString,
}

impl ValueTransform {
    /// Returns the layout name of this transform.
    pub fn name(self) -> &'static str {
        match self {
            Self::NegLog10 => "neglog10",
            Self::Log10 => "log10",
            Self::LogToSciNotation => "logtoscinotation",
            Self::SciNotation => "scinotation",
            Self::HtmlEscape => "htmlescape",
            Self::UrlEncode => "urlencode",
            Self::IsNumeric => "is_numeric",
            Self::ToString => "tostring",
        }
    }

    /// Applies the transform.
    ///
    /// Numeric transforms reject strings and booleans with
    /// [`UsageError::InvalidTransformArgument`].
    pub fn apply(self, value: Option<Value>) -> Result<Option<Value>, UsageError> {
        let Some(value) = value else {
            return Ok(None);
        };
        Ok(match self {
            Self::NegLog10 => {
                let x = self.numeric(&value)?;
                (x > 0.0).then(|| Value::Number(-x.log10()))
            }
            Self::Log10 => {
                let x = self.numeric(&value)?;
                (x > 0.0).then(|| Value::Number(x.log10()))
            }
            Self::LogToSciNotation => Some(Value::String(log_to_sci_notation(
                self.numeric(&value)?,
            ))),
            Self::SciNotation => Some(Value::String(sci_notation(self.numeric(&value)?))),
            Self::HtmlEscape => Some(Value::String(html_escape(&value.to_string()))),
            Self::UrlEncode => Some(Value::String(url_encode(&value.to_string()))),
            Self::IsNumeric => Some(Value::Bool(value.is_number())),
            Self::ToString => Some(Value::String(value.to_string())),
        })
    }

    fn numeric(self, value: &Value) -> Result<f64, UsageError> {
        match value {
            Value::Number(x) => Ok(*x),
            other => Err(UsageError::InvalidTransformArgument {
                transform: self.name(),
                value: other.clone(),
            }),
        }
    }
}

impl FromStr for ValueTransform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "neglog10" => Self::NegLog10,
            "log10" => Self::Log10,
            "logtoscinotation" => Self::LogToSciNotation,
            "scinotation" => Self::SciNotation,
            "htmlescape" => Self::HtmlEscape,
            "urlencode" => Self::UrlEncode,
            "is_numeric" => Self::IsNumeric,
            "tostring" => Self::ToString,
            other => return Err(ConfigError::UnknownTransform(other.into())),
        })
    }
}

fn log_to_sci_notation(x: f64) -> String {
    if x.is_nan() {
        return "NaN".into();
    }
    if x == 0.0 {
        return "1".into();
    }
    let exp = x.ceil();
    let base = 10_f64.powf(exp - x);
    if exp == 1.0 {
        alloc::format!("{:.4}", base / 10.0)
    } else if exp == 2.0 {
        alloc::format!("{:.3}", base / 100.0)
    } else {
        alloc::format!("{base:.2} × 10^-{exp}")
    }
}

fn sci_notation(x: f64) -> String {
    if x.is_nan() {
        return "NaN".into();
    }
    if x == 0.0 {
        return "0".into();
    }
    let magnitude = if x < 0.0 { -x } else { x };
    let log = if magnitude > 1.0 {
        magnitude.log10().ceil()
    } else {
        magnitude.log10().floor()
    };
    if (-3.0..=3.0).contains(&log) {
        alloc::format!("{x:.3}")
    } else {
        alloc::format!("{x:.2e}").replace('e', " × 10^")
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

fn url_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(byte)),
            other => {
                let _ = write!(out, "%{other:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn num(v: Option<Value>) -> f64 {
        v.and_then(|v| v.as_f64()).unwrap()
    }

    #[test]
    fn neglog10_of_pvalues() {
        let out = ValueTransform::NegLog10.apply(Some(Value::from(1e-8))).unwrap();
        assert!((num(out) - 8.0).abs() < 1e-9);
        assert_eq!(ValueTransform::NegLog10.apply(Some(Value::from(0))), Ok(None));
        assert_eq!(ValueTransform::NegLog10.apply(None), Ok(None));
    }

    #[test]
    fn numeric_transforms_reject_strings() {
        let err = ValueTransform::Log10
            .apply(Some(Value::from("abc")))
            .unwrap_err();
        assert_eq!(
            err,
            UsageError::InvalidTransformArgument {
                transform: "log10",
                value: Value::from("abc"),
            }
        );
    }

    #[test]
    fn log_to_sci_notation_formats_small_pvalues() {
        let t = ValueTransform::LogToSciNotation;
        assert_eq!(t.apply(Some(Value::from(0))), Ok(Some(Value::from("1"))));
        assert_eq!(t.apply(Some(Value::from(1))), Ok(Some(Value::from("0.1000"))));
        assert_eq!(
            t.apply(Some(Value::from(2))),
            Ok(Some(Value::from("0.010")))
        );
        assert_eq!(
            t.apply(Some(Value::from(8))),
            Ok(Some(Value::from("1.00 × 10^-8")))
        );
    }

    #[test]
    fn sci_notation_switches_on_magnitude() {
        let t = ValueTransform::SciNotation;
        assert_eq!(t.apply(Some(Value::from(0.5))), Ok(Some(Value::from("0.500"))));
        assert_eq!(
            t.apply(Some(Value::from(123_456.0))),
            Ok(Some(Value::from("1.23 × 10^5")))
        );
        assert_eq!(
            t.apply(Some(Value::from(0.000_012_6))),
            Ok(Some(Value::from("1.26 × 10^-5")))
        );
    }

    #[test]
    fn escaping_transforms() {
        assert_eq!(
            ValueTransform::HtmlEscape.apply(Some(Value::from("<b>&'\""))),
            Ok(Some(Value::from("&lt;b&gt;&amp;&#039;&quot;")))
        );
        assert_eq!(
            ValueTransform::UrlEncode.apply(Some(Value::from("1:100 A/G"))),
            Ok(Some(Value::from("1%3A100%20A%2FG")))
        );
    }

    #[test]
    fn unknown_names_are_config_errors() {
        assert_eq!(
            "neglog".parse::<ValueTransform>(),
            Err(ConfigError::UnknownTransform("neglog".into()))
        );
        assert_eq!(
            "is_numeric".parse::<ValueTransform>(),
            Ok(ValueTransform::IsNumeric)
        );
    }
}
