// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in scale functions.

extern crate alloc;

use alloc::string::String;

use regionplot_core::{ConfigError, Error, Value};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::{Params, ScaleInput, ScaleRegistry};

pub(crate) fn register_builtins(registry: &mut ScaleRegistry) {
    registry.register("if", if_value);
    registry.register("numerical_bin", numerical_bin);
    registry.register("categorical_bin", categorical_bin);
    registry.register("ordinal_cycle", ordinal_cycle);
    registry.register("stable_choice", stable_choice);
    registry.register("interpolate", interpolate);
    registry.register("effect_direction", effect_direction);
}

type ScaleResult = Result<Option<Value>, Error>;

fn null_value(params: &Params) -> Option<Value> {
    params.value("null_value").cloned()
}

fn numeric_input(input: &ScaleInput<'_>) -> Option<f64> {
    match input.value()? {
        Value::Number(x) => x.is_finite().then_some(*x),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        Value::Bool(_) => None,
    }
}

/// `then` when the input equals `field_value`, else `else`.
fn if_value(params: &Params, input: &ScaleInput<'_>, _: usize) -> ScaleResult {
    let matched = match (input.value(), params.value("field_value")) {
        (Some(value), Some(expected)) => value == expected,
        _ => false,
    };
    let branch = if matched { "then" } else { "else" };
    Ok(params.value(branch).cloned())
}

/// Maps a number to `values[i]` where `breaks[i]` is the greatest break not above it.
///
/// Inputs below the first break use the first value.
fn numerical_bin(params: &Params, input: &ScaleInput<'_>, _: usize) -> ScaleResult {
    let Some(x) = numeric_input(input) else {
        return Ok(null_value(params));
    };
    let breaks = params.list("breaks");
    let values = params.list("values");
    let mut bin = None;
    for (i, brk) in breaks.iter().enumerate() {
        let Some(brk) = brk.as_f64() else {
            continue;
        };
        if bin.is_none() || x >= brk {
            bin = Some(i);
        }
    }
    Ok(bin
        .and_then(|i| values.get(i).cloned())
        .or_else(|| null_value(params)))
}

/// Maps a category to the value at the same position.
fn categorical_bin(params: &Params, input: &ScaleInput<'_>, _: usize) -> ScaleResult {
    let position = input
        .value()
        .and_then(|v| params.list("categories").iter().position(|c| c == v));
    Ok(position
        .and_then(|i| params.list("values").get(i).cloned())
        .or_else(|| null_value(params)))
}

/// Cycles through `values` by record index.
fn ordinal_cycle(params: &Params, _: &ScaleInput<'_>, index: usize) -> ScaleResult {
    let values = params.list("values");
    if values.is_empty() {
        return Ok(None);
    }
    Ok(values.get(index % values.len()).cloned())
}

/// Picks a value by hashing the input's display string, so equal inputs always get the same
/// value regardless of data order.
fn stable_choice(params: &Params, input: &ScaleInput<'_>, _: usize) -> ScaleResult {
    let values = params.list("values");
    let Some(value) = input.value() else {
        return Ok(None);
    };
    if values.is_empty() {
        return Ok(None);
    }
    let key = alloc::format!("{value}");
    let hash = key.encode_utf16().fold(0_i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });
    let slot = usize::try_from(hash.unsigned_abs()).unwrap_or(0) % values.len();
    Ok(values.get(slot).cloned())
}

/// Linear interpolation between `values` over `breaks`.
///
/// Values are either all numbers or all `#rrggbb` colors. Inputs outside the breaks clamp to
/// the end values.
fn interpolate(params: &Params, input: &ScaleInput<'_>, _: usize) -> ScaleResult {
    let breaks = params.list("breaks");
    let values = params.list("values");
    if breaks.len() < 2 || breaks.len() != values.len() {
        return Ok(null_value(params));
    }
    let Some(x) = numeric_input(input) else {
        return Ok(null_value(params));
    };
    let first = breaks[0].as_f64();
    let last = breaks[breaks.len() - 1].as_f64();
    if first.is_some_and(|b| x <= b) {
        return Ok(Some(values[0].clone()));
    }
    if last.is_some_and(|b| x >= b) {
        return Ok(Some(values[values.len() - 1].clone()));
    }
    let upper = (1..breaks.len()).rev().find(|&i| {
        match (breaks[i - 1].as_f64(), breaks[i].as_f64()) {
            (Some(lo), Some(hi)) => lo <= x && x <= hi,
            _ => false,
        }
    });
    let Some(upper) = upper else {
        return Ok(null_value(params));
    };
    let (Some(lo), Some(hi)) = (breaks[upper - 1].as_f64(), breaks[upper].as_f64()) else {
        return Ok(null_value(params));
    };
    let t = (x - lo) / (hi - lo);
    if !t.is_finite() {
        return Ok(null_value(params));
    }
    Ok(mix(&values[upper - 1], &values[upper], t).or_else(|| null_value(params)))
}

fn mix(a: &Value, b: &Value, t: f64) -> Option<Value> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(Value::Number(a + (b - a) * t)),
        (Value::String(a), Value::String(b)) => {
            let (a, b) = (parse_hex_color(a)?, parse_hex_color(b)?);
            let mut out = String::from("#");
            for (ca, cb) in a.iter().zip(b) {
                let c = f64::from(*ca) + (f64::from(cb) - f64::from(*ca)) * t;
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "the channel is a rounded blend of two u8 channels with t in [0, 1]"
                )]
                let c = c.round().clamp(0.0, 255.0) as u8;
                out.push_str(&alloc::format!("{c:02x}"));
            }
            Some(Value::String(out))
        }
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Classifies an effect by its confidence interval: `+` when `beta - 1.96 * se > 0`, `-` when
/// `beta + 1.96 * se < 0`. Without a standard error the sign of `beta` decides.
fn effect_direction(params: &Params, input: &ScaleInput<'_>, _: usize) -> ScaleResult {
    let (Some(beta_field), Some(stderr_field)) =
        (params.str("beta_field"), params.str("stderr_beta_field"))
    else {
        let parameter = if params.str("beta_field").is_none() {
            "beta_field"
        } else {
            "stderr_beta_field"
        };
        return Err(ConfigError::MissingParameter {
            function: "effect_direction",
            parameter,
        }
        .into());
    };
    let ScaleInput::Record(view) = input else {
        return Ok(None);
    };
    let plus = params.value("+").cloned();
    let minus = params.value("-").cloned();
    let Some(beta) = view.get(beta_field).and_then(Value::as_f64) else {
        return Ok(None);
    };
    Ok(match view.get(stderr_field).and_then(Value::as_f64) {
        Some(se) if beta - 1.96 * se > 0.0 => plus,
        Some(se) if beta + 1.96 * se < 0.0 => minus,
        Some(_) => None,
        None if beta > 0.0 => plus,
        None if beta < 0.0 => minus,
        None => None,
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;

    use regionplot_core::{Record, RecordView};

    use super::*;

    fn values(xs: &[f64]) -> Vec<Value> {
        xs.iter().copied().map(Value::from).collect()
    }

    fn call(name: &str, params: &Params, input: Option<Value>, index: usize) -> ScaleResult {
        ScaleRegistry::with_builtins().call(name, params, &ScaleInput::Value(input), index)
    }

    #[test]
    fn if_picks_branch() {
        let params = Params::new()
            .with("field_value", 1.0)
            .with("then", "yes")
            .with("else", "no");
        assert_eq!(call("if", &params, Some(Value::from(1)), 0), Ok(Some(Value::from("yes"))));
        assert_eq!(call("if", &params, Some(Value::from(2)), 0), Ok(Some(Value::from("no"))));
        assert_eq!(call("if", &params, None, 0), Ok(Some(Value::from("no"))));
    }

    #[test]
    fn numerical_bin_thresholds() {
        let params = Params::new()
            .with("breaks", values(&[0.0, 0.2, 0.4, 0.6, 0.8]))
            .with(
                "values",
                vec![
                    Value::from("a"),
                    Value::from("b"),
                    Value::from("c"),
                    Value::from("d"),
                    Value::from("e"),
                ],
            )
            .with("null_value", "grey");
        let bin = |x: Option<Value>| call("numerical_bin", &params, x, 0).unwrap();
        assert_eq!(bin(Some(Value::from(-1))), Some(Value::from("a")));
        assert_eq!(bin(Some(Value::from(0.2))), Some(Value::from("b")));
        assert_eq!(bin(Some(Value::from(0.55))), Some(Value::from("c")));
        assert_eq!(bin(Some(Value::from(1))), Some(Value::from("e")));
        assert_eq!(bin(None), Some(Value::from("grey")));
        assert_eq!(bin(Some(Value::from("n/a"))), Some(Value::from("grey")));
    }

    #[test]
    fn categorical_bin_and_null_value() {
        let params = Params::new()
            .with("categories", vec![Value::from("+"), Value::from("-")])
            .with("values", vec![Value::from("up"), Value::from("down")]);
        assert_eq!(
            call("categorical_bin", &params, Some(Value::from("-")), 0),
            Ok(Some(Value::from("down")))
        );
        assert_eq!(call("categorical_bin", &params, Some(Value::from("?")), 0), Ok(None));
    }

    #[test]
    fn ordinal_cycle_uses_index() {
        let params = Params::new().with("values", values(&[1.0, 2.0, 3.0]));
        assert_eq!(call("ordinal_cycle", &params, None, 4), Ok(Some(Value::from(2))));
        assert_eq!(call("ordinal_cycle", &Params::new(), None, 4), Ok(None));
    }

    #[test]
    fn stable_choice_is_order_independent() {
        let params = Params::new().with("values", values(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        let a = call("stable_choice", &params, Some(Value::from("APOE")), 0).unwrap();
        let b = call("stable_choice", &params, Some(Value::from("APOE")), 99).unwrap();
        assert_eq!(a, b);
        assert!(a.is_some());
        // "ab" hashes to 97 * 31 + 98 = 3105, and 3105 % 5 == 0.
        assert_eq!(
            call("stable_choice", &params, Some(Value::from("ab")), 0),
            Ok(Some(Value::from(1)))
        );
    }

    #[test]
    fn interpolate_numbers_and_colors() {
        let params = Params::new()
            .with("breaks", values(&[0.0, 10.0]))
            .with("values", values(&[100.0, 200.0]));
        assert_eq!(call("interpolate", &params, Some(Value::from(2.5)), 0), Ok(Some(Value::from(125))));
        assert_eq!(call("interpolate", &params, Some(Value::from(-3)), 0), Ok(Some(Value::from(100))));
        assert_eq!(call("interpolate", &params, Some(Value::from(30)), 0), Ok(Some(Value::from(200))));

        let colors = Params::new()
            .with("breaks", values(&[0.0, 1.0]))
            .with("values", vec![Value::from("#000000"), Value::from("#ff8000")]);
        assert_eq!(
            call("interpolate", &colors, Some(Value::from(0.5)), 0),
            Ok(Some(Value::from("#804000")))
        );

        let mismatched = Params::new()
            .with("breaks", values(&[0.0, 1.0]))
            .with("values", values(&[1.0]))
            .with("null_value", 0.0);
        assert_eq!(call("interpolate", &mismatched, Some(Value::from(0.5)), 0), Ok(Some(Value::from(0))));
    }

    #[test]
    fn effect_direction_reads_whole_record() {
        let params = Params::new()
            .with("beta_field", "assoc:beta")
            .with("stderr_beta_field", "assoc:se")
            .with("+", "up")
            .with("-", "down");
        let registry = ScaleRegistry::with_builtins();
        let run = |record: &Record| {
            let view = RecordView::bare(record);
            registry.call("effect_direction", &params, &ScaleInput::Record(view), 0)
        };
        let up = Record::new().with("assoc:beta", 0.5).with("assoc:se", 0.1);
        let down = Record::new().with("assoc:beta", -0.5).with("assoc:se", 0.1);
        let unsure = Record::new().with("assoc:beta", 0.1).with("assoc:se", 0.1);
        let no_se = Record::new().with("assoc:beta", -0.1);
        assert_eq!(run(&up), Ok(Some(Value::from("up"))));
        assert_eq!(run(&down), Ok(Some(Value::from("down"))));
        assert_eq!(run(&unsure), Ok(None));
        assert_eq!(run(&no_se), Ok(Some(Value::from("down"))));
    }

    #[test]
    fn effect_direction_requires_field_names() {
        let params = Params::new().with("beta_field", "assoc:beta");
        assert_eq!(
            call("effect_direction", &params, None, 0),
            Err(Error::Config(ConfigError::MissingParameter {
                function: "effect_direction",
                parameter: "stderr_beta_field",
            }))
        );
    }
}
