// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary: an interactive session against a two-layer region panel.

use kurbo::Point;
use regionplot_core::{Error, Record, Value};
use regionplot_layers::{
    AxisId, AxisLayout, DataLayer, LayerLayout, Panel, Params, ScalableParam, ScaleRegistry,
    ScaleRule, TooltipLayout,
};
use regionplot_transforms::{FieldRef, Filter, FilterOp, Template};

fn main() -> Result<(), Error> {
    init_logging();

    let registry = ScaleRegistry::with_builtins();
    let mut panel = Panel::with_layers("association", [recomb_layout()?, assoc_layout()?])?;
    println!("layers (bottom to top): {:?}", panel.layer_ids());

    let assoc = layer(&mut panel, "assoc")?;
    assoc.set_data(region(100_000));
    print_layer("load 100kb", assoc, &registry)?;

    assoc.select_element("1:100400_A/G");
    assoc.highlight_element("1:100200_C/T");
    assoc.set_element_annotation("1:100400_A/G", "note", "lead variant");
    // Report where a renderer would have placed each open tooltip.
    let open: Vec<_> = assoc.tooltips().map(|t| (t.id.clone(), t.index)).collect();
    for (id, index) in open {
        let x = 40.0 * f64::from(u32::try_from(index).unwrap_or(u32::MAX));
        assoc.position_tooltip(&id, Some(Point::new(x, 12.0)))?;
    }
    print_layer("select + highlight + annotate", assoc, &registry)?;

    assoc.unhighlight_element("1:100200_C/T");
    assoc.destroy_tooltip("1:100400_A/G");
    print_layer("unhighlight + close", assoc, &registry)?;

    // Pan right: the selected variant is still in view, so its state survives.
    assoc.set_data(region(100_300));
    print_layer("pan +300bp", assoc, &registry)?;

    // Pan far away: the selected variant drops out, then comes back.
    assoc.set_data(region(200_000));
    print_layer("pan to 200kb", assoc, &registry)?;
    assoc.set_data(region(100_000));
    assoc.fade_all_elements();
    assoc.unfade_element("1:100400_A/G");
    print_layer("back to 100kb, fade others", assoc, &registry)?;

    panel
        .move_layer_down("assoc")?
        .move_layer_down("assoc")?;
    println!("layers after moving assoc down: {:?}", panel.layer_ids());
    let recomb = layer(&mut panel, "recomb")?;
    recomb.set_data(recombination(100_000));
    println!(
        "recomb extent: {:?}",
        recomb.axis_extent(AxisId::Y2)?.range()
    );
    Ok(())
}

fn init_logging() {
    let level = std::env::var("REGIONPLOT_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(tracing::Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn layer<'a>(panel: &'a mut Panel, id: &str) -> Result<&'a mut DataLayer, Error> {
    panel
        .layer_mut(id)
        .ok_or_else(|| regionplot_core::ConfigError::UnknownLayer(id.into()).into())
}

fn field(source: &str) -> Result<FieldRef, Error> {
    Ok(FieldRef::parse(source)?)
}

fn assoc_layout() -> Result<LayerLayout, Error> {
    let color = ScalableParam::List(vec![
        ScaleRule::new("numerical_bin")
            .with_field(field("ld:state")?)
            .with_parameters(
                Params::new()
                    .with(
                        "breaks",
                        vec![0.0, 0.2, 0.4, 0.6, 0.8]
                            .into_iter()
                            .map(Value::from)
                            .collect::<Vec<_>>(),
                    )
                    .with(
                        "values",
                        ["#357ebd", "#46b8da", "#5cb85c", "#eea236", "#d43f3a"]
                            .into_iter()
                            .map(Value::from)
                            .collect::<Vec<_>>(),
                    ),
            )
            .into(),
        Value::from("#b8b8b8").into(),
    ]);
    Ok(LayerLayout::new("assoc")
        .with_id_field("assoc:variant")
        .with_z_index(-1)
        .with_x_axis(AxisLayout::new(field("assoc:position")?))
        .with_y_axis(
            1,
            AxisLayout::new(field("assoc:log_pvalue")?)
                .with_upper_buffer(0.1)
                .with_min_extent(0.0, 10.0)
                .with_floor(0.0),
        )
        .with_encoding("color", color)
        .with_encoding(
            "shape",
            ScaleRule::new("effect_direction").with_parameters(
                Params::new()
                    .with("beta_field", "assoc:beta")
                    .with("stderr_beta_field", "assoc:se")
                    .with("+", "triangle-up")
                    .with("-", "triangle-down"),
            ),
        )
        .with_filter(Filter::new(
            field("assoc:log_pvalue")?,
            FilterOp::Gt,
            Value::from(0.5),
        ))
        .with_tooltip(
            TooltipLayout::new().with_closable(true).with_html(Template::parse(
                "<strong>{{assoc:variant|htmlescape}}</strong> p={{assoc:log_pvalue|logtoscinotation}}\
                 {{#if note}} ({{note}}){{/if}}",
            )?),
        ))
}

fn recomb_layout() -> Result<LayerLayout, Error> {
    Ok(LayerLayout::new("recomb")
        .with_id_field("position")
        .with_x_axis(AxisLayout::new(field("position")?))
        .with_y_axis(
            2,
            AxisLayout::new(field("recomb_rate")?).with_min_extent(0.0, 100.0),
        ))
}

/// Fake association results for a 500bp window starting at `start`.
fn region(start: u32) -> Vec<Record> {
    (0..5)
        .map(|i| {
            let position = start + 100 * i;
            let allele = if i % 2 == 0 { "A/G" } else { "C/T" };
            let log_pvalue = f64::from((i * 7 + start / 1000) % 13);
            Record::new()
                .with("assoc:variant", format!("1:{position}_{allele}"))
                .with("assoc:position", position)
                .with("assoc:log_pvalue", log_pvalue)
                .with("assoc:beta", if i % 3 == 0 { -0.2 } else { 0.4 })
                .with("assoc:se", 0.05 * f64::from(i + 1))
                .with("ld:state", f64::from(i) / 4.0)
        })
        .collect()
}

fn recombination(start: u32) -> Vec<Record> {
    (0..5)
        .map(|i| {
            Record::new()
                .with("position", start + 100 * i)
                .with("recomb_rate", f64::from(i * i) * 9.5)
        })
        .collect()
}

fn print_layer(step: &str, layer: &DataLayer, registry: &ScaleRegistry) -> Result<(), Error> {
    println!("== {step}");
    let colors = layer.resolve_encoding(registry, "color")?;
    let shapes = layer.resolve_encoding(registry, "shape")?;
    let visible = layer.filtered_indices()?;
    for (index, id) in layer.element_ids().iter().enumerate() {
        let mark = if visible.contains(&index) { ' ' } else { 'x' };
        println!(
            "  {mark} {id} color={} shape={}",
            show(colors.get(index)),
            show(shapes.get(index)),
        );
    }
    println!(
        "  x={:?} y1={:?}",
        layer.axis_extent(AxisId::X)?.range(),
        layer.axis_extent(AxisId::Y1)?.range()
    );
    for status in regionplot_layers::Status::ALL {
        let set = layer.status(status);
        if !set.is_empty() {
            println!("  {status}: {:?}", set.as_slice());
        }
    }
    for tooltip in layer.tooltips() {
        println!(
            "  tooltip {} [{}] at {:?}: {}",
            tooltip.id, tooltip.index, tooltip.anchor, tooltip.content
        );
    }
    Ok(())
}

fn show(value: Option<&Option<Value>>) -> String {
    match value {
        Some(Some(value)) => value.to_string(),
        _ => "-".into(),
    }
}
