// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for field references, filters and templates.

use regionplot_core::{Annotations, Record, RecordView, Value};
use regionplot_transforms::{FieldRef, Filter, FilterOp, Template};

fn assoc(variant: &str, log_pvalue: f64) -> Record {
    Record::new()
        .with("assoc:variant", variant)
        .with("assoc:log_pvalue", log_pvalue)
}

#[test]
fn filters_select_significant_variants() {
    let records = [assoc("a", 2.0), assoc("b", 9.5), assoc("c", 7.3)];
    let significant = Filter::new(
        FieldRef::parse("assoc:log_pvalue").unwrap(),
        FilterOp::Ge,
        Value::from(7.3),
    );
    let hits: Vec<_> = records
        .iter()
        .filter(|r| significant.matches(&RecordView::bare(r)).unwrap())
        .filter_map(|r| r.get("assoc:variant").and_then(Value::as_str))
        .collect();
    assert_eq!(hits, ["b", "c"]);
}

#[test]
fn all_filters_must_match() {
    let record = assoc("rs1", 8.0).with("assoc:chrom", "19");
    let filters = [
        Filter::new(FieldRef::parse("assoc:chrom").unwrap(), FilterOp::Eq, Value::from("19")),
        Filter::new(
            FieldRef::parse("assoc:log_pvalue").unwrap(),
            FilterOp::Gt,
            Value::from(10),
        ),
    ];
    let view = RecordView::bare(&record);
    assert_eq!(Filter::all_match(&filters, &view), Ok(false));
    assert_eq!(Filter::all_match(&filters[..1], &view), Ok(true));
    assert_eq!(Filter::all_match(&[], &view), Ok(true));
}

#[test]
fn templates_and_filters_share_annotation_fallback() {
    let record = assoc("rs7412", 12.0);
    let mut notes = Annotations::new();
    notes.insert("assoc:note".into(), Value::from("replicated"));
    let view = RecordView::new(&record, Some(&notes));

    let template =
        Template::parse("{{assoc:variant}}{{#if assoc:note}} ({{assoc:note|htmlescape}}){{/if}}")
            .unwrap();
    assert_eq!(template.render(&view).unwrap(), "rs7412 (replicated)");

    let noted = Filter::new(
        FieldRef::parse("assoc:note").unwrap(),
        FilterOp::Match,
        Value::from("repl"),
    );
    assert_eq!(noted.matches(&view), Ok(true));
    assert_eq!(noted.matches(&RecordView::bare(&record)), Ok(false));
}

#[test]
fn transform_errors_surface_from_templates() {
    let template = Template::parse("{{gene|neglog10}}").unwrap();
    let record = Record::new().with("gene", "APOE");
    assert!(template.render(&RecordView::bare(&record)).is_err());
}

#[cfg(feature = "serde")]
#[test]
fn filters_load_from_layout_json() {
    let filters: Vec<Filter> = serde_json::from_str(
        r#"[
            {"field": "assoc:log_pvalue", "operator": ">", "value": 7.3},
            {"field": "assoc:gene", "operator": "in", "value": ["APOE", "APOC1"]}
        ]"#,
    )
    .unwrap();
    assert_eq!(filters[0].op, FilterOp::Gt);
    assert_eq!(filters[1].op, FilterOp::In);

    let record = Record::new()
        .with("assoc:log_pvalue", 9.0)
        .with("assoc:gene", "APOE");
    assert_eq!(
        Filter::all_match(&filters, &RecordView::bare(&record)),
        Ok(true)
    );

    let bad = serde_json::from_str::<Filter>(r#"{"field": "x", "operator": "~", "value": 1}"#);
    assert!(bad.is_err());
}
