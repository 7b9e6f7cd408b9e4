// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text templates for tooltip content.
//!
//! Syntax:
//! - `{{field}}` inserts a field (any [`FieldRef`], transforms included); missing values
//!   render as nothing.
//! - `{{#if field}} ... {{#else}} ... {{/if}}` renders one branch depending on whether the
//!   field resolves to a truthy value. Blocks nest.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use regionplot_core::{ConfigError, RecordView, UsageError};

use crate::FieldRef;

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Text(String),
    Field(FieldRef),
    If {
        condition: FieldRef,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// A parsed text template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
}

struct Block {
    condition: Option<FieldRef>,
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

impl Block {
    fn nodes(&mut self) -> &mut Vec<Node> {
        self.otherwise.as_mut().unwrap_or(&mut self.then)
    }
}

fn invalid(reason: &'static str) -> ConfigError {
    ConfigError::InvalidTemplate { reason }
}

impl Template {
    /// Parses a template.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let mut stack = alloc::vec![Block {
            condition: None,
            then: Vec::new(),
            otherwise: None,
        }];
        let mut rest = source;
        while let Some(open) = rest.find("{{") {
            let top = stack.last_mut().ok_or(invalid("unbalanced blocks"))?;
            if open > 0 {
                top.nodes().push(Node::Text(rest[..open].into()));
            }
            let after = &rest[open + 2..];
            let close = after.find("}}").ok_or(invalid("unterminated tag"))?;
            let tag = after[..close].trim();
            rest = &after[close + 2..];

            if let Some(field) = tag.strip_prefix("#if ") {
                stack.push(Block {
                    condition: Some(FieldRef::parse(field.trim())?),
                    then: Vec::new(),
                    otherwise: None,
                });
            } else if tag == "#else" {
                if top.condition.is_none() || top.otherwise.is_some() {
                    return Err(invalid("`{{#else}}` outside of an `{{#if}}` block"));
                }
                top.otherwise = Some(Vec::new());
            } else if tag == "/if" {
                let block = stack.pop().ok_or(invalid("unbalanced blocks"))?;
                let condition = block
                    .condition
                    .ok_or(invalid("`{{/if}}` without a matching `{{#if}}`"))?;
                let parent = stack.last_mut().ok_or(invalid("unbalanced blocks"))?;
                parent.nodes().push(Node::If {
                    condition,
                    then: block.then,
                    otherwise: block.otherwise.unwrap_or_default(),
                });
            } else if tag.is_empty() || tag.starts_with('#') || tag.starts_with('/') {
                return Err(invalid("unknown block tag"));
            } else {
                top.nodes().push(Node::Field(FieldRef::parse(tag)?));
            }
        }
        if stack.len() != 1 {
            return Err(invalid("unclosed `{{#if}}` block"));
        }
        let mut root = stack.pop().ok_or(invalid("unbalanced blocks"))?;
        if !rest.is_empty() {
            root.then.push(Node::Text(rest.into()));
        }
        Ok(Self {
            source: source.into(),
            nodes: root.then,
        })
    }

    /// The template source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders the template against one record.
    pub fn render(&self, view: &RecordView<'_>) -> Result<String, UsageError> {
        let mut out = String::new();
        render_nodes(&self.nodes, view, &mut out)?;
        Ok(out)
    }
}

fn render_nodes(nodes: &[Node], view: &RecordView<'_>, out: &mut String) -> Result<(), UsageError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field(field) => {
                if let Some(value) = field.resolve(view)? {
                    let _ = write!(out, "{value}");
                }
            }
            Node::If {
                condition,
                then,
                otherwise,
            } => {
                let truthy = condition.resolve(view)?.is_some_and(|v| v.is_truthy());
                render_nodes(if truthy { then } else { otherwise }, view, out)?;
            }
        }
    }
    Ok(())
}

impl TryFrom<String> for Template {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Template {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
