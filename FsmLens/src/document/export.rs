//! JSON and plain-text renderings of a [`Document`]

use super::model::{Bounds, Document, DocumentEvent, Field, Node, Rgb};
use crate::error::Result;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentView<'a> {
    fsm_name: &'a str,
    game_object_name: &'a str,
    nodes: Vec<NodeView<'a>>,
    events: &'a [DocumentEvent],
    variables: &'a [Field],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeView<'a> {
    name: &'a str,
    is_start: bool,
    is_global: bool,
    bounds: Bounds,
    node_color: Rgb,
    transition_color: Rgb,
    transitions: Vec<TransitionView<'a>>,
    fields: &'a [Field],
}

#[derive(Serialize)]
struct TransitionView<'a> {
    event: &'a str,
    to: Option<&'a str>,
}

fn node_view<'a>(doc: &'a Document, node: &'a Node) -> NodeView<'a> {
    NodeView {
        name: &node.name,
        is_start: node.is_start,
        is_global: node.is_global,
        bounds: node.bounds,
        node_color: node.node_color,
        transition_color: node.transition_color,
        transitions: node
            .transitions
            .iter()
            .map(|t| TransitionView {
                event: &t.event,
                to: doc.target(t).map(|n| n.name.as_str()),
            })
            .collect(),
        fields: &node.fields,
    }
}

/// Pretty-printed JSON; transition targets are written as node names.
pub fn to_json(doc: &Document) -> Result<String> {
    let view = DocumentView {
        fsm_name: &doc.fsm_name,
        game_object_name: &doc.game_object_name,
        nodes: doc.nodes.iter().map(|n| node_view(doc, n)).collect(),
        events: &doc.events,
        variables: &doc.variables,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Indented outline of the whole document.
pub fn to_text(doc: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "FSM: {} ({})", doc.fsm_name, doc.game_object_name);

    for node in &doc.nodes {
        out.push('\n');
        let mut flags = Vec::new();
        if node.is_start {
            flags.push("start");
        }
        if node.is_global {
            flags.push("global");
        }
        if flags.is_empty() {
            let _ = writeln!(out, "[{}]", node.name);
        } else {
            let _ = writeln!(out, "[{}] ({})", node.name, flags.join(", "));
        }
        let _ = writeln!(out, "  bounds: {}", node.bounds);
        let _ = writeln!(out, "  colors: {} / {}", node.node_color, node.transition_color);

        for transition in &node.transitions {
            let target = doc.target(transition).map_or("<none>", |n| n.name.as_str());
            let _ = writeln!(out, "  {} -> {}", transition.event, target);
        }
        write_fields(&mut out, &node.fields, 1);
    }

    if !doc.events.is_empty() {
        out.push_str("\nEvents:\n");
        for event in &doc.events {
            let _ = write!(out, "  {}", event.name);
            match (event.is_system, event.is_global) {
                (true, true) => out.push_str(" (system, global)"),
                (true, false) => out.push_str(" (system)"),
                (false, true) => out.push_str(" (global)"),
                (false, false) => {}
            }
            out.push('\n');
        }
    }

    if !doc.variables.is_empty() {
        out.push_str("\nVariables:\n");
        write_fields(&mut out, &doc.variables, 1);
    }

    out
}

fn write_fields(out: &mut String, fields: &[Field], depth: usize) {
    for field in fields {
        match field {
            Field::Class { class, enabled } => {
                let pad = "  ".repeat(depth);
                let state = if *enabled { "" } else { " (disabled)" };
                let _ = writeln!(out, "{pad}{}{state}", class.class_name);
            }
            Field::Data {
                name,
                value,
                value_name,
                indent,
            } => {
                let pad = "  ".repeat(depth + 1 + usize::from(*indent));
                if value_name.is_empty() {
                    let _ = writeln!(out, "{pad}{name}: {value}");
                } else {
                    let _ = writeln!(out, "{pad}{name}: {value} [{value_name}]");
                }
            }
        }
    }
}
