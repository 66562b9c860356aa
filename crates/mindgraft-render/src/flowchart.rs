//! Mermaid-style flowchart text for a topic graph.
//!
//! Emission is split into a fallible core ([`try_to_flowchart_syntax`]) and an infallible
//! wrapper ([`to_flowchart_syntax`]) that turns any failure into a small error diagram, so
//! callers always have something to hand to the renderer.

use mindgraft_core::{Graph, GraphNode, LevelTier};
use rustc_hash::FxHashSet;
use std::fmt::Write as _;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("edge {from} -> {to} references an undeclared node")]
    DanglingEdge { from: String, to: String },
    #[error("flowchart source failed: {message}")]
    Source { message: String },
    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowchartNode {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub tier: LevelTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowchartEdge {
    pub from: String,
    pub to: String,
    pub hierarchy: bool,
    pub label: Option<String>,
}

/// Anything that can be drawn as a flowchart.
pub trait FlowchartSource {
    fn flowchart_nodes(&self) -> Result<Vec<FlowchartNode>, EmitError>;
    fn flowchart_edges(&self) -> Result<Vec<FlowchartEdge>, EmitError>;
}

impl FlowchartSource for Graph {
    fn flowchart_nodes(&self) -> Result<Vec<FlowchartNode>, EmitError> {
        Ok(self
            .nodes
            .iter()
            .map(|node| FlowchartNode {
                id: node.id.clone(),
                label: node.label.clone(),
                icon: node_icon(node).map(str::to_string),
                tier: node.tier(),
            })
            .collect())
    }

    fn flowchart_edges(&self) -> Result<Vec<FlowchartEdge>, EmitError> {
        Ok(self
            .edges
            .iter()
            .map(|edge| FlowchartEdge {
                from: edge.source.clone(),
                to: edge.target.clone(),
                hierarchy: edge.kind.is_hierarchy(),
                label: edge.label.clone(),
            })
            .collect())
    }
}

/// The icon to draw in front of a node label, unless the label already starts with it.
pub fn node_icon(node: &GraphNode) -> Option<&str> {
    node.data
        .icon
        .as_deref()
        .filter(|icon| !icon.is_empty() && !node.label.starts_with(icon))
}

/// Label as displayed: `"{icon} {label}"` or just the label.
pub fn node_display_label(node: &GraphNode) -> String {
    match node_icon(node) {
        Some(icon) => format!("{icon} {}", node.label),
        None => node.label.clone(),
    }
}

/// Keeps `[A-Za-z0-9_]`, replacing everything else with `_`.
pub fn sanitize_id(id: &str) -> String {
    let out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() { "_".to_string() } else { out }
}

/// Escapes text for a quoted node label.
pub fn escape_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("#quot;"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => out.push_str("<br/>"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Like [`escape_label`], also escaping the `|` delimiter of edge labels.
pub fn escape_edge_label(text: &str) -> String {
    escape_label(text).replace('|', "#124;")
}

pub fn try_to_flowchart_syntax(source: &(impl FlowchartSource + ?Sized)) -> Result<String, EmitError> {
    let nodes = source.flowchart_nodes()?;
    let edges = source.flowchart_edges()?;

    let mut out = String::from("graph TD\n");
    out.push_str("  %% Node styles\n");
    for tier in LevelTier::ALL {
        let colors = tier.colors();
        let emphasis = if tier == LevelTier::Root {
            "stroke-width:3px"
        } else {
            "stroke-width:2px"
        };
        write!(
            out,
            "  classDef {} fill:{},stroke:{},{},color:{}",
            tier.class_name(),
            colors.background,
            colors.border,
            emphasis,
            colors.text
        )?;
        if tier == LevelTier::Root {
            out.push_str(",font-weight:bold");
        }
        out.push('\n');
    }

    let mut declared: FxHashSet<&str> = FxHashSet::default();
    for node in &nodes {
        declared.insert(node.id.as_str());
        let id = sanitize_id(&node.id);
        let label = escape_label(&node.label);
        match node.icon.as_deref().filter(|i| !i.is_empty()) {
            Some(icon) => writeln!(out, "  {id}[\"{} {label}\"]", escape_label(icon))?,
            None => writeln!(out, "  {id}[\"{label}\"]")?,
        }
        writeln!(out, "  class {id} {}", node.tier.class_name())?;
    }

    for edge in &edges {
        if !declared.contains(edge.from.as_str()) || !declared.contains(edge.to.as_str()) {
            return Err(EmitError::DanglingEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
            });
        }
        let arrow = if edge.hierarchy { "-->" } else { "-.->" };
        let label = edge
            .label
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| format!("|{}|", escape_edge_label(l)))
            .unwrap_or_default();
        writeln!(
            out,
            "  {} {arrow}{label} {}",
            sanitize_id(&edge.from),
            sanitize_id(&edge.to)
        )?;
    }

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "emitted flowchart");
    Ok(out)
}

/// Never fails: emission errors become [`fallback_diagram`].
pub fn to_flowchart_syntax(source: &(impl FlowchartSource + ?Sized)) -> String {
    match try_to_flowchart_syntax(source) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "flowchart emission failed; using error diagram");
            fallback_diagram(&err.to_string())
        }
    }
}

pub fn fallback_diagram(message: &str) -> String {
    format!(
        "graph TD\n  error[\"Error Generating Mind Map\"]\n  details[\"{}\"]\n  error --> details\n  style error fill:#FEE2E2,stroke:#EF4444,stroke-width:2px\n  style details fill:#FEF3C7,stroke:#D97706,stroke-width:2px\n",
        escape_label(message)
    )
}
