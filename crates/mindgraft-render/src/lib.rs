#![forbid(unsafe_code)]

//! Layout and output formats for mindgraft topic graphs.
//!
//! - [`layout`]: positions via the `stratum` layered engine
//! - [`flowchart`]: Mermaid-style flowchart text, with an error diagram on failure
//! - [`json_tree`]: `label / details / children` tree plus enrichment
//! - [`mindmap`]: radial mind-map node tree
//! - [`icons`]: leading-icon detection and keyword icon lookup

pub mod flowchart;
pub mod icons;
pub mod json_tree;
pub mod layout;
pub mod mindmap;
pub mod text;

pub use flowchart::{
    EmitError, FlowchartSource, fallback_diagram, to_flowchart_syntax, try_to_flowchart_syntax,
};
pub use icons::enhance_topic_icons;
pub use json_tree::{JsonTree, JsonTreeNode, enhance_json_tree, to_json_tree, validate_json_tree};
pub use layout::{LayoutOptions, layout_graph};
pub use mindmap::{RadialMindMapData, RadialMindMapNode, json_tree_to_mind_map, to_mind_map_tree};

use mindgraft_core::{Graph, GraphBuilder, Topic};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] mindgraft_core::Error),
    #[error("output JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds the graph for a forest and lays it out.
pub fn build_and_layout(
    topics: &[Topic],
    builder: &GraphBuilder,
    options: &LayoutOptions,
) -> Result<Graph> {
    let graph = builder.build(topics)?;
    Ok(layout_graph(&graph, options))
}

pub fn to_json_string(value: &impl Serialize, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
