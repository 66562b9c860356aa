#![forbid(unsafe_code)]

//! `mindgraft` turns unstructured text into mind-map diagrams.
//!
//! Text is structured into a topic forest, either by an external service
//! ([`structure::TopicStructurer`], retried with backoff) or by local heuristics, then built
//! into a graph, optionally laid out, and emitted as flowchart text, a JSON tree and a radial
//! mind map. See [`pipeline::Pipeline`].

pub use mindgraft_core::*;

pub mod pipeline;
pub mod structure;

pub use pipeline::{OutputFormat, Pipeline, ProcessOptions, ProcessOutput, process_content};
pub use structure::{
    RetryPolicy, Sleeper, StructureError, Structured, ThreadSleeper, TopicSource,
    TopicStructurer, structure_with_fallback,
};

pub mod render {
    pub use mindgraft_render::flowchart::{fallback_diagram, sanitize_id};
    pub use mindgraft_render::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
    pub use mindgraft_render::{
        FlowchartSource, JsonTree, JsonTreeNode, LayoutOptions, RadialMindMapData,
        RadialMindMapNode, enhance_json_tree, enhance_topic_icons, layout_graph,
        to_flowchart_syntax, to_json_string, to_json_tree, to_mind_map_tree, validate_json_tree,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] mindgraft_core::Error),
    #[error(transparent)]
    Render(#[from] mindgraft_render::Error),
}
