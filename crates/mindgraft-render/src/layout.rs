//! Positions for a topic graph, computed with the layered engine in `stratum`.

use crate::flowchart::node_display_label;
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
use mindgraft_core::{Graph, MindgraftConfig, Position};
use stratum::{EdgeLabel, GraphLabel, NodeLabel, RankDir, Ranker};
use std::sync::Arc;

#[derive(Clone)]
pub struct LayoutOptions {
    pub rank_dir: RankDir,
    pub ranker: Ranker,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub edge_sep: f64,
    /// Margin around the drawing, on every side.
    pub padding: f64,
    /// Multiplies `node_sep` and `rank_sep`.
    pub spacing_factor: f64,
    pub hierarchy_weight: f64,
    pub cross_reference_weight: f64,
    pub text_style: TextStyle,
    /// Space between the label and the node border, horizontally and vertically.
    pub label_padding: (f64, f64),
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("rank_dir", &self.rank_dir)
            .field("ranker", &self.ranker)
            .field("node_sep", &self.node_sep)
            .field("rank_sep", &self.rank_sep)
            .field("edge_sep", &self.edge_sep)
            .field("padding", &self.padding)
            .field("spacing_factor", &self.spacing_factor)
            .field("hierarchy_weight", &self.hierarchy_weight)
            .field("cross_reference_weight", &self.cross_reference_weight)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            rank_dir: RankDir::TB,
            ranker: Ranker::NetworkSimplex,
            node_sep: 80.0,
            rank_sep: 120.0,
            edge_sep: 50.0,
            padding: 50.0,
            spacing_factor: 1.2,
            hierarchy_weight: 2.0,
            cross_reference_weight: 1.0,
            text_style: TextStyle::default(),
            label_padding: (20.0, 10.0),
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

fn non_negative(config: &MindgraftConfig, key: &str, default: f64) -> f64 {
    match config.get_f64(key) {
        Some(v) if v >= 0.0 => v,
        Some(v) => {
            tracing::warn!(key, value = v, "negative layout setting ignored");
            default
        }
        None => default,
    }
}

impl LayoutOptions {
    pub fn from_config(config: &MindgraftConfig) -> Self {
        let d = Self::default();
        let spacing_factor = non_negative(config, "layout.spacingFactor", d.spacing_factor);
        Self {
            rank_dir: config
                .get_str("layout.rankDir")
                .and_then(RankDir::parse)
                .unwrap_or(d.rank_dir),
            ranker: config
                .get_str("layout.ranker")
                .map(Ranker::parse)
                .unwrap_or(d.ranker),
            node_sep: non_negative(config, "layout.nodeSep", d.node_sep),
            rank_sep: non_negative(config, "layout.rankSep", d.rank_sep),
            edge_sep: non_negative(config, "layout.edgeSep", d.edge_sep),
            padding: non_negative(config, "layout.padding", d.padding),
            spacing_factor: if spacing_factor > 0.0 {
                spacing_factor
            } else {
                d.spacing_factor
            },
            hierarchy_weight: non_negative(config, "layout.hierarchyWeight", d.hierarchy_weight),
            cross_reference_weight: non_negative(
                config,
                "layout.crossReferenceWeight",
                d.cross_reference_weight,
            ),
            ..d
        }
    }

    fn graph_label(&self) -> GraphLabel {
        GraphLabel {
            rankdir: self.rank_dir,
            ranker: self.ranker,
            nodesep: self.node_sep * self.spacing_factor,
            ranksep: self.rank_sep * self.spacing_factor,
            edgesep: self.edge_sep,
            marginx: self.padding,
            marginy: self.padding,
            ..Default::default()
        }
    }

    /// Box size for a label: measured text plus `label_padding` on both sides.
    pub fn node_size(&self, label: &str) -> (f64, f64) {
        let metrics = self.text_measurer.measure(label, &self.text_style);
        let (px, py) = self.label_padding;
        (metrics.width + 2.0 * px, metrics.height + 2.0 * py)
    }
}

/// Copy of `graph` with `position` (node centers) filled in.
///
/// Edges with an unknown endpoint do not take part; nodes whose size cannot be measured keep
/// `position: None`.
pub fn layout_graph(graph: &Graph, options: &LayoutOptions) -> Graph {
    let _span = tracing::debug_span!("layout", nodes = graph.nodes.len()).entered();

    let mut g = stratum::Graph::new(options.graph_label());
    for node in &graph.nodes {
        let (width, height) = options.node_size(&node_display_label(node));
        g.set_node(node.id.clone(), NodeLabel::sized(width, height));
    }
    for edge in &graph.edges {
        let weight = if edge.kind.is_hierarchy() {
            options.hierarchy_weight
        } else {
            options.cross_reference_weight
        };
        if !g.set_edge(&edge.source, &edge.target, EdgeLabel::weighted(weight)) {
            tracing::debug!(
                from = %edge.source,
                to = %edge.target,
                "ignoring edge with a missing endpoint"
            );
        }
    }

    stratum::layout(&mut g);
    let (width, height) = stratum::extent(&g);
    tracing::debug!(width, height, "layout extent");

    let mut out = graph.clone();
    for node in &mut out.nodes {
        node.position = g.node(&node.id).and_then(|n| {
            Some(Position {
                x: n.x?,
                y: n.y?,
            })
        });
    }
    out
}
