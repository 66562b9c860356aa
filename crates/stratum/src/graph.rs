//! Directed multigraph container used by the layout stages.
//!
//! Nodes are keyed by string id but stored densely; algorithms work on node indices. Edges are
//! kept in insertion order, which makes every stage deterministic.

use crate::{EdgeLabel, GraphLabel, NodeLabel};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone)]
pub struct NodeEntry {
    pub id: String,
    pub label: NodeLabel,
}

#[derive(Debug, Clone)]
pub struct EdgeEntry {
    pub v: usize,
    pub w: usize,
    pub label: EdgeLabel,
}

impl EdgeEntry {
    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    label: GraphLabel,
    nodes: Vec<NodeEntry>,
    node_index: HashMap<String, usize>,
    edges: Vec<EdgeEntry>,
}

impl Graph {
    pub fn new(label: GraphLabel) -> Self {
        Self {
            label,
            ..Default::default()
        }
    }

    pub fn graph(&self) -> &GraphLabel {
        &self.label
    }

    pub fn graph_mut(&mut self) -> &mut GraphLabel {
        &mut self.label
    }

    /// Inserts a node, or replaces the label of an existing one. Returns the node index.
    pub fn set_node(&mut self, id: impl Into<String>, label: NodeLabel) -> usize {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            self.nodes[ix].label = label;
            return ix;
        }
        let ix = self.nodes.len();
        self.node_index.insert(id.clone(), ix);
        self.nodes.push(NodeEntry { id, label });
        ix
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node_id(&self, ix: usize) -> Option<&str> {
        self.nodes.get(ix).map(|n| n.id.as_str())
    }

    pub fn node(&self, id: &str) -> Option<&NodeLabel> {
        self.node_ix(id).map(|ix| &self.nodes[ix].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeLabel> {
        let ix = self.node_ix(id)?;
        Some(&mut self.nodes[ix].label)
    }

    pub fn node_by_ix(&self, ix: usize) -> &NodeLabel {
        &self.nodes[ix].label
    }

    pub fn node_by_ix_mut(&mut self, ix: usize) -> &mut NodeLabel {
        &mut self.nodes[ix].label
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_entries(&self) -> &[NodeEntry] {
        &self.nodes
    }

    pub fn node_entries_mut(&mut self) -> &mut [NodeEntry] {
        &mut self.nodes
    }

    /// Adds an edge between two existing nodes. Returns `false` (and adds nothing) when either
    /// endpoint is unknown.
    pub fn set_edge(&mut self, v: &str, w: &str, label: EdgeLabel) -> bool {
        let (Some(v), Some(w)) = (self.node_ix(v), self.node_ix(w)) else {
            return false;
        };
        self.edges.push(EdgeEntry { v, w, label });
        true
    }

    /// Convenience for tests: chains `set_edge` over consecutive ids, creating nodes as needed.
    pub fn set_path(&mut self, ids: &[&str]) -> &mut Self {
        for id in ids {
            if !self.has_node(id) {
                self.set_node(*id, NodeLabel::default());
            }
        }
        for pair in ids.windows(2) {
            self.set_edge(pair[0], pair[1], EdgeLabel::default());
        }
        self
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[EdgeEntry] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [EdgeEntry] {
        &mut self.edges
    }

    pub(crate) fn replace_edges(&mut self, edges: Vec<EdgeEntry>) {
        self.edges = edges;
    }

    pub fn has_edge(&self, v: &str, w: &str) -> bool {
        let (Some(v), Some(w)) = (self.node_ix(v), self.node_ix(w)) else {
            return false;
        };
        self.edges.iter().any(|e| e.v == v && e.w == w)
    }

    pub fn successors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.v == v && !e.is_self_loop())
            .map(|e| e.w)
    }

    pub fn predecessors(&self, w: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.w == w && !e.is_self_loop())
            .map(|e| e.v)
    }

    /// Node indices without incoming (non self-loop) edges, in insertion order.
    pub fn sources(&self) -> Vec<usize> {
        let mut has_in = vec![false; self.nodes.len()];
        for e in self.edges.iter().filter(|e| !e.is_self_loop()) {
            has_in[e.w] = true;
        }
        (0..self.nodes.len()).filter(|&ix| !has_in[ix]).collect()
    }

    /// Weakly connected components as lists of node indices, in first-seen order.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let n = self.nodes.len();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for e in &self.edges {
            adjacency[e.v].push(e.w);
            adjacency[e.w].push(e.v);
        }

        let mut seen = vec![false; n];
        let mut out = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = vec![start];
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for &w in &adjacency[v] {
                    if !seen[w] {
                        seen[w] = true;
                        component.push(w);
                        stack.push(w);
                    }
                }
            }
            component.sort_unstable();
            out.push(component);
        }
        out
    }
}
