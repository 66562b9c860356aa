//! Layered ("Sugiyama style") layout for small directed graphs.
//!
//! The pipeline is the classic one used by dagre and Graphviz `dot`:
//!
//! 1. break cycles by reversing a DFS feedback arc set ([`acyclic`]),
//! 2. assign ranks per weakly connected component ([`rank`]),
//! 3. split long edges into dummy chains ([`normalize`]),
//! 4. order nodes inside each rank with barycenter sweeps ([`order`]),
//! 5. assign coordinates ([`position`]) and map them into the requested [`RankDir`].
//!
//! [`layout`] writes `x`/`y` (node centers), `rank` and `order` back into the caller's graph.
//! Nodes without a finite, non-negative size are left unpositioned and edges touching them
//! are ignored.

pub mod acyclic;
pub mod coordinate_system;
pub mod graph;
mod model;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;

pub use graph::Graph;
pub use model::{EdgeLabel, GraphLabel, NodeLabel, RankDir, Ranker};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn layout(g: &mut Graph) {
    let mut work = Graph::new(g.graph().clone());
    for entry in g.node_entries_mut() {
        let n = &mut entry.label;
        n.x = None;
        n.y = None;
        n.rank = None;
        n.order = None;
    }

    for entry in g.node_entries() {
        if entry.label.has_finite_size() && !entry.label.dummy {
            work.set_node(
                entry.id.clone(),
                NodeLabel::sized(entry.label.width, entry.label.height),
            );
        } else {
            tracing::debug!(node = %entry.id, "skipping node without a finite size");
        }
    }
    for e in g.edges().iter().filter(|e| !e.is_self_loop()) {
        let (Some(v), Some(w)) = (g.node_id(e.v), g.node_id(e.w)) else {
            continue;
        };
        let label = EdgeLabel {
            reversed: false,
            ..e.label.clone()
        };
        if !work.set_edge(v, w, label) {
            tracing::debug!(from = v, to = w, "skipping edge with an unplaced endpoint");
        }
    }

    coordinate_system::adjust(&mut work);
    acyclic::run(&mut work);
    rank::rank(&mut work);
    let dummies = normalize::run(&mut work);
    order::order(&mut work);
    position::position(&mut work);
    coordinate_system::undo(&mut work);
    coordinate_system::translate(&mut work);

    tracing::debug!(
        nodes = work.node_count() - dummies,
        dummies,
        edges = g.edge_count(),
        "layout finished"
    );

    for entry in work.node_entries().iter().filter(|e| !e.label.dummy) {
        if let Some(target) = g.node_mut(&entry.id) {
            target.x = entry.label.x;
            target.y = entry.label.y;
            target.rank = entry.label.rank;
            target.order = entry.label.order;
        }
    }
}

/// Bounding box `(width, height)` of the positioned nodes, including margins on both sides.
pub fn extent(g: &Graph) -> (f64, f64) {
    let (marginx, marginy) = (g.graph().marginx, g.graph().marginy);
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    for entry in g.node_entries() {
        let n = &entry.label;
        if let (Some(x), Some(y)) = (n.x, n.y) {
            max_x = max_x.max(x + n.width / 2.0);
            max_y = max_y.max(y + n.height / 2.0);
        }
    }
    (max_x + marginx, max_y + marginy)
}
