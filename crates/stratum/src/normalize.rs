//! Split edges that span more than one rank into chains of zero-width dummy nodes.
//!
//! After `run` every edge joins rank `r` to rank `r + 1`, which is what ordering and
//! positioning expect.

use crate::graph::{EdgeEntry, Graph};
use crate::{EdgeLabel, NodeLabel};

const DUMMY_PREFIX: &str = "\u{0}_d";

fn add_dummy_node(g: &mut Graph, rank: i32, next_id: &mut usize) -> usize {
    loop {
        let id = format!("{DUMMY_PREFIX}{next_id}");
        *next_id += 1;
        if g.has_node(&id) {
            continue;
        }
        return g.set_node(
            id,
            NodeLabel {
                rank: Some(rank),
                dummy: true,
                ..Default::default()
            },
        );
    }
}

/// Returns the number of dummy nodes inserted.
pub fn run(g: &mut Graph) -> usize {
    let original: Vec<EdgeEntry> = g.edges().to_vec();
    let mut edges = Vec::with_capacity(original.len());
    let mut next_id = 0usize;
    let mut inserted = 0usize;

    for e in original {
        let v_rank = g.node_by_ix(e.v).rank.unwrap_or(0);
        let w_rank = g.node_by_ix(e.w).rank.unwrap_or(0);
        if e.is_self_loop() || w_rank <= v_rank + 1 {
            edges.push(e);
            continue;
        }

        let mut prev = e.v;
        for rank in (v_rank + 1)..w_rank {
            let dummy = add_dummy_node(g, rank, &mut next_id);
            inserted += 1;
            edges.push(EdgeEntry {
                v: prev,
                w: dummy,
                label: chain_label(&e.label),
            });
            prev = dummy;
        }
        edges.push(EdgeEntry {
            v: prev,
            w: e.w,
            label: chain_label(&e.label),
        });
    }

    g.replace_edges(edges);
    inserted
}

fn chain_label(original: &EdgeLabel) -> EdgeLabel {
    EdgeLabel {
        minlen: 1,
        weight: original.weight,
        reversed: original.reversed,
    }
}
