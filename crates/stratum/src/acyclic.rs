//! Break cycles by reversing a DFS feedback arc set.
//!
//! Nodes are visited in insertion order; an edge pointing back into the current DFS stack is
//! reversed in place and flagged so `undo` can restore it.

use crate::graph::Graph;

pub fn run(g: &mut Graph) {
    let fas = dfs_fas(g);
    let edges = g.edges_mut();
    for ix in fas {
        let e = &mut edges[ix];
        std::mem::swap(&mut e.v, &mut e.w);
        e.label.reversed = !e.label.reversed;
    }
}

pub fn undo(g: &mut Graph) {
    for e in g.edges_mut() {
        if e.label.reversed {
            std::mem::swap(&mut e.v, &mut e.w);
            e.label.reversed = false;
        }
    }
}

/// Returns the indices of edges that close a cycle.
fn dfs_fas(g: &Graph) -> Vec<usize> {
    let n = g.node_count();
    let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (ix, e) in g.edges().iter().enumerate() {
        if !e.is_self_loop() {
            out_edges[e.v].push(ix);
        }
    }

    let mut fas = Vec::new();
    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];

    for root in 0..n {
        if visited[root] {
            continue;
        }
        // Iterative DFS: (node, next out-edge cursor).
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        visited[root] = true;
        on_stack[root] = true;

        while let Some(top) = stack.last_mut() {
            let v = top.0;
            if let Some(&edge_ix) = out_edges[v].get(top.1) {
                top.1 += 1;
                let w = g.edges()[edge_ix].w;
                if on_stack[w] {
                    fas.push(edge_ix);
                } else if !visited[w] {
                    visited[w] = true;
                    on_stack[w] = true;
                    stack.push((w, 0));
                }
            } else {
                on_stack[v] = false;
                stack.pop();
            }
        }
    }

    fas
}
