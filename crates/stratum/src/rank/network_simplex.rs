//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! Cut values are recomputed from scratch for each pivot instead of using the low/lim
//! postorder numbering. Topic graphs are small, so the quadratic pass is cheap.

use super::util::{RankGraph, longest_path, slack};

/// Builds a tight spanning tree, shifting ranks until every node joins it.
///
/// Returns the tree as a per-edge membership flag.
pub(crate) fn feasible_tree(rg: &RankGraph, ranks: &mut [i32]) -> Vec<bool> {
    let n = rg.nodes.len();
    let mut tree_edge = vec![false; rg.edges.len()];
    if n == 0 {
        return tree_edge;
    }

    let incident = rg.incident_edges();
    let mut in_tree = vec![false; n];
    in_tree[0] = true;
    let mut size = 1usize;

    loop {
        let mut stack: Vec<usize> = (0..n).filter(|&v| in_tree[v]).collect();
        while let Some(v) = stack.pop() {
            for &ix in &incident[v] {
                let e = &rg.edges[ix];
                let u = if e.v == v { e.w } else { e.v };
                if !in_tree[u] && slack(e, ranks) == 0 {
                    in_tree[u] = true;
                    tree_edge[ix] = true;
                    size += 1;
                    stack.push(u);
                }
            }
        }
        if size >= n {
            break;
        }

        let mut best: Option<(i32, usize)> = None;
        for (ix, e) in rg.edges.iter().enumerate() {
            if in_tree[e.v] == in_tree[e.w] {
                continue;
            }
            let s = slack(e, ranks);
            if best.is_none_or(|(bs, _)| s < bs) {
                best = Some((s, ix));
            }
        }
        let Some((s, ix)) = best else {
            // Components are connected by construction; bail out rather than spin.
            break;
        };
        let delta = if in_tree[rg.edges[ix].v] { s } else { -s };
        for v in 0..n {
            if in_tree[v] {
                ranks[v] += delta;
            }
        }
    }

    tree_edge
}

pub(crate) fn run(rg: &RankGraph) -> Vec<i32> {
    let mut ranks = longest_path(rg);
    let mut tree = feasible_tree(rg, &mut ranks);
    let incident = rg.incident_edges();

    let max_pivots = rg.edges.len().saturating_mul(8).saturating_add(64);
    for _ in 0..max_pivots {
        let Some((leave, tail_side)) = leave_edge(rg, &tree, &incident) else {
            break;
        };
        let Some(enter) = enter_edge(rg, &tree, &ranks, &tail_side) else {
            break;
        };
        tree[leave] = false;
        tree[enter] = true;
        ranks = ranks_from_tree(rg, &tree, &incident, &ranks);
    }

    ranks
}

/// Nodes reachable from `edge.v` through tree edges other than `edge` itself.
fn tail_component(rg: &RankGraph, tree: &[bool], incident: &[Vec<usize>], edge: usize) -> Vec<bool> {
    let mut side = vec![false; rg.nodes.len()];
    let start = rg.edges[edge].v;
    side[start] = true;
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        for &ix in &incident[v] {
            if ix == edge || !tree[ix] {
                continue;
            }
            let e = &rg.edges[ix];
            let u = if e.v == v { e.w } else { e.v };
            if !side[u] {
                side[u] = true;
                stack.push(u);
            }
        }
    }
    side
}

/// Cut value of a tree edge: weight flowing from the tail component to the head component
/// minus weight flowing back.
fn cut_value(rg: &RankGraph, tail_side: &[bool]) -> f64 {
    let mut cut = 0.0;
    for e in &rg.edges {
        match (tail_side[e.v], tail_side[e.w]) {
            (true, false) => cut += e.weight,
            (false, true) => cut -= e.weight,
            _ => {}
        }
    }
    cut
}

fn leave_edge(
    rg: &RankGraph,
    tree: &[bool],
    incident: &[Vec<usize>],
) -> Option<(usize, Vec<bool>)> {
    (0..rg.edges.len()).filter(|&ix| tree[ix]).find_map(|ix| {
        let side = tail_component(rg, tree, incident, ix);
        (cut_value(rg, &side) < -1e-9).then_some((ix, side))
    })
}

/// Minimum-slack non-tree edge running from the head component back into the tail component.
fn enter_edge(rg: &RankGraph, tree: &[bool], ranks: &[i32], tail_side: &[bool]) -> Option<usize> {
    let mut best: Option<(i32, usize)> = None;
    for (ix, e) in rg.edges.iter().enumerate() {
        if tree[ix] || tail_side[e.v] || !tail_side[e.w] {
            continue;
        }
        let s = slack(e, ranks);
        if best.is_none_or(|(bs, _)| s < bs) {
            best = Some((s, ix));
        }
    }
    best.map(|(_, ix)| ix)
}

/// Re-derives ranks so every tree edge is tight, anchored at local node 0.
fn ranks_from_tree(
    rg: &RankGraph,
    tree: &[bool],
    incident: &[Vec<usize>],
    previous: &[i32],
) -> Vec<i32> {
    let mut ranks = previous.to_vec();
    let mut seen = vec![false; rg.nodes.len()];
    if rg.nodes.is_empty() {
        return ranks;
    }
    seen[0] = true;
    let mut stack = vec![0usize];
    while let Some(v) = stack.pop() {
        for &ix in &incident[v] {
            if !tree[ix] {
                continue;
            }
            let e = &rg.edges[ix];
            if e.v == v && !seen[e.w] {
                ranks[e.w] = ranks[v] + e.minlen;
                seen[e.w] = true;
                stack.push(e.w);
            } else if e.w == v && !seen[e.v] {
                ranks[e.v] = ranks[v] - e.minlen;
                seen[e.v] = true;
                stack.push(e.v);
            }
        }
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::util::RankEdge;

    fn edge(v: usize, w: usize) -> RankEdge {
        RankEdge {
            v,
            w,
            minlen: 1,
            weight: 1.0,
        }
    }

    // a b c d h e f g
    // 0 1 2 3 4 5 6 7
    fn gansner() -> RankGraph {
        RankGraph {
            nodes: (0..8).collect(),
            edges: vec![
                edge(0, 1),
                edge(1, 2),
                edge(2, 3),
                edge(3, 4),
                edge(0, 5),
                edge(5, 7),
                edge(7, 4),
                edge(0, 6),
                edge(6, 7),
            ],
        }
    }

    #[test]
    fn feasible_tree_spans_and_is_tight() {
        let rg = gansner();
        let mut ranks = longest_path(&rg);
        let tree = feasible_tree(&rg, &mut ranks);
        assert_eq!(tree.iter().filter(|t| **t).count(), rg.nodes.len() - 1);
        for (ix, e) in rg.edges.iter().enumerate() {
            assert!(slack(e, &ranks) >= 0);
            if tree[ix] {
                assert_eq!(slack(e, &ranks), 0);
            }
        }
    }

    #[test]
    fn network_simplex_finds_the_optimal_gansner_ranking() {
        let rg = gansner();
        let initial = longest_path(&rg);
        assert_eq!(rg.weighted_length(&initial), 11.0);

        let ranks = run(&rg);
        assert_eq!(rg.weighted_length(&ranks), 10.0);
        assert_eq!(ranks[7] - ranks[0], 2, "g should sit two ranks below a");
    }

    #[test]
    fn cut_values_are_non_negative_at_the_optimum() {
        let rg = gansner();
        let mut ranks = longest_path(&rg);
        let tree = feasible_tree(&rg, &mut ranks);
        let incident = rg.incident_edges();
        assert!(leave_edge(&rg, &tree, &incident).is_some());

        let ranks = run(&rg);
        let mut ranks_copy = ranks.clone();
        let tree = feasible_tree(&rg, &mut ranks_copy);
        assert_eq!(ranks_copy, ranks, "optimal ranking is already tight");
        assert!(leave_edge(&rg, &tree, &incident).is_none());
    }
}
