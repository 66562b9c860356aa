//! Rank helpers shared by the rankers: per-component edge lists, longest-path, slack.

use crate::graph::Graph;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RankEdge {
    pub(crate) v: usize,
    pub(crate) w: usize,
    pub(crate) minlen: i32,
    pub(crate) weight: f64,
}

/// One weakly connected component, re-indexed locally.
#[derive(Debug, Clone, Default)]
pub(crate) struct RankGraph {
    /// Global node indices, position = local index.
    pub(crate) nodes: Vec<usize>,
    pub(crate) edges: Vec<RankEdge>,
}

impl RankGraph {
    pub(crate) fn components(g: &Graph) -> Vec<RankGraph> {
        let components = g.components();
        let mut local = vec![0usize; g.node_count()];
        let mut owner = vec![0usize; g.node_count()];
        for (c, nodes) in components.iter().enumerate() {
            for (i, &v) in nodes.iter().enumerate() {
                local[v] = i;
                owner[v] = c;
            }
        }

        let mut out: Vec<RankGraph> = components
            .into_iter()
            .map(|nodes| RankGraph {
                nodes,
                edges: Vec::new(),
            })
            .collect();

        for e in g.edges().iter().filter(|e| !e.is_self_loop()) {
            // Ranks only make sense with a positive minimum length.
            let minlen = i32::try_from(e.label.minlen.max(1)).unwrap_or(i32::MAX);
            out[owner[e.v]].edges.push(RankEdge {
                v: local[e.v],
                w: local[e.w],
                minlen,
                weight: e.label.effective_weight(),
            });
        }
        out
    }

    pub(crate) fn out_edges(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.nodes.len()];
        for (ix, e) in self.edges.iter().enumerate() {
            out[e.v].push(ix);
        }
        out
    }

    pub(crate) fn incident_edges(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.nodes.len()];
        for (ix, e) in self.edges.iter().enumerate() {
            out[e.v].push(ix);
            out[e.w].push(ix);
        }
        out
    }

    /// Sum of `weight * length` over all edges; the quantity network simplex minimizes.
    #[cfg(test)]
    pub(crate) fn weighted_length(&self, ranks: &[i32]) -> f64 {
        self.edges
            .iter()
            .map(|e| e.weight * f64::from(ranks[e.w] - ranks[e.v]))
            .sum()
    }
}

pub(crate) fn slack(e: &RankEdge, ranks: &[i32]) -> i32 {
    ranks[e.w] - ranks[e.v] - e.minlen
}

/// Pulls every node as close to its successors as `minlen` allows; sinks get rank 0.
///
/// Expects an acyclic component. Nodes left over by a cycle keep the ranks of whatever
/// successors were already placed.
pub(crate) fn longest_path(rg: &RankGraph) -> Vec<i32> {
    let n = rg.nodes.len();
    let out_edges = rg.out_edges();

    let mut indegree = vec![0usize; n];
    for e in &rg.edges {
        indegree[e.w] += 1;
    }
    let mut queue: std::collections::VecDeque<usize> =
        (0..n).filter(|&v| indegree[v] == 0).collect();
    let mut topo = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    while let Some(v) = queue.pop_front() {
        topo.push(v);
        placed[v] = true;
        for &ix in &out_edges[v] {
            let w = rg.edges[ix].w;
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    if topo.len() < n {
        tracing::debug!(
            missing = n - topo.len(),
            "longest-path ranking saw a cycle; ranking leftovers in index order"
        );
        topo.extend((0..n).filter(|&v| !placed[v]));
    }

    let mut ranks = vec![0i32; n];
    for &v in topo.iter().rev() {
        let best = out_edges[v]
            .iter()
            .map(|&ix| {
                let e = &rg.edges[ix];
                ranks[e.w] - e.minlen
            })
            .min();
        ranks[v] = best.unwrap_or(0);
    }
    ranks
}
