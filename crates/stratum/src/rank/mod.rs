//! Rank assignment.
//!
//! Each weakly connected component is ranked on its own and normalized so its smallest rank
//! is 0. Disconnected topic trees therefore all start at the top layer.

mod network_simplex;
mod util;

use crate::graph::Graph;
use crate::model::Ranker;
use util::RankGraph;

/// Assigns `rank` to every node of an acyclic graph.
pub fn rank(g: &mut Graph) {
    let ranker = g.graph().ranker;
    for rg in RankGraph::components(g) {
        let ranks = match ranker {
            Ranker::LongestPath => util::longest_path(&rg),
            Ranker::TightTree => {
                let mut ranks = util::longest_path(&rg);
                network_simplex::feasible_tree(&rg, &mut ranks);
                ranks
            }
            Ranker::NetworkSimplex => network_simplex::run(&rg),
        };
        let min = ranks.iter().copied().min().unwrap_or(0);
        for (local, &global) in rg.nodes.iter().enumerate() {
            g.node_by_ix_mut(global).rank = Some(ranks[local] - min);
        }
    }
}

/// Largest assigned rank, or `None` for an empty graph.
pub fn max_rank(g: &Graph) -> Option<i32> {
    g.node_entries().iter().filter_map(|n| n.label.rank).max()
}
