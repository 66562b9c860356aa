//! Coordinate assignment in the top-to-bottom frame.
//!
//! `y` stacks ranks using the tallest node of each rank plus `ranksep`. `x` starts from a
//! packed layout and is refined by alternating passes that pull each node towards the
//! weighted mean of its neighbors, then project the layer back onto its separation
//! constraints with weighted isotonic regression (pool-adjacent-violators).

use crate::graph::Graph;
use crate::order::{Adjacency, layers_by_order};

/// Weight given to nodes with no neighbors in the fixed layer, so they follow their row.
const FREE_NODE_WEIGHT: f64 = 0.25;

pub fn position(g: &mut Graph) {
    let layers = layers_by_order(g);
    assign_y(g, &layers);
    assign_x(g, &layers);
}

fn assign_y(g: &mut Graph, layers: &[Vec<usize>]) {
    let ranksep = g.graph().ranksep;
    let mut top = 0.0;
    for layer in layers {
        let height = layer
            .iter()
            .map(|&v| g.node_by_ix(v).height)
            .fold(0.0, f64::max);
        for &v in layer {
            g.node_by_ix_mut(v).y = Some(top + height / 2.0);
        }
        top += height + ranksep;
    }
}

/// Minimum center-to-center distance between two neighbors in a layer.
fn gap(g: &Graph, left: usize, right: usize) -> f64 {
    let label = g.graph();
    let half_sep = |v: usize| {
        let n = g.node_by_ix(v);
        if n.dummy {
            label.edgesep / 2.0
        } else {
            label.nodesep / 2.0
        }
    };
    g.node_by_ix(left).width / 2.0 + half_sep(left) + half_sep(right) + g.node_by_ix(right).width / 2.0
}

fn assign_x(g: &mut Graph, layers: &[Vec<usize>]) {
    let n = g.node_count();
    let adjacency = Adjacency::of(g);

    // Cumulative minimum offsets per layer; x[i] - offset[i] must be non-decreasing.
    let offsets: Vec<Vec<f64>> = layers
        .iter()
        .map(|layer| {
            let mut acc = 0.0;
            let mut out = Vec::with_capacity(layer.len());
            for (i, &v) in layer.iter().enumerate() {
                if i > 0 {
                    acc += gap(g, layer[i - 1], v);
                }
                out.push(acc);
            }
            out
        })
        .collect();

    let mut x = vec![0.0f64; n];
    for (layer, offs) in layers.iter().zip(&offsets) {
        let center = offs.last().copied().unwrap_or(0.0) / 2.0;
        for (&v, &off) in layer.iter().zip(offs) {
            x[v] = off - center;
        }
    }

    let passes = g.graph().position_passes;
    for pass in 0..passes {
        let (order, neighbors): (Vec<usize>, _) = if pass % 2 == 0 {
            ((1..layers.len()).collect(), &adjacency.preds)
        } else {
            ((0..layers.len().saturating_sub(1)).rev().collect(), &adjacency.succs)
        };
        for r in order {
            let layer = &layers[r];
            let mut targets = Vec::with_capacity(layer.len());
            let mut weights = Vec::with_capacity(layer.len());
            for (&v, &off) in layer.iter().zip(&offsets[r]) {
                let (sum, weight) = neighbors[v]
                    .iter()
                    .fold((0.0, 0.0), |(sum, weight), &(u, w)| (sum + w * x[u], weight + w));
                let desired = if weight > 0.0 { sum / weight } else { x[v] };
                targets.push(desired - off);
                weights.push(if weight > 0.0 { weight } else { FREE_NODE_WEIGHT });
            }
            let fitted = isotonic(&targets, &weights);
            for ((&v, &off), z) in layer.iter().zip(&offsets[r]).zip(fitted) {
                x[v] = z + off;
            }
        }
    }

    for (v, value) in x.into_iter().enumerate() {
        g.node_by_ix_mut(v).x = Some(value);
    }
}

/// Weighted least-squares fit of a non-decreasing sequence (pool-adjacent-violators).
pub(crate) fn isotonic(values: &[f64], weights: &[f64]) -> Vec<f64> {
    // (weighted sum, total weight, element count)
    let mut blocks: Vec<(f64, f64, usize)> = Vec::with_capacity(values.len());
    for (&v, &w) in values.iter().zip(weights) {
        blocks.push((v * w, w, 1));
        while blocks.len() >= 2 {
            let last = blocks[blocks.len() - 1];
            let prev = blocks[blocks.len() - 2];
            if prev.0 / prev.1 <= last.0 / last.1 {
                break;
            }
            blocks.pop();
            if let Some(merged) = blocks.last_mut() {
                merged.0 += last.0;
                merged.1 += last.1;
                merged.2 += last.2;
            }
        }
    }

    let mut out = Vec::with_capacity(values.len());
    for (sum, weight, count) in blocks {
        out.extend(std::iter::repeat_n(sum / weight, count));
    }
    out
}
