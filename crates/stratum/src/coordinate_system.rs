//! Rank direction support.
//!
//! Every stage works top-to-bottom. Horizontal layouts swap node sizes up front and swap the
//! resulting coordinates back at the end.

use crate::RankDir;
use crate::graph::Graph;

pub fn adjust(g: &mut Graph) {
    if matches!(g.graph().rankdir, RankDir::LR | RankDir::RL) {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut Graph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        for entry in g.node_entries_mut() {
            entry.label.y = entry.label.y.map(|y| -y);
        }
    }
    if matches!(rankdir, RankDir::LR | RankDir::RL) {
        for entry in g.node_entries_mut() {
            let n = &mut entry.label;
            (n.x, n.y) = (n.y, n.x);
        }
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut Graph) {
    for entry in g.node_entries_mut() {
        let n = &mut entry.label;
        (n.width, n.height) = (n.height, n.width);
    }
}

/// Shifts every positioned node so the top-left corner of the real nodes sits at the margins.
pub fn translate(g: &mut Graph) {
    let (marginx, marginy) = (g.graph().marginx, g.graph().marginy);
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for entry in g.node_entries().iter().filter(|e| !e.label.dummy) {
        let n = &entry.label;
        if let (Some(x), Some(y)) = (n.x, n.y) {
            min_x = min_x.min(x - n.width / 2.0);
            min_y = min_y.min(y - n.height / 2.0);
        }
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }

    let dx = marginx - min_x;
    let dy = marginy - min_y;
    for entry in g.node_entries_mut() {
        let n = &mut entry.label;
        n.x = n.x.map(|x| x + dx);
        n.y = n.y.map(|y| y + dy);
    }
}
