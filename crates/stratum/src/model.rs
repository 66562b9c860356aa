//! Layout label types.
//!
//! These stay small and `Clone`-friendly so tests can build graphs inline.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Some(Self::TB),
            "BT" => Some(Self::BT),
            "LR" => Some(Self::LR),
            "RL" => Some(Self::RL),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

impl Ranker {
    /// Unknown names fall back to network simplex.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "tight-tree" => Self::TightTree,
            "longest-path" => Self::LongestPath,
            _ => Self::NetworkSimplex,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub ranker: Ranker,
    pub nodesep: f64,
    pub ranksep: f64,
    pub edgesep: f64,
    pub marginx: f64,
    pub marginy: f64,
    /// Number of barycenter sweeps performed without improvement before ordering stops.
    pub order_patience: usize,
    /// Neighbor-averaging passes used when assigning cross-axis coordinates.
    pub position_passes: usize,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            ranker: Ranker::NetworkSimplex,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: 20.0,
            marginx: 0.0,
            marginy: 0.0,
            order_patience: 4,
            position_passes: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: bool,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub(crate) fn has_finite_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: usize,
    pub weight: f64,
    pub reversed: bool,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            reversed: false,
        }
    }
}

impl EdgeLabel {
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight,
            ..Default::default()
        }
    }

    pub(crate) fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }
}
