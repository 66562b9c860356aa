//! Topic forest → node/edge graph.
//!
//! The builder walks the forest depth-first (pre-order). Every accepted topic becomes one node
//! with a generated id, a display label and depth-based colors; every parent/child pair becomes
//! a hierarchy edge. Relationships are resolved by exact title against the nodes built so far,
//! so a reference to a topic that is visited later is dropped.

use crate::config::MindgraftConfig;
use crate::topic::{RelationshipType, Topic};
use crate::validate::{prune_forest, topic_is_acceptable};
use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelColors {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

/// Style tier of a node; depths beyond 3 share the last tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelTier {
    Root,
    Level1,
    Level2,
    Level3,
}

impl LevelTier {
    pub const ALL: [Self; 4] = [Self::Root, Self::Level1, Self::Level2, Self::Level3];

    pub fn for_level(level: usize) -> Self {
        match level {
            0 => Self::Root,
            1 => Self::Level1,
            2 => Self::Level2,
            _ => Self::Level3,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Level1 => "level1",
            Self::Level2 => "level2",
            Self::Level3 => "level3",
        }
    }

    pub fn colors(self) -> LevelColors {
        match self {
            Self::Root => LevelColors {
                background: "#FEF3C7",
                border: "#D97706",
                text: "#92400E",
            },
            Self::Level1 => LevelColors {
                background: "#E0F2FE",
                border: "#0EA5E9",
                text: "#0C4A6E",
            },
            Self::Level2 => LevelColors {
                background: "#FCE7F3",
                border: "#EC4899",
                text: "#831843",
            },
            Self::Level3 => LevelColors {
                background: "#F3E8FF",
                border: "#A855F7",
                text: "#6B21A8",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub level: usize,
    pub data: Topic,
    pub colors: LevelColors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl GraphNode {
    pub fn tier(&self) -> LevelTier {
        LevelTier::for_level(self.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Hierarchy,
    Related,
    Depends,
    Influences,
    PartOf,
}

impl EdgeKind {
    pub fn is_hierarchy(self) -> bool {
        matches!(self, Self::Hierarchy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hierarchy => "hierarchy",
            Self::Related => "related",
            Self::Depends => "depends",
            Self::Influences => "influences",
            Self::PartOf => "part-of",
        }
    }
}

impl From<RelationshipType> for EdgeKind {
    fn from(kind: RelationshipType) -> Self {
        match kind {
            RelationshipType::Related => Self::Related,
            RelationshipType::Depends => Self::Depends,
            RelationshipType::Influences => Self::Influences,
            RelationshipType::PartOf => Self::PartOf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn hierarchy_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| e.kind.is_hierarchy())
    }

    pub fn cross_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| !e.kind.is_hierarchy())
    }
}

/// Source of the millisecond timestamp embedded in node ids.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Node id allocation. Ids must be non-empty and use only `[A-Za-z0-9_]`, so they survive
/// emission to diagram syntax unchanged.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

pub(crate) fn is_valid_node_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// `{namespace}_{counter}_{millis}` ids; the counter is local to one generator.
#[derive(Debug)]
pub struct IdGenerator<'a> {
    namespace: String,
    next: u64,
    clock: &'a dyn Clock,
}

impl<'a> IdGenerator<'a> {
    pub fn new(namespace: &str, start: u64, clock: &'a dyn Clock) -> Self {
        Self {
            namespace: sanitize_namespace(namespace),
            next: start,
            clock,
        }
    }
}

impl IdSource for IdGenerator<'_> {
    fn next_id(&mut self) -> String {
        let id = format!("{}_{}_{}", self.namespace, self.next, self.clock.now_millis());
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Keeps `[A-Za-z0-9_]`, replacing anything else with `_`; empty input becomes `node`.
pub fn sanitize_namespace(raw: &str) -> String {
    let out: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() { "node".to_string() } else { out }
}

/// Titles longer than `max_chars` keep `max_chars - 3` characters followed by `...`.
pub fn truncate_label(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut out: String = title.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Label of the hierarchy edge that leads into a node at `level`.
pub fn hierarchy_label(topic: &Topic, level: usize) -> String {
    match level {
        0 | 1 => "contains".to_string(),
        2 => "includes".to_string(),
        _ => topic
            .relationships
            .first()
            .map(|r| r.kind.capitalized().to_string())
            .unwrap_or_else(|| "relates to".to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub namespace: String,
    pub counter_start: u64,
    pub max_label_chars: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            namespace: "node".to_string(),
            counter_start: 0,
            max_label_chars: 50,
        }
    }
}

impl BuildOptions {
    pub fn from_config(config: &MindgraftConfig) -> Self {
        let defaults = Self::default();
        Self {
            namespace: config
                .get_str("graph.namespace")
                .map(str::to_string)
                .unwrap_or(defaults.namespace),
            counter_start: defaults.counter_start,
            max_label_chars: config
                .get_u64("graph.maxLabelChars")
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| *v >= 4)
                .unwrap_or(defaults.max_label_chars),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphBuilder {
    options: BuildOptions,
    clock: Arc<dyn Clock>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}

impl GraphBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, topics: &[Topic]) -> Result<Graph> {
        let mut ids = IdGenerator::new(
            &self.options.namespace,
            self.options.counter_start,
            self.clock.as_ref(),
        );
        self.build_with(topics, &mut ids)
    }

    /// Like [`build`](Self::build) with a caller-provided id source.
    pub fn build_with(&self, topics: &[Topic], ids: &mut dyn IdSource) -> Result<Graph> {
        if topics.is_empty() {
            return Err(Error::EmptyForest);
        }
        let mut state = BuildState {
            options: &self.options,
            ids,
            used: FxHashSet::default(),
            graph: Graph::default(),
        };
        for topic in topics {
            state.visit(topic, None, 0)?;
        }
        tracing::debug!(
            nodes = state.graph.nodes.len(),
            edges = state.graph.edges.len(),
            "built topic graph"
        );
        Ok(state.graph)
    }

    /// Builds from untrusted JSON: the value must be a non-empty array; invalid subtrees are
    /// pruned first.
    pub fn build_value(&self, value: &Value) -> Result<Graph> {
        let topics = prune_forest(value)?;
        if value.as_array().is_some_and(Vec::is_empty) {
            return Err(Error::EmptyForest);
        }
        if topics.is_empty() {
            tracing::warn!("every top-level topic was invalid; graph is empty");
            return Ok(Graph::default());
        }
        self.build(&topics)
    }
}

struct BuildState<'a> {
    options: &'a BuildOptions,
    ids: &'a mut dyn IdSource,
    used: FxHashSet<String>,
    graph: Graph,
}

impl BuildState<'_> {
    fn visit(&mut self, topic: &Topic, parent: Option<&str>, level: usize) -> Result<()> {
        if !topic_is_acceptable(topic) {
            tracing::warn!(title = %topic.title, level, "skipping invalid topic subtree");
            return Ok(());
        }

        let id = self.ids.next_id();
        if !is_valid_node_id(&id) {
            return Err(Error::InvalidNodeId { id });
        }
        if !self.used.insert(id.clone()) {
            return Err(Error::DuplicateNodeId { id });
        }

        self.graph.nodes.push(GraphNode {
            id: id.clone(),
            label: truncate_label(&topic.title, self.options.max_label_chars),
            level,
            data: topic.clone(),
            colors: LevelTier::for_level(level).colors(),
            position: None,
        });

        if let Some(parent) = parent {
            self.graph.edges.push(GraphEdge {
                source: parent.to_string(),
                target: id.clone(),
                kind: EdgeKind::Hierarchy,
                label: Some(hierarchy_label(topic, level)),
            });
        }

        for sub in &topic.subtopics {
            self.visit(sub, Some(&id), level + 1)?;
        }

        for rel in &topic.relationships {
            let target = self
                .graph
                .nodes
                .iter()
                .find(|n| n.data.title == rel.to)
                .map(|n| n.id.clone());
            let Some(target) = target else {
                tracing::debug!(from = %topic.title, to = %rel.to, "unresolved cross-reference dropped");
                continue;
            };
            self.graph.edges.push(GraphEdge {
                source: id.clone(),
                target,
                kind: rel.kind.into(),
                label: Some(
                    rel.description
                        .clone()
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| rel.kind.capitalized().to_string()),
                ),
            });
        }
        Ok(())
    }
}
