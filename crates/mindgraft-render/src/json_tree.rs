//! Generic `label / details / children` tree, the interchange format for tree widgets.

use crate::icons::ensure_label_icon;
use mindgraft_core::Topic;
use serde::{Deserialize, Serialize};

pub const EMPTY_TITLE: &str = "Empty Mind Map";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonTreeNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonTreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonTree {
    pub title: String,
    pub language: String,
    pub nodes: Vec<JsonTreeNode>,
}

/// Converts the first topic of a forest; its subtopics become the top-level nodes.
///
/// Further top-level topics are not represented in the tree.
pub fn to_json_tree(topics: &[Topic], language: &str) -> JsonTree {
    let Some(main) = topics.first() else {
        return JsonTree {
            title: EMPTY_TITLE.to_string(),
            language: language.to_string(),
            nodes: Vec::new(),
        };
    };
    if topics.len() > 1 {
        tracing::debug!(
            dropped = topics.len() - 1,
            "json tree keeps only the first top-level topic"
        );
    }
    JsonTree {
        title: main.title.clone(),
        language: language.to_string(),
        nodes: main.subtopics.iter().map(topic_node).collect(),
    }
}

fn topic_node(topic: &Topic) -> JsonTreeNode {
    JsonTreeNode {
        label: ensure_label_icon(&topic.title),
        details: topic.details().map(str::to_string),
        children: topic.subtopics.iter().map(topic_node).collect(),
    }
}

/// Title, language and at least one node are required, and every node needs a label.
/// Missing details are only reported.
pub fn validate_json_tree(tree: &JsonTree) -> bool {
    if tree.title.trim().is_empty() || tree.language.trim().is_empty() {
        tracing::warn!("json tree is missing its title or language");
        return false;
    }
    if tree.nodes.is_empty() {
        tracing::warn!("json tree has no nodes");
        return false;
    }
    tree.nodes.iter().all(validate_node)
}

fn validate_node(node: &JsonTreeNode) -> bool {
    if node.label.trim().is_empty() {
        tracing::warn!("json tree node is missing a label");
        return false;
    }
    if node.details.as_deref().is_none_or(str::is_empty) {
        tracing::warn!(label = %node.label, "json tree node has no details");
    }
    node.children.iter().all(validate_node)
}

/// Returns an enriched copy: every label gets a leading icon and every node details.
///
/// Applying it twice gives the same tree as applying it once.
pub fn enhance_json_tree(tree: &JsonTree) -> JsonTree {
    JsonTree {
        nodes: tree.nodes.iter().map(enhance_node).collect(),
        ..tree.clone()
    }
}

fn enhance_node(node: &JsonTreeNode) -> JsonTreeNode {
    let label = ensure_label_icon(&node.label);
    let details = match node.details.as_deref() {
        Some(details) if !details.is_empty() => details.to_string(),
        _ => format!("Additional information about {label}"),
    };
    JsonTreeNode {
        label,
        details: Some(details),
        children: node.children.iter().map(enhance_node).collect(),
    }
}
