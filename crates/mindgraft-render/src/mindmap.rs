//! Radial mind-map node tree (`nodeData` root with left/right branches).

use crate::icons::split_leading_icon;
use crate::json_tree::{EMPTY_TITLE, JsonTree, JsonTreeNode};
use mindgraft_core::Topic;
use serde::{Deserialize, Serialize};

/// Background by depth; deeper nodes reuse the last entry.
pub const BACKGROUND_RAMP: [&str; 7] = [
    "#f9f9f9", "#e3f2fd", "#bbdefb", "#90caf9", "#64b5f6", "#42a5f5", "#2196f3",
];

const ROOT_FONT_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Self::Right } else { Self::Left }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub font_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadialMindMapNode {
    pub id: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub style: NodeStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<String>,
    pub notes: String,
    pub background: String,
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RadialMindMapNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadialMindMapData {
    #[serde(rename = "nodeData")]
    pub node_data: RadialMindMapNode,
}

impl RadialMindMapData {
    pub fn node_count(&self) -> usize {
        fn count(node: &RadialMindMapNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.node_data)
    }
}

trait Branch: Sized {
    fn label(&self) -> &str;
    fn icon(&self) -> Option<&str>;
    fn notes(&self) -> &str;
    fn branches(&self) -> &[Self];
}

impl Branch for Topic {
    fn label(&self) -> &str {
        &self.title
    }

    fn icon(&self) -> Option<&str> {
        self.icon.as_deref().filter(|i| !i.is_empty())
    }

    fn notes(&self) -> &str {
        self.details().unwrap_or("")
    }

    fn branches(&self) -> &[Self] {
        &self.subtopics
    }
}

impl Branch for JsonTreeNode {
    fn label(&self) -> &str {
        &self.label
    }

    fn icon(&self) -> Option<&str> {
        None
    }

    fn notes(&self) -> &str {
        self.details.as_deref().unwrap_or("")
    }

    fn branches(&self) -> &[Self] {
        &self.children
    }
}

/// Leading icon moved into `icons`; a label that is only an icon is kept as is.
fn split_label(label: &str, fallback_icon: Option<&str>) -> (String, Vec<String>) {
    match split_leading_icon(label) {
        (Some(icon), rest) if !rest.trim().is_empty() => {
            (rest.trim_end().to_string(), vec![icon.to_string()])
        }
        _ => (
            label.to_string(),
            fallback_icon.map(str::to_string).into_iter().collect(),
        ),
    }
}

fn root_node(title: &str, icon: Option<&str>, language: &str) -> RadialMindMapNode {
    let (topic, icons) = split_label(title, icon);
    RadialMindMapNode {
        id: "root".to_string(),
        topic,
        root: true,
        direction: None,
        style: NodeStyle {
            font_size: ROOT_FONT_SIZE,
            font_weight: Some("bold".to_string()),
        },
        icons,
        notes: format!("Language: {language}"),
        background: BACKGROUND_RAMP[0].to_string(),
        expanded: true,
        children: Vec::new(),
    }
}

fn branch_node<B: Branch>(
    source: &B,
    id: String,
    direction: Direction,
    depth: usize,
) -> RadialMindMapNode {
    let (topic, icons) = split_label(source.label(), source.icon());
    let children = source
        .branches()
        .iter()
        .enumerate()
        .map(|(i, child)| branch_node(child, format!("{id}-{i}"), direction, depth + 1))
        .collect();
    RadialMindMapNode {
        topic,
        root: false,
        direction: Some(direction),
        style: NodeStyle {
            font_size: 18u32.saturating_sub(depth as u32).max(14),
            font_weight: None,
        },
        icons,
        notes: source.notes().to_string(),
        background: BACKGROUND_RAMP[depth.min(BACKGROUND_RAMP.len() - 1)].to_string(),
        expanded: depth < 3,
        children,
        id,
    }
}

fn first_ring<B: Branch>(branches: &[B]) -> Vec<RadialMindMapNode> {
    branches
        .iter()
        .enumerate()
        .map(|(i, b)| branch_node(b, format!("root-{i}"), Direction::for_index(i), 1))
        .collect()
}

/// Mind map of the first topic. First-ring branches alternate right/left; deeper branches
/// follow their parent.
pub fn to_mind_map_tree(topics: &[Topic], language: &str) -> RadialMindMapData {
    let Some(main) = topics.first() else {
        return RadialMindMapData {
            node_data: root_node(EMPTY_TITLE, None, language),
        };
    };
    let mut root = root_node(&main.title, Branch::icon(main), language);
    root.children = first_ring(&main.subtopics);
    RadialMindMapData { node_data: root }
}

/// Same layout rules, starting from an already emitted JSON tree.
pub fn json_tree_to_mind_map(tree: &JsonTree) -> RadialMindMapData {
    let mut root = root_node(&tree.title, None, &tree.language);
    root.children = first_ring(&tree.nodes);
    RadialMindMapData { node_data: root }
}
