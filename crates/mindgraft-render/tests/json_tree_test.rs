use mindgraft_core::Topic;
use mindgraft_render::{
    JsonTree, JsonTreeNode, enhance_json_tree, json_tree_to_mind_map, to_json_tree,
    validate_json_tree,
};
use serde_json::json;

fn planning() -> Vec<Topic> {
    vec![Topic::new("Planning").with_subtopics([Topic::new("Budget"), Topic::new("Schedule")])]
}

#[test]
fn planning_round_trip() {
    let tree = to_json_tree(&planning(), "en");
    assert_eq!(tree.title, "Planning");
    assert_eq!(tree.language, "en");
    let labels: Vec<&str> = tree.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["💼 Budget", "📝 Schedule"]);
    assert!(tree.nodes.iter().all(|n| n.details.is_none()));
    assert!(validate_json_tree(&tree));

    let enhanced = enhance_json_tree(&tree);
    assert_eq!(
        enhanced.nodes[0].details.as_deref(),
        Some("Additional information about 💼 Budget")
    );
    assert_eq!(
        enhanced.nodes[1].details.as_deref(),
        Some("Additional information about 📝 Schedule")
    );
    assert_eq!(enhance_json_tree(&enhanced), enhanced);
}

#[test]
fn enhancement_leaves_the_input_alone() {
    let tree = JsonTree {
        title: "T".to_string(),
        language: "en".to_string(),
        nodes: vec![JsonTreeNode {
            label: "Risk review".to_string(),
            details: Some(String::new()),
            children: vec![JsonTreeNode {
                label: "📎 Clip".to_string(),
                details: Some("kept".to_string()),
                children: Vec::new(),
            }],
        }],
    };
    let before = tree.clone();
    let enhanced = enhance_json_tree(&tree);
    assert_eq!(tree, before);
    assert_eq!(enhanced.nodes[0].label, "👁️ Risk review");
    assert_eq!(enhanced.nodes[0].children[0].label, "📎 Clip");
    assert_eq!(enhanced.nodes[0].children[0].details.as_deref(), Some("kept"));
}

#[test]
fn descriptions_become_details_and_children_nest() {
    let topics = vec![Topic::new("Root").with_subtopics([Topic::new("📚 Reading")
        .with_description("Books")
        .with_subtopics([Topic::new("Novels").with_description("")])])];
    let tree = to_json_tree(&topics, "de");
    let reading = &tree.nodes[0];
    assert_eq!(reading.label, "📚 Reading");
    assert_eq!(reading.details.as_deref(), Some("Books"));
    assert_eq!(reading.children[0].details, None);

    let value = serde_json::to_value(&tree).unwrap();
    assert_eq!(
        value,
        json!({
            "title": "Root",
            "language": "de",
            "nodes": [{
                "label": "📚 Reading",
                "details": "Books",
                "children": [{ "label": "📝 Novels" }]
            }]
        })
    );
}

#[test]
fn only_the_first_topic_is_used() {
    let topics = vec![
        Topic::new("First").with_subtopics([Topic::new("a")]),
        Topic::new("Second").with_subtopics([Topic::new("b")]),
    ];
    let tree = to_json_tree(&topics, "en");
    assert_eq!(tree.title, "First");
    assert_eq!(tree.nodes.len(), 1);
}

#[test]
fn empty_and_incomplete_trees_do_not_validate() {
    let empty = to_json_tree(&[], "en");
    assert_eq!(empty.title, "Empty Mind Map");
    assert!(empty.nodes.is_empty());
    assert!(!validate_json_tree(&empty));

    let leaf_only = to_json_tree(&[Topic::new("Lonely")], "en");
    assert!(!validate_json_tree(&leaf_only));

    let mut unlabeled = to_json_tree(&planning(), "en");
    unlabeled.nodes[1].label = " ".to_string();
    assert!(!validate_json_tree(&unlabeled));

    let mut no_language = to_json_tree(&planning(), "");
    assert!(!validate_json_tree(&no_language));
    no_language.language = "en".to_string();
    assert!(validate_json_tree(&no_language));
}

#[test]
fn json_tree_feeds_the_mind_map() {
    let tree = enhance_json_tree(&to_json_tree(&planning(), "en"));
    let map = json_tree_to_mind_map(&tree);
    let root = &map.node_data;
    assert_eq!(root.topic, "Planning");
    assert_eq!(root.notes, "Language: en");
    assert_eq!(root.children[0].topic, "Budget");
    assert_eq!(root.children[0].icons, vec!["💼"]);
    assert_eq!(
        root.children[0].notes,
        "Additional information about 💼 Budget"
    );
}
