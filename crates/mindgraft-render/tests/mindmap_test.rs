use mindgraft_core::Topic;
use mindgraft_render::mindmap::{BACKGROUND_RAMP, Direction};
use mindgraft_render::to_mind_map_tree;
use serde_json::json;

fn forest() -> Vec<Topic> {
    vec![Topic::new("🧠 Mind").with_subtopics([
        Topic::new("Right one").with_description("first"),
        Topic::new("Left one").with_subtopics([Topic::new("Child")
            .with_subtopics([Topic::new("Grandchild").with_subtopics([Topic::new("Deep")])])]),
        Topic::new("📚 Right two"),
    ])]
}

#[test]
fn root_carries_language_and_bold_style() {
    let map = to_mind_map_tree(&forest(), "es");
    let root = &map.node_data;
    assert_eq!(root.id, "root");
    assert!(root.root);
    assert!(root.expanded);
    assert_eq!(root.topic, "Mind");
    assert_eq!(root.icons, vec!["🧠"]);
    assert_eq!(root.notes, "Language: es");
    assert_eq!(root.style.font_size, 20);
    assert_eq!(root.style.font_weight.as_deref(), Some("bold"));
    assert_eq!(root.background, BACKGROUND_RAMP[0]);
    assert_eq!(root.direction, None);
    assert_eq!(map.node_count(), 7);
}

#[test]
fn first_ring_alternates_and_descendants_inherit() {
    let map = to_mind_map_tree(&forest(), "en");
    let ring = &map.node_data.children;
    let directions: Vec<Option<Direction>> = ring.iter().map(|n| n.direction).collect();
    assert_eq!(
        directions,
        vec![
            Some(Direction::Right),
            Some(Direction::Left),
            Some(Direction::Right)
        ]
    );

    let child = &ring[1].children[0];
    assert_eq!(child.id, "root-1-0");
    assert_eq!(child.direction, Some(Direction::Left));
    assert_eq!(child.children[0].children[0].id, "root-1-0-0-0");
    assert_eq!(child.children[0].children[0].direction, Some(Direction::Left));
}

#[test]
fn depth_drives_style_background_and_expansion() {
    let map = to_mind_map_tree(&forest(), "en");
    let first = &map.node_data.children[1];
    let child = &first.children[0];
    let grandchild = &child.children[0];
    let deep = &grandchild.children[0];

    let sizes: Vec<u32> = [first, child, grandchild, deep]
        .iter()
        .map(|n| n.style.font_size)
        .collect();
    assert_eq!(sizes, vec![17, 16, 15, 14]);
    assert_eq!(first.background, BACKGROUND_RAMP[1]);
    assert_eq!(deep.background, BACKGROUND_RAMP[4]);
    assert!(first.expanded && child.expanded);
    assert!(!grandchild.expanded && !deep.expanded);
    assert!(first.style.font_weight.is_none());
}

#[test]
fn icons_and_notes_are_extracted() {
    let map = to_mind_map_tree(&forest(), "en");
    let ring = &map.node_data.children;
    assert_eq!(ring[0].notes, "first");
    assert!(ring[0].icons.is_empty());
    assert_eq!(ring[1].notes, "");
    assert_eq!(ring[2].topic, "Right two");
    assert_eq!(ring[2].icons, vec!["📚"]);

    let with_field = vec![Topic::new("Root").with_subtopics([Topic {
        icon: Some("🎯".to_string()),
        ..Topic::new("Goal")
    }])];
    let map = to_mind_map_tree(&with_field, "en");
    assert_eq!(map.node_data.children[0].topic, "Goal");
    assert_eq!(map.node_data.children[0].icons, vec!["🎯"]);
}

#[test]
fn empty_forest_gives_a_placeholder_root() {
    let map = to_mind_map_tree(&[], "fr");
    assert_eq!(map.node_data.topic, "Empty Mind Map");
    assert_eq!(map.node_data.notes, "Language: fr");
    assert!(map.node_data.children.is_empty());
}

#[test]
fn serializes_in_widget_shape() {
    let topics = vec![Topic::new("Root").with_subtopics([Topic::new("Leaf")])];
    let value = serde_json::to_value(to_mind_map_tree(&topics, "en")).unwrap();
    assert_eq!(
        value,
        json!({
            "nodeData": {
                "id": "root",
                "topic": "Root",
                "root": true,
                "style": { "fontSize": 20, "fontWeight": "bold" },
                "notes": "Language: en",
                "background": "#f9f9f9",
                "expanded": true,
                "children": [{
                    "id": "root-0",
                    "topic": "Leaf",
                    "direction": "right",
                    "style": { "fontSize": 17 },
                    "notes": "",
                    "background": "#e3f2fd",
                    "expanded": true
                }]
            }
        })
    );
}
