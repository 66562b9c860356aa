use mindgraft_core::{
    EdgeKind, FixedClock, Graph, GraphBuilder, GraphEdge, Relationship, RelationshipType, Topic,
};
use mindgraft_render::flowchart::{FlowchartEdge, FlowchartNode, escape_edge_label, sanitize_id};
use mindgraft_render::{EmitError, FlowchartSource, to_flowchart_syntax, try_to_flowchart_syntax};
use std::sync::Arc;

fn build(topics: &[Topic]) -> Graph {
    GraphBuilder::default()
        .with_clock(Arc::new(FixedClock(1)))
        .build(topics)
        .expect("graph builds")
}

#[test]
fn flowchart_lists_classes_nodes_and_edges() {
    let graph = build(&[Topic::new("Root").with_subtopics([
        Topic::new("Alpha"),
        Topic::new("Beta").with_relationship(Relationship::new("Alpha", RelationshipType::Related)),
    ])]);

    let expected = "\
graph TD
  %% Node styles
  classDef root fill:#FEF3C7,stroke:#D97706,stroke-width:3px,color:#92400E,font-weight:bold
  classDef level1 fill:#E0F2FE,stroke:#0EA5E9,stroke-width:2px,color:#0C4A6E
  classDef level2 fill:#FCE7F3,stroke:#EC4899,stroke-width:2px,color:#831843
  classDef level3 fill:#F3E8FF,stroke:#A855F7,stroke-width:2px,color:#6B21A8
  node_0_1[\"Root\"]
  class node_0_1 root
  node_1_1[\"Alpha\"]
  class node_1_1 level1
  node_2_1[\"Beta\"]
  class node_2_1 level1
  node_0_1 -->|contains| node_1_1
  node_0_1 -->|contains| node_2_1
  node_2_1 -.->|Related| node_1_1
";
    assert_eq!(to_flowchart_syntax(&graph), expected);
}

#[test]
fn deep_nodes_share_the_last_class() {
    let graph = build(&[Topic::new("a").with_subtopics([Topic::new("b").with_subtopics([
        Topic::new("c").with_subtopics([Topic::new("d").with_subtopics([Topic::new("e")])]),
    ])])]);
    let text = to_flowchart_syntax(&graph);
    assert!(text.contains("  class node_3_1 level3\n"));
    assert!(text.contains("  class node_4_1 level3\n"));
}

#[test]
fn labels_are_escaped() {
    let graph = build(&[Topic::new("Say \"hi\"\nplease").with_subtopics([Topic::new("a|b")])]);
    let text = to_flowchart_syntax(&graph);
    assert!(text.contains("node_0_1[\"Say #quot;hi#quot;<br/>please\"]"));
    assert!(text.contains("node_1_1[\"a|b\"]"));

    assert_eq!(escape_edge_label("x|y\r\nz\u{7}"), "x#124;y<br/>z");
    assert_eq!(sanitize_id("a-b c"), "a_b_c");
    assert_eq!(sanitize_id(""), "_");
}

#[test]
fn icons_are_drawn_once() {
    let graph = build(&[
        Topic {
            icon: Some("⭐".to_string()),
            ..Topic::new("Star")
        },
        Topic {
            icon: Some("⭐".to_string()),
            ..Topic::new("⭐ Already")
        },
    ]);
    let text = to_flowchart_syntax(&graph);
    assert!(text.contains("node_0_1[\"⭐ Star\"]"));
    assert!(text.contains("node_1_1[\"⭐ Already\"]"));
}

#[test]
fn empty_graph_still_emits_a_header() {
    let text = try_to_flowchart_syntax(&Graph::default()).expect("empty graph emits");
    assert!(text.starts_with("graph TD\n  %% Node styles\n"));
    assert_eq!(text.lines().count(), 6);
}

#[test]
fn dangling_edges_produce_the_error_diagram() {
    let mut graph = build(&[Topic::new("Root")]);
    graph.edges.push(GraphEdge {
        source: "node_0_1".to_string(),
        target: "ghost".to_string(),
        kind: EdgeKind::Related,
        label: None,
    });
    assert!(matches!(
        try_to_flowchart_syntax(&graph),
        Err(EmitError::DanglingEdge { .. })
    ));
    let text = to_flowchart_syntax(&graph);
    assert!(text.starts_with("graph TD\n  error[\"Error Generating Mind Map\"]\n"));
    assert!(text.contains("node_0_1 -> ghost references an undeclared node"));
    assert!(text.contains("  error --> details\n"));
}

struct UnreadableLabels;

impl FlowchartSource for UnreadableLabels {
    fn flowchart_nodes(&self) -> Result<Vec<FlowchartNode>, EmitError> {
        Err(EmitError::Source {
            message: "label \"x\" unavailable".to_string(),
        })
    }

    fn flowchart_edges(&self) -> Result<Vec<FlowchartEdge>, EmitError> {
        Ok(Vec::new())
    }
}

#[test]
fn failing_source_yields_the_fallback() {
    let text = to_flowchart_syntax(&UnreadableLabels);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "graph TD",
            "  error[\"Error Generating Mind Map\"]",
            "  details[\"flowchart source failed: label #quot;x#quot; unavailable\"]",
            "  error --> details",
            "  style error fill:#FEE2E2,stroke:#EF4444,stroke-width:2px",
            "  style details fill:#FEF3C7,stroke:#D97706,stroke-width:2px",
        ]
    );
}
