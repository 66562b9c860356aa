use crate::*;
use proptest::prelude::*;
use serde_json::{Value, json};

#[test]
fn validate_topic_accepts_a_nested_tree() {
    let topic = json!({
        "title": "Planning",
        "description": "How the work is organised",
        "examples": ["roadmap"],
        "relationships": [{ "to": "Budget", "type": "depends" }],
        "subtopics": [
            { "title": "Budget", "subtopics": [] },
            { "title": "Schedule", "icon": "📅" }
        ]
    });
    assert!(validate_topic(&topic));
}

#[test]
fn validate_topic_rejects_bad_titles() {
    assert!(!validate_topic(&json!({})));
    assert!(!validate_topic(&json!({ "title": "" })));
    assert!(!validate_topic(&json!({ "title": 3 })));
    assert!(!validate_topic(&json!("Planning")));
    assert!(!validate_topic(&Value::Null));
}

#[test]
fn check_topic_reports_every_violation_with_its_path() {
    let topic = json!({
        "title": "",
        "subtopics": [
            { "title": "ok" },
            { "title": 3, "icon": 5 }
        ]
    });
    let violations = check_topic(&topic).unwrap_err();
    let found: Vec<(String, ViolationKind)> = violations
        .iter()
        .map(|v| (v.path.clone(), v.kind.clone()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("$.title".to_string(), ViolationKind::EmptyTitle),
            ("$.subtopics[1].title".to_string(), ViolationKind::MissingTitle),
            (
                "$.subtopics[1].icon".to_string(),
                ViolationKind::NotAString { field: "icon" }
            ),
        ]
    );
    assert!(violations.to_string().contains("$.subtopics[1].icon"));
}

#[test]
fn check_topic_validates_relationships() {
    let topic = json!({
        "title": "A",
        "relationships": [
            { "to": "B", "type": "causes" },
            { "type": "related" },
            "B"
        ]
    });
    let kinds: Vec<ViolationKind> = check_topic(&topic)
        .unwrap_err()
        .iter()
        .map(|v| v.kind.clone())
        .collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::UnknownRelationshipType {
                found: "causes".to_string()
            },
            ViolationKind::RelationshipMissingTarget,
            ViolationKind::RelationshipNotAnObject,
        ]
    );
}

#[test]
fn check_topic_returns_the_typed_topic() {
    let topic = check_topic(&json!({
        "title": "Root",
        "examples": ["one", 2, "three"],
        "relatedTopics": [],
        "depth": 0,
        "importance": 0.5,
        "metadata": { "tags": ["x"] },
        "relationships": [{ "to": "Other", "type": "part-of", "description": "piece" }]
    }))
    .unwrap();
    assert_eq!(topic.title, "Root");
    assert_eq!(topic.examples, vec!["one", "three"]);
    assert_eq!(topic.depth, Some(0));
    assert_eq!(topic.importance, Some(0.5));
    assert_eq!(topic.metadata, Some(json!({ "tags": ["x"] })));
    assert_eq!(topic.relationships[0].kind, RelationshipType::PartOf);
    assert_eq!(topic.relationships[0].description.as_deref(), Some("piece"));
}

#[test]
fn prune_forest_drops_only_the_broken_subtrees() {
    let forest = json!([
        {
            "title": "Root",
            "subtopics": [
                { "title": "Good", "subtopics": [{ "title": "Leaf" }] },
                { "title": "" },
                { "title": "Also", "subtopics": "nope" }
            ]
        },
        { "description": "no title" },
        { "title": "Second" }
    ]);
    let topics = prune_forest(&forest).unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].title, "Root");
    assert_eq!(topics[0].subtopics.len(), 1);
    assert_eq!(topics[0].subtopics[0].title, "Good");
    assert_eq!(topics[0].subtopics[0].subtopics[0].title, "Leaf");
    assert_eq!(topics[1].title, "Second");
}

#[test]
fn prune_forest_requires_an_array() {
    let err = prune_forest(&json!({ "title": "Root" })).unwrap_err();
    assert!(matches!(err, Error::NotAnArray { found: "object" }));
}

const KEYS: [&str; 9] = [
    "title",
    "description",
    "subtopics",
    "relationships",
    "to",
    "type",
    "examples",
    "icon",
    "color",
];

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z ]{0,8}".prop_map(Value::String),
        prop::sample::select(vec!["related", "depends", "part-of", "Topic"])
            .prop_map(|s| Value::String(s.to_string())),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((prop::sample::select(KEYS.to_vec()), inner), 0..6).prop_map(
                |entries| {
                    Value::Object(
                        entries
                            .into_iter()
                            .map(|(k, v)| (k.to_string(), v))
                            .collect(),
                    )
                }
            ),
        ]
    })
}

proptest! {
    #[test]
    fn validation_is_total_and_consistent(value in arb_json()) {
        let valid = validate_topic(&value);
        prop_assert_eq!(valid, check_topic(&value).is_ok());

        let pruned = prune_forest(&Value::Array(vec![value.clone()])).unwrap();
        if valid {
            prop_assert_eq!(pruned.len(), 1);
        }
        for topic in &pruned {
            topic.walk(&mut |t, _| assert!(!t.title.is_empty()));
        }
    }
}
