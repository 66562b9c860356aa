//! Structural validation of untrusted topic JSON.
//!
//! Rules (applied to every topic, recursively through `subtopics`):
//! 1. the topic is a JSON object,
//! 2. `title` is a non-empty string,
//! 3. `description`, `context`, `icon` and `color` are strings when present,
//! 4. `examples`, `citations` and `relatedTopics` are arrays when present,
//! 5. `relationships`, when present, is an array of objects with a non-empty string `to` and a
//!    `type` of `related`, `depends`, `influences` or `part-of`,
//! 6. `subtopics`, when present, is an array whose elements are valid topics.
//!
//! [`check_topic`] reports every violation with its location; [`prune_forest`] keeps whatever
//! is salvageable and drops only the subtrees whose own fields are broken.

use crate::error::json_type_name;
use crate::topic::{Relationship, RelationshipType, Topic};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;

const STRING_FIELDS: [&str; 4] = ["description", "context", "icon", "color"];
const ARRAY_FIELDS: [&str; 3] = ["examples", "citations", "relatedTopics"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    NotAnObject { found: &'static str },
    MissingTitle,
    EmptyTitle,
    NotAString { field: &'static str },
    NotAnArray { field: &'static str },
    RelationshipNotAnObject,
    RelationshipMissingTarget,
    UnknownRelationshipType { found: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { found } => write!(f, "topic must be an object, found {found}"),
            Self::MissingTitle => f.write_str("topic must have a title string"),
            Self::EmptyTitle => f.write_str("title must not be empty"),
            Self::NotAString { field } => write!(f, "`{field}` must be a string if present"),
            Self::NotAnArray { field } => write!(f, "`{field}` must be an array if present"),
            Self::RelationshipNotAnObject => f.write_str("relationship must be an object"),
            Self::RelationshipMissingTarget => {
                f.write_str("relationship must have a non-empty `to` string")
            }
            Self::UnknownRelationshipType { found } => {
                write!(f, "invalid relationship type: {found}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-path-like location, e.g. `$.subtopics[1].title`.
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// Boolean form of [`check_topic`]. Logs one warning per violation.
pub fn validate_topic(candidate: &Value) -> bool {
    match check_topic(candidate) {
        Ok(_) => true,
        Err(violations) => {
            for v in violations.iter() {
                tracing::warn!(path = %v.path, "invalid topic structure: {}", v.kind);
            }
            false
        }
    }
}

/// Checks a whole topic tree, returning the typed topic or every violation found.
pub fn check_topic(candidate: &Value) -> std::result::Result<Topic, Violations> {
    let mut out = Vec::new();
    collect_violations(candidate, "$", &mut out);
    if !out.is_empty() {
        return Err(Violations(out));
    }
    prune_topic(candidate, "$").ok_or_else(Violations::default)
}

fn collect_violations(value: &Value, path: &str, out: &mut Vec<Violation>) {
    out.extend(own_violations(value, path));
    if let Some(Value::Array(subtopics)) = value.get("subtopics") {
        for (i, sub) in subtopics.iter().enumerate() {
            collect_violations(sub, &format!("{path}.subtopics[{i}]"), out);
        }
    }
}

/// Violations of rules 1-5 plus the shape of `subtopics` itself, ignoring the children.
pub fn own_violations(value: &Value, path: &str) -> Vec<Violation> {
    let mut out = Vec::new();
    let Value::Object(map) = value else {
        out.push(Violation {
            path: path.to_string(),
            kind: ViolationKind::NotAnObject {
                found: json_type_name(value),
            },
        });
        return out;
    };
    let at = |field: &str| format!("{path}.{field}");

    match map.get("title") {
        Some(Value::String(title)) if title.is_empty() => out.push(Violation {
            path: at("title"),
            kind: ViolationKind::EmptyTitle,
        }),
        Some(Value::String(_)) => {}
        _ => out.push(Violation {
            path: at("title"),
            kind: ViolationKind::MissingTitle,
        }),
    }

    for field in STRING_FIELDS {
        if map.get(field).is_some_and(|v| !v.is_string()) {
            out.push(Violation {
                path: at(field),
                kind: ViolationKind::NotAString { field },
            });
        }
    }
    for field in ARRAY_FIELDS {
        if map.get(field).is_some_and(|v| !v.is_array()) {
            out.push(Violation {
                path: at(field),
                kind: ViolationKind::NotAnArray { field },
            });
        }
    }

    match map.get("relationships") {
        None => {}
        Some(Value::Array(rels)) => {
            for (i, rel) in rels.iter().enumerate() {
                let rel_path = format!("{path}.relationships[{i}]");
                let Value::Object(rel) = rel else {
                    out.push(Violation {
                        path: rel_path,
                        kind: ViolationKind::RelationshipNotAnObject,
                    });
                    continue;
                };
                if !rel
                    .get("to")
                    .and_then(Value::as_str)
                    .is_some_and(|to| !to.is_empty())
                {
                    out.push(Violation {
                        path: format!("{rel_path}.to"),
                        kind: ViolationKind::RelationshipMissingTarget,
                    });
                }
                let kind = rel.get("type");
                if kind.and_then(Value::as_str).and_then(RelationshipType::parse).is_none() {
                    out.push(Violation {
                        path: format!("{rel_path}.type"),
                        kind: ViolationKind::UnknownRelationshipType {
                            found: kind.map_or_else(|| "undefined".to_string(), describe),
                        },
                    });
                }
            }
        }
        Some(_) => out.push(Violation {
            path: at("relationships"),
            kind: ViolationKind::NotAnArray {
                field: "relationships",
            },
        }),
    }

    if map.get("subtopics").is_some_and(|v| !v.is_array()) {
        out.push(Violation {
            path: at("subtopics"),
            kind: ViolationKind::NotAnArray { field: "subtopics" },
        });
    }

    out
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Converts untrusted JSON into a typed forest, dropping only subtrees whose own fields are
/// invalid. Parents and siblings of a dropped subtree are kept.
pub fn prune_forest(value: &Value) -> Result<Vec<Topic>> {
    let Value::Array(items) = value else {
        return Err(Error::NotAnArray {
            found: json_type_name(value),
        });
    };
    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| prune_topic(item, &format!("$[{i}]")))
        .collect())
}

fn prune_topic(value: &Value, path: &str) -> Option<Topic> {
    let violations = own_violations(value, path);
    if !violations.is_empty() {
        for v in &violations {
            tracing::warn!(path = %v.path, "invalid topic structure: {}", v.kind);
        }
        tracing::warn!(path, "dropping invalid topic subtree");
        return None;
    }
    let map = value.as_object()?;

    let subtopics = match map.get("subtopics") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| prune_topic(item, &format!("{path}.subtopics[{i}]")))
            .collect(),
        _ => Vec::new(),
    };
    Some(topic_from_object(map, subtopics))
}

/// Builds a topic from an object that already passed [`own_violations`].
fn topic_from_object(map: &Map<String, Value>, subtopics: Vec<Topic>) -> Topic {
    let string = |field: &str| map.get(field).and_then(Value::as_str).map(str::to_string);
    let strings = |field: &str| -> Vec<String> {
        map.get(field)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };
    let opaque = |field: &str| map.get(field).filter(|v| !v.is_null()).cloned();

    let relationships = map
        .get("relationships")
        .and_then(Value::as_array)
        .map(|rels| rels.iter().filter_map(relationship_from_value).collect())
        .unwrap_or_default();

    Topic {
        title: string("title").unwrap_or_default(),
        description: string("description"),
        context: string("context"),
        examples: strings("examples"),
        citations: strings("citations"),
        related_topics: strings("relatedTopics"),
        icon: string("icon"),
        color: string("color"),
        subtopics,
        relationships,
        importance: map.get("importance").and_then(Value::as_f64),
        depth: map
            .get("depth")
            .and_then(Value::as_u64)
            .and_then(|d| u32::try_from(d).ok()),
        language: string("language"),
        metadata: opaque("metadata"),
        styling: opaque("styling"),
    }
}

fn relationship_from_value(value: &Value) -> Option<Relationship> {
    let rel = value.as_object()?;
    let to = rel.get("to")?.as_str().filter(|to| !to.is_empty())?;
    let kind = RelationshipType::parse(rel.get("type")?.as_str()?)?;
    Some(Relationship {
        to: to.to_string(),
        kind,
        description: rel
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        strength: rel.get("strength").and_then(Value::as_f64),
        bidirectional: rel.get("bidirectional").and_then(Value::as_bool),
    })
}

/// Own-field check for typed topics, used by the graph builder.
pub(crate) fn topic_is_acceptable(topic: &Topic) -> bool {
    !topic.title.is_empty() && topic.relationships.iter().all(|r| !r.to.is_empty())
}
