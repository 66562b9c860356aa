//! The topic tree data model.
//!
//! A forest of [`Topic`]s is what every source (structuring service, local heuristics, hand
//! written JSON) produces and what every emitter consumes. Subtopics are owned; cross links
//! between topics are expressed by title through [`Relationship`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    Related,
    Depends,
    Influences,
    PartOf,
}

impl RelationshipType {
    pub const ALL: [Self; 4] = [Self::Related, Self::Depends, Self::Influences, Self::PartOf];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "related" => Some(Self::Related),
            "depends" => Some(Self::Depends),
            "influences" => Some(Self::Influences),
            "part-of" => Some(Self::PartOf),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Related => "related",
            Self::Depends => "depends",
            Self::Influences => "influences",
            Self::PartOf => "part-of",
        }
    }

    /// `"Depends"`, `"Part-of"`: only the first letter is upper-cased.
    pub fn capitalized(self) -> &'static str {
        match self {
            Self::Related => "Related",
            Self::Depends => "Depends",
            Self::Influences => "Influences",
            Self::PartOf => "Part-of",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Title of the target topic.
    pub to: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
}

impl Relationship {
    pub fn new(to: impl Into<String>, kind: RelationshipType) -> Self {
        Self {
            to: to.into(),
            kind,
            description: None,
            strength: None,
            bidirectional: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtopics: Vec<Topic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<Value>,
}

impl Topic {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_subtopics(mut self, subtopics: impl IntoIterator<Item = Topic>) -> Self {
        self.subtopics = subtopics.into_iter().collect();
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Description if present and non-empty.
    pub fn details(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Number of topics in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.subtopics.iter().map(Topic::subtree_len).sum::<usize>()
    }

    /// Pre-order walk over this subtree with each topic's depth relative to `self`.
    pub fn walk(&self, f: &mut impl FnMut(&Topic, usize)) {
        fn go(topic: &Topic, depth: usize, f: &mut impl FnMut(&Topic, usize)) {
            f(topic, depth);
            for child in &topic.subtopics {
                go(child, depth + 1, f);
            }
        }
        go(self, 0, f);
    }
}

/// Points relationship targets and related-topic titles in `after` at the renamed topics.
///
/// `after` must be a per-topic rewrite of `before` with the same shape (icons added, spelling
/// fixed, ...). When several topics share an old title, the first one in pre-order decides the
/// new title, matching how the graph builder resolves cross references.
pub fn follow_title_renames(before: &[Topic], after: &mut [Topic]) {
    fn collect<'a>(
        before: &'a [Topic],
        after: &'a [Topic],
        renames: &mut FxHashMap<&'a str, &'a str>,
    ) {
        for (old, new) in before.iter().zip(after) {
            renames
                .entry(old.title.as_str())
                .or_insert(new.title.as_str());
            collect(&old.subtopics, &new.subtopics, renames);
        }
    }

    fn apply(topics: &mut [Topic], renames: &FxHashMap<String, String>) {
        for topic in topics {
            for rel in &mut topic.relationships {
                if let Some(new) = renames.get(&rel.to) {
                    rel.to.clone_from(new);
                }
            }
            for related in &mut topic.related_topics {
                if let Some(new) = renames.get(related) {
                    related.clone_from(new);
                }
            }
            apply(&mut topic.subtopics, renames);
        }
    }

    let mut borrowed = FxHashMap::default();
    collect(before, after, &mut borrowed);
    let renames: FxHashMap<String, String> = borrowed
        .into_iter()
        .filter(|(old, new)| old != new)
        .map(|(old, new)| (old.to_string(), new.to_string()))
        .collect();
    if renames.is_empty() {
        return;
    }
    tracing::debug!(renamed = renames.len(), "retargeting cross references");
    apply(after, &renames);
}
