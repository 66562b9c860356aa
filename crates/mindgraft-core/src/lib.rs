#![forbid(unsafe_code)]

//! Topic-tree model and graph construction for mindgraft (headless).
//!
//! Pipeline, leaves first:
//! - [`validate`]: structural checks that turn untrusted JSON into typed [`Topic`] forests
//! - [`graph`]: forest → node/edge [`Graph`] with generated ids, labels and level colors
//! - [`preprocess`]: raw text → heuristic topic forest (used when no structuring service
//!   answers)
//! - [`response`]: structuring-service reply → topic forest
//!
//! Everything here is synchronous, performs no I/O and is deterministic given the same input,
//! id counter and clock.

pub mod config;
pub mod error;
pub mod graph;
pub mod preprocess;
pub mod response;
pub mod topic;
pub mod validate;

pub use config::MindgraftConfig;
pub use error::{Error, Result};
pub use graph::{
    BuildOptions, Clock, EdgeKind, FixedClock, Graph, GraphBuilder, GraphEdge, GraphNode,
    IdGenerator, IdSource, LevelColors, LevelTier, Position, SystemClock,
};
pub use preprocess::{Preprocessor, SpellChecker, WordListSpellChecker};
pub use response::{parse_structuring_response, placeholder_forest};
pub use topic::{Relationship, RelationshipType, Topic, follow_title_renames};
pub use validate::{Violation, ViolationKind, Violations, check_topic, prune_forest, validate_topic};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests;
