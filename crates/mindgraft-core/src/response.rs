//! Parsing of structuring-service replies.
//!
//! Replies are free text that should contain a JSON array of topics, often wrapped in prose or
//! code fences and sometimes slightly malformed (trailing commas, single quotes, unquoted keys).

use crate::topic::Topic;
use crate::validate::prune_forest;
use crate::{Error, Result};
use serde_json::Value;

/// The text between the first `[` and the last `]`, or the input when there is no `[`.
pub fn extract_json_array(content: &str) -> &str {
    let Some(start) = content.find('[') else {
        return content;
    };
    match content.rfind(']') {
        Some(end) if end > start => &content[start..=end],
        _ => &content[start..],
    }
}

/// Parses a reply into a topic forest.
///
/// Strict JSON is tried first, then the lenient JSON5 grammar. The result must be an array;
/// invalid subtrees are pruned. An array whose topics are all invalid is an error.
pub fn try_parse_structuring_response(content: &str) -> Result<Vec<Topic>> {
    let cleaned = extract_json_array(content);
    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(strict) => {
            tracing::debug!(error = %strict, "strict JSON parse failed; retrying leniently");
            json5::from_str(cleaned).map_err(|err| Error::InvalidResponse {
                message: err.to_string(),
            })?
        }
    };
    let topics = prune_forest(&value)?;
    if topics.is_empty() {
        return Err(Error::InvalidResponse {
            message: "no valid topics in response".to_string(),
        });
    }
    Ok(topics)
}

/// Infallible variant: falls back to [`placeholder_forest`] and logs why.
pub fn parse_structuring_response(content: &str) -> Vec<Topic> {
    match try_parse_structuring_response(content) {
        Ok(topics) => topics,
        Err(err) => {
            tracing::warn!(error = %err, "could not parse structuring response; using placeholder");
            placeholder_forest()
        }
    }
}

pub fn placeholder_forest() -> Vec<Topic> {
    vec![Topic::new("Main Topic").with_subtopics([Topic::new("Error parsing response")
        .with_subtopics([Topic::new("Please try again with simpler text")])])]
}
