pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid or empty topics array")]
    EmptyForest,

    #[error("Expected a JSON array of topics, found {found}")]
    NotAnArray { found: &'static str },

    #[error("Duplicate node ID detected: {id}")]
    DuplicateNodeId { id: String },

    #[error("Invalid node ID {id:?}: expected ASCII letters, digits and underscores")]
    InvalidNodeId { id: String },

    #[error("Invalid config ({format}): {message}")]
    InvalidConfig {
        format: &'static str,
        message: String,
    },

    #[error("Invalid structuring response: {message}")]
    InvalidResponse { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Short JSON type name used in diagnostics.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
