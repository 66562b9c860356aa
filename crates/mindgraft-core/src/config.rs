use crate::{Error, Result};
use serde_json::{Map, Value, json};

/// Loosely typed configuration tree addressed by dotted paths (`layout.nodeSep`).
///
/// Typed views (`BuildOptions`, the layout and retry options in the downstream crates) read
/// from it and fall back to their own defaults for missing or mistyped keys.
#[derive(Debug, Clone, PartialEq)]
pub struct MindgraftConfig(Value);

impl Default for MindgraftConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl MindgraftConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn defaults() -> Self {
        Self(json!({
            "graph": {
                "namespace": "node",
                "maxLabelChars": 50
            },
            "layout": {
                "rankDir": "TB",
                "ranker": "network-simplex",
                "nodeSep": 80,
                "rankSep": 120,
                "edgeSep": 50,
                "padding": 50,
                "spacingFactor": 1.2,
                "hierarchyWeight": 2,
                "crossReferenceWeight": 1
            },
            "retry": {
                "attempts": 3,
                "baseDelayMs": 500,
                "maxDelayMs": 8000,
                "timeoutSecs": 30
            },
            "output": {
                "language": "en",
                "enhance": true
            }
        }))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    /// Parses a config document. Strict JSON is tried first, then JSON5, then YAML.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::empty_object());
        }
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return Self::checked(value, "json");
        }
        if trimmed.starts_with('{') {
            return match json5::from_str::<Value>(trimmed) {
                Ok(value) => Self::checked(value, "json5"),
                Err(err) => Err(Error::InvalidConfig {
                    format: "json5",
                    message: err.to_string(),
                }),
            };
        }
        match serde_yaml::from_str::<Value>(trimmed) {
            Ok(value) => Self::checked(value, "yaml"),
            Err(err) => Err(Error::InvalidConfig {
                format: "yaml",
                message: err.to_string(),
            }),
        }
    }

    /// Defaults overlaid with a parsed document.
    pub fn parse_with_defaults(text: &str) -> Result<Self> {
        let mut config = Self::defaults();
        config.deep_merge(Self::parse(text)?.as_value());
        Ok(config)
    }

    fn checked(value: Value, format: &'static str) -> Result<Self> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(Error::InvalidConfig {
                format,
                message: "top-level config must be a mapping".to_string(),
            })
        }
    }

    fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        self.get(dotted_path)?.as_u64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
