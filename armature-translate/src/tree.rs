//! Locale data trees
//!
//! A locale's strings are kept as the nested mapping they were parsed from.
//! Leaves are not validated on load; a key that lands on anything other
//! than a string is reported when it is looked up.

use crate::{Result, TranslateError};
use serde_json::{Map, Value as JsonValue};

/// Nested mapping of translation strings for one locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleTree {
    root: Map<String, JsonValue>,
}

impl LocaleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already parsed value. The top level must be a mapping.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(root) => Ok(Self { root }),
            other => Err(TranslateError::InvalidTree(kind_of(&other))),
        }
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(source)?;
        Self::from_value(value)
    }

    /// Parse a YAML document.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let value: JsonValue = serde_yaml::from_str(source)?;
        Self::from_value(value)
    }

    /// Set a string at a dotted key, creating intermediate mappings.
    ///
    /// Any non-mapping value found along the way is replaced.
    pub fn insert(&mut self, key: &str, message: impl Into<String>) {
        let mut segments: Vec<&str> = key.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut node = &mut self.root;
        for segment in segments {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if !entry.is_object() {
                *entry = JsonValue::Object(Map::new());
            }
            node = match entry {
                JsonValue::Object(map) => map,
                _ => unreachable!("entry was just made a mapping"),
            };
        }

        node.insert(last.to_string(), JsonValue::String(message.into()));
    }

    /// Builder form of [`LocaleTree::insert`].
    pub fn with(mut self, key: &str, message: impl Into<String>) -> Self {
        self.insert(key, message);
        self
    }

    /// Walk a dotted key, returning whatever value it lands on.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    /// Resolve a dotted key to its string.
    pub fn resolve(&self, key: &str, locale: &str) -> Result<&str> {
        match self.get(key) {
            Some(JsonValue::String(s)) => Ok(s),
            Some(other) => Err(TranslateError::NotAString {
                key: key.to_string(),
                kind: kind_of(other),
            }),
            None => Err(TranslateError::KeyNotFound {
                key: key.to_string(),
                locale: locale.to_string(),
            }),
        }
    }

    /// Check if a dotted key resolves to a string.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.get(key), Some(JsonValue::String(_)))
    }

    /// All dotted keys that lead to string leaves, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys);
        keys.sort();
        keys
    }

    /// Check if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn collect_keys(map: &Map<String, JsonValue>, prefix: &str, out: &mut Vec<String>) {
    for (name, value) in map {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            JsonValue::Object(child) => collect_keys(child, &key, out),
            JsonValue::String(_) => out.push(key),
            _ => {}
        }
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Object(_) => "mapping",
        JsonValue::Array(_) => "sequence",
        JsonValue::String(_) => "string",
        JsonValue::Number(_) => "number",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Null => "null",
    }
}
