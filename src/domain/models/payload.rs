//! Loosely typed invocation payload with typed accessors.
//!
//! Each accessor returns `Some(value)` when the key is present and coercible
//! to the requested type, `None` otherwise. Defaults and "no-op when absent"
//! decisions belong to the router, not to this type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::command::keys;
use crate::domain::errors::{BridgeError, BridgeResult};

/// Key/value payload received with a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parse a JSON object into a payload.
    pub fn from_json_str(json: &str) -> BridgeResult<Self> {
        match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(BridgeError::InvalidPayload {
                key: String::new(),
                reason: format!("expected a JSON object, got {other}"),
            }),
            Err(err) => Err(BridgeError::InvalidPayload {
                key: String::new(),
                reason: err.to_string(),
            }),
        }
    }

    /// Insert or replace a value, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Raw `command_name` value, empty when absent.
    pub fn command_name(&self) -> String {
        self.opt_string(keys::COMMAND_NAME).unwrap_or_default()
    }

    /// String value. Numbers and booleans are rendered to text.
    pub fn opt_string(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Boolean value. Accepts `"true"`/`"false"` strings in any case.
    pub fn opt_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Integer value. Floats are truncated, numeric strings are parsed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn opt_int(&self, key: &str) -> Option<i32> {
        match self.0.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .or_else(|| n.as_f64().map(|f| f as i32)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i32>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i32))
            }
            _ => None,
        }
    }

    /// List of strings. A bare string is read as a one-element list; null
    /// entries inside an array are skipped, other scalars are rendered to text.
    pub fn opt_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.0.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        Value::Null | Value::Array(_) | Value::Object(_) => None,
                    })
                    .collect(),
            ),
            Value::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }

    /// Nested object value.
    pub fn opt_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key)?.as_object()
    }

    /// First character of a non-empty string value.
    pub fn opt_char(&self, key: &str) -> Option<char> {
        self.0.get(key)?.as_str()?.chars().next()
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Payload {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}
