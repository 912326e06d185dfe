//! Builders and kind tags over `serde_json::Value`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Coarse JSON kind, used to describe type mismatches.
///
/// `Integer` never comes out of [`kind_of`]; it only appears as the
/// *expected* kind when an integral target rejects a fractional number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    Null,
    #[serde(rename = "boolean")]
    Bool,
    Number,
    Integer,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn name(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "boolean",
            JsonKind::Number => "number",
            JsonKind::Integer => "integer",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the kind tag of a value.
pub fn kind_of(value: &Value) -> JsonKind {
    match value {
        Value::Null => JsonKind::Null,
        Value::Bool(_) => JsonKind::Bool,
        Value::Number(_) => JsonKind::Number,
        Value::String(_) => JsonKind::String,
        Value::Array(_) => JsonKind::Array,
        Value::Object(_) => JsonKind::Object,
    }
}

/// Builds an object value from `(key, value)` pairs, keeping their order.
///
/// A repeated key keeps the position of its first occurrence and the value
/// of its last one.
///
/// # Example
///
/// ```
/// use json_format::obj;
/// use serde_json::json;
///
/// let v = obj([("name", json!("John")), ("age", json!(42))]);
/// assert_eq!(v.to_string(), r#"{"name":"John","age":42}"#);
/// ```
pub fn obj<K, I>(fields: I) -> Value
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key.into(), value);
    }
    Value::Object(map)
}
