//! Record identities and displayable field values.
//!
//! A `Value` is whatever a field resolves to for one record: text, a number,
//! a boolean, nothing at all, or an opaque rendered value that only the
//! presentation layer understands. The sort and search engines dispatch on
//! these variants.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Stable identity of a record.
///
/// Serialized untagged, so JSON `7` becomes `Int(7)` and `"inv-7"` becomes
/// `Text("inv-7")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RecordId::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RecordId::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(v) => write!(f, "{}", v),
            RecordId::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for RecordId {
    fn from(v: i64) -> Self {
        RecordId::Int(v)
    }
}

impl From<i32> for RecordId {
    fn from(v: i32) -> Self {
        RecordId::Int(v as i64)
    }
}

impl From<u32> for RecordId {
    fn from(v: u32) -> Self {
        RecordId::Int(v as i64)
    }
}

impl From<&str> for RecordId {
    fn from(v: &str) -> Self {
        RecordId::Text(v.to_string())
    }
}

impl From<String> for RecordId {
    fn from(v: String) -> Self {
        RecordId::Text(v)
    }
}

/// A value resolved from a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Opaque presentation value (a badge, an avatar, formatted markup).
    /// Never compared and never matched by search.
    Rendered(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The string form used for free-text search.
    ///
    /// Numbers use the shortest round-trip formatting (`5`, `2.5`), so a
    /// search for "5" finds a quantity of 5. `Rendered` values have no
    /// searchable text.
    pub fn search_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => Some(Cow::Borrowed("")),
            Value::Bool(true) => Some(Cow::Borrowed("true")),
            Value::Bool(false) => Some(Cow::Borrowed("false")),
            Value::Number(v) => Some(Cow::Owned(v.to_string())),
            Value::Text(v) => Some(Cow::Borrowed(v)),
            Value::Rendered(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            // Nested structures are display-only
            other => Value::Rendered(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::from(&other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_serde_untagged() {
        let ids: Vec<RecordId> = serde_json::from_value(json!([5, "inv-7"])).unwrap();
        assert_eq!(ids, vec![RecordId::Int(5), RecordId::Text("inv-7".to_string())]);
        assert_eq!(serde_json::to_value(&ids).unwrap(), json!([5, "inv-7"]));
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::from(12).to_string(), "12");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_search_text() {
        assert_eq!(Value::from(5).search_text().as_deref(), Some("5"));
        assert_eq!(Value::from(2.5).search_text().as_deref(), Some("2.5"));
        assert_eq!(Value::from(true).search_text().as_deref(), Some("true"));
        assert_eq!(Value::Null.search_text().as_deref(), Some(""));
        assert!(Value::Rendered("<Badge/>".to_string()).search_text().is_none());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(json!("Active")), Value::Text("Active".to_string()));
        assert_eq!(Value::from(json!(3)), Value::Number(3.0));
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert!(matches!(Value::from(json!({"a": 1})), Value::Rendered(_)));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }
}
