//! Field accessors.
//!
//! A `FieldSpec` names a logical column of a record type and knows how to
//! read it: either directly by id through the `Record` trait, or through a
//! caller-supplied extraction closure (computed columns, nested lookups,
//! rendered cells).

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Direct, by-name field access.
///
/// Returning `None` for an unknown name is fine: missing fields resolve to
/// an empty string rather than failing the search or sort.
pub trait Record {
    fn field(&self, name: &str) -> Option<Value>;
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).map(Value::from)
    }
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|obj| obj.field(name))
    }
}

impl Record for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

enum Accessor<T> {
    Direct(fn(&T, &str) -> Option<Value>),
    Extract(Rc<dyn Fn(&T) -> Value>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Direct(f) => Accessor::Direct(*f),
            Accessor::Extract(f) => Accessor::Extract(Rc::clone(f)),
        }
    }
}

/// Describes one field of a record type.
pub struct FieldSpec<T> {
    id: String,
    label: String,
    accessor: Accessor<T>,
    sortable: bool,
    searchable: bool,
}

impl<T: Record> FieldSpec<T> {
    /// A field read directly from the record by `id`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        FieldSpec {
            label: id.clone(),
            id,
            accessor: Accessor::Direct(<T as Record>::field),
            sortable: false,
            searchable: false,
        }
    }
}

impl<T> FieldSpec<T> {
    /// A field computed from the record by `extract`.
    pub fn computed<F>(id: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&T) -> Value + 'static,
    {
        let id = id.into();
        FieldSpec {
            label: id.clone(),
            id,
            accessor: Accessor::Extract(Rc::new(extract)),
            sortable: false,
            searchable: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_label(&self) -> &str {
        &self.label
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.accessor, Accessor::Extract(_))
    }

    /// Resolve this field on `record`.
    ///
    /// Extracted values are returned as-is, opaque ones included. A null or
    /// missing value comes back as an empty string.
    pub fn resolve(&self, record: &T) -> Value {
        let value = match &self.accessor {
            Accessor::Direct(get) => get(record, &self.id).unwrap_or(Value::Null),
            Accessor::Extract(extract) => extract(record),
        };
        match value {
            Value::Null => Value::Text(String::new()),
            other => other,
        }
    }
}

impl<T> Clone for FieldSpec<T> {
    fn clone(&self) -> Self {
        FieldSpec {
            id: self.id.clone(),
            label: self.label.clone(),
            accessor: self.accessor.clone(),
            sortable: self.sortable,
            searchable: self.searchable,
        }
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("computed", &self.is_computed())
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_field_on_json() {
        let field = FieldSpec::<serde_json::Value>::new("name");
        let record = json!({"id": 1, "name": "John Doe"});
        assert_eq!(field.resolve(&record), Value::Text("John Doe".to_string()));
    }

    #[test]
    fn test_missing_and_null_fields_resolve_to_empty() {
        let field = FieldSpec::<serde_json::Value>::new("email");
        assert_eq!(field.resolve(&json!({"id": 1})), Value::Text(String::new()));
        assert_eq!(field.resolve(&json!({"id": 1, "email": null})), Value::Text(String::new()));
        // Not an object at all
        assert_eq!(field.resolve(&json!(42)), Value::Text(String::new()));
    }

    #[test]
    fn test_computed_field() {
        struct Line {
            qty: u32,
            price: f64,
        }

        let total = FieldSpec::computed("total", |l: &Line| Value::from(l.qty as f64 * l.price))
            .label("Total")
            .sortable();

        assert!(total.is_computed());
        assert!(total.is_sortable());
        assert!(!total.is_searchable());
        assert_eq!(total.display_label(), "Total");
        assert_eq!(total.resolve(&Line { qty: 3, price: 2.5 }), Value::Number(7.5));
    }

    #[test]
    fn test_computed_rendered_value_is_verbatim() {
        let badge = FieldSpec::computed("badge", |_: &serde_json::Value| {
            Value::Rendered("<Badge/>".to_string())
        });
        assert_eq!(badge.resolve(&json!({})), Value::Rendered("<Badge/>".to_string()));
    }

    #[test]
    fn test_hashmap_record() {
        let mut row = HashMap::new();
        row.insert("status".to_string(), Value::from("Active"));
        let field = FieldSpec::<HashMap<String, Value>>::new("status").searchable();
        assert_eq!(field.resolve(&row).as_str(), Some("Active"));
        assert_eq!(field.display_label(), "status");
    }
}
