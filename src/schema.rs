//! Column, filter and action schema.
//!
//! A schema is the whole per-screen configuration of the engine: which
//! fields exist (and which of them are searchable or sortable), which
//! categorical filters are offered, which row and bulk actions exist, and
//! how to get a record's identity. It is validated once at construction and
//! immutable afterwards.
//!
//! # Examples
//!
//! ```
//! use datagrid::{FieldSpec, FilterOption, FilterSpec, RecordId, Schema};
//! use serde_json::Value as Json;
//!
//! let schema = Schema::builder(|r: &Json| RecordId::from(r["id"].as_i64().unwrap_or_default()))
//!     .field(FieldSpec::new("name").searchable().sortable())
//!     .field(FieldSpec::new("email").searchable())
//!     .filter(FilterSpec::new("status", "Status")
//!         .option(FilterOption::equals("Active", "status", "Active"))
//!         .option(FilterOption::equals("Inactive", "status", "Inactive")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.searchable_fields().count(), 2);
//! assert!(schema.filter("status").is_some());
//! ```

use crate::accessor::{FieldSpec, Record};
use crate::error::ConfigurationError;
use crate::value::{RecordId, Value};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// One selectable value of a categorical filter.
pub struct FilterOption<T> {
    label: String,
    value: String,
    predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T> FilterOption<T> {
    pub fn new<F>(label: impl Into<String>, value: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        FilterOption {
            label: label.into(),
            value: value.into(),
            predicate: Rc::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn matches(&self, record: &T) -> bool {
        (self.predicate)(record)
    }
}

impl<T: Record> FilterOption<T> {
    /// Option whose predicate checks that `field` reads as exactly `value`.
    ///
    /// The option value doubles as the comparison value, which is what the
    /// usual status/category/role filters need.
    pub fn equals(
        label: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let value = value.into();
        let expected = value.clone();
        FilterOption::new(label, value, move |record: &T| {
            field_equals(record.field(&field), &expected)
        })
    }
}

fn field_equals(actual: Option<Value>, expected: &str) -> bool {
    match actual {
        Some(value) => value.search_text().is_some_and(|text| text == expected),
        None => false,
    }
}

impl<T> Clone for FilterOption<T> {
    fn clone(&self) -> Self {
        FilterOption {
            label: self.label.clone(),
            value: self.value.clone(),
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for FilterOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOption")
            .field("label", &self.label)
            .field("value", &self.value)
            .finish()
    }
}

/// A named categorical filter.
pub struct FilterSpec<T> {
    id: String,
    label: String,
    options: Vec<FilterOption<T>>,
}

impl<T> FilterSpec<T> {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        FilterSpec {
            id: id.into(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: FilterOption<T>) -> Self {
        self.options.push(option);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &[FilterOption<T>] {
        &self.options
    }

    pub fn find_option(&self, value: &str) -> Option<&FilterOption<T>> {
        self.options.iter().find(|o| o.value == value)
    }
}

impl<T: Record> FilterSpec<T> {
    /// One `equals` option per value, labelled with the value itself.
    pub fn from_values<I, S>(
        id: impl Into<String>,
        label: impl Into<String>,
        field: &str,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = FilterSpec::new(id, label);
        for value in values {
            let value = value.into();
            spec.options
                .push(FilterOption::equals(value.clone(), field, value));
        }
        spec
    }
}

impl<T> Clone for FilterSpec<T> {
    fn clone(&self) -> Self {
        FilterSpec {
            id: self.id.clone(),
            label: self.label.clone(),
            options: self.options.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("options", &self.options)
            .finish()
    }
}

/// A row or bulk action. The callback receives the records it applies to:
/// one record for row actions, the current selection for bulk actions.
pub struct Action<T> {
    id: String,
    label: String,
    on_click: Rc<dyn Fn(&[&T])>,
}

impl<T> Action<T> {
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, on_click: F) -> Self
    where
        F: Fn(&[&T]) + 'static,
    {
        Action {
            id: id.into(),
            label: label.into(),
            on_click: Rc::new(on_click),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn invoke(&self, records: &[&T]) {
        (self.on_click)(records)
    }
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        Action {
            id: self.id.clone(),
            label: self.label.clone(),
            on_click: Rc::clone(&self.on_click),
        }
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

/// Validated, immutable description of one record type's table.
pub struct Schema<T> {
    id_fn: Rc<dyn Fn(&T) -> RecordId>,
    fields: Vec<FieldSpec<T>>,
    filters: Vec<FilterSpec<T>>,
    row_actions: Vec<Action<T>>,
    bulk_actions: Vec<Action<T>>,
    default_sort: Option<String>,
}

impl<T> Schema<T> {
    pub fn builder<F>(id_fn: F) -> SchemaBuilder<T>
    where
        F: Fn(&T) -> RecordId + 'static,
    {
        SchemaBuilder {
            id_fn: Rc::new(id_fn),
            fields: Vec::new(),
            filters: Vec::new(),
            row_actions: Vec::new(),
            bulk_actions: Vec::new(),
            default_sort: None,
        }
    }

    pub fn id_of(&self, record: &T) -> RecordId {
        (self.id_fn)(record)
    }

    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldSpec<T>> {
        self.fields.iter().find(|f| f.id() == id)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldSpec<T>> {
        self.fields.iter().filter(|f| f.is_searchable())
    }

    pub fn sortable_fields(&self) -> impl Iterator<Item = &FieldSpec<T>> {
        self.fields.iter().filter(|f| f.is_sortable())
    }

    /// Look up a field that may be sorted on.
    pub fn sort_field(&self, id: &str) -> Result<&FieldSpec<T>, ConfigurationError> {
        match self.field(id) {
            Some(field) if field.is_sortable() => Ok(field),
            Some(_) => Err(ConfigurationError::NotSortable(id.to_string())),
            None => Err(ConfigurationError::UnknownField(id.to_string())),
        }
    }

    pub fn filters(&self) -> &[FilterSpec<T>] {
        &self.filters
    }

    pub fn filter(&self, id: &str) -> Option<&FilterSpec<T>> {
        self.filters.iter().find(|f| f.id() == id)
    }

    pub fn row_actions(&self) -> &[Action<T>] {
        &self.row_actions
    }

    pub fn bulk_actions(&self) -> &[Action<T>] {
        &self.bulk_actions
    }

    pub fn row_action(&self, id: &str) -> Option<&Action<T>> {
        self.row_actions.iter().find(|a| a.id() == id)
    }

    pub fn bulk_action(&self, id: &str) -> Option<&Action<T>> {
        self.bulk_actions.iter().find(|a| a.id() == id)
    }

    pub fn default_sort(&self) -> Option<&str> {
        self.default_sort.as_deref()
    }

    /// Id of the first filter offering an option with this value.
    pub(crate) fn filter_with_option(&self, value: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.find_option(value).is_some())
            .map(|f| f.id())
    }
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Schema {
            id_fn: Rc::clone(&self.id_fn),
            fields: self.fields.clone(),
            filters: self.filters.clone(),
            row_actions: self.row_actions.clone(),
            bulk_actions: self.bulk_actions.clone(),
            default_sort: self.default_sort.clone(),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("filters", &self.filters)
            .field("row_actions", &self.row_actions)
            .field("bulk_actions", &self.bulk_actions)
            .field("default_sort", &self.default_sort)
            .finish()
    }
}

pub struct SchemaBuilder<T> {
    id_fn: Rc<dyn Fn(&T) -> RecordId>,
    fields: Vec<FieldSpec<T>>,
    filters: Vec<FilterSpec<T>>,
    row_actions: Vec<Action<T>>,
    bulk_actions: Vec<Action<T>>,
    default_sort: Option<String>,
}

impl<T> SchemaBuilder<T> {
    pub fn field(mut self, field: FieldSpec<T>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn filter(mut self, filter: FilterSpec<T>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn row_action(mut self, action: Action<T>) -> Self {
        self.row_actions.push(action);
        self
    }

    pub fn bulk_action(mut self, action: Action<T>) -> Self {
        self.bulk_actions.push(action);
        self
    }

    /// Field the view is sorted by (ascending) before the user picks one.
    pub fn default_sort(mut self, field: impl Into<String>) -> Self {
        self.default_sort = Some(field.into());
        self
    }

    fn check_ids(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.id().is_empty() {
                return Err(ConfigurationError::EmptyIdentifier("field"));
            }
            if !seen.insert(field.id()) {
                return Err(ConfigurationError::DuplicateField(field.id().to_string()));
            }
        }

        let mut seen = HashSet::new();
        for filter in &self.filters {
            if filter.id().is_empty() {
                return Err(ConfigurationError::EmptyIdentifier("filter"));
            }
            if !seen.insert(filter.id()) {
                return Err(ConfigurationError::DuplicateFilter(filter.id().to_string()));
            }
            let mut values = HashSet::new();
            for option in filter.options() {
                if !values.insert(option.value()) {
                    return Err(ConfigurationError::DuplicateOptionValue {
                        filter: filter.id().to_string(),
                        value: option.value().to_string(),
                    });
                }
            }
        }

        for actions in [&self.row_actions, &self.bulk_actions] {
            let mut seen = HashSet::new();
            for action in actions {
                if action.id().is_empty() {
                    return Err(ConfigurationError::EmptyIdentifier("action"));
                }
                if !seen.insert(action.id()) {
                    return Err(ConfigurationError::DuplicateAction(action.id().to_string()));
                }
            }
        }

        Ok(())
    }

    /// Validate and freeze the schema.
    pub fn build(self) -> Result<Schema<T>, ConfigurationError> {
        self.check_ids()?;
        let schema = Schema {
            id_fn: self.id_fn,
            fields: self.fields,
            filters: self.filters,
            row_actions: self.row_actions,
            bulk_actions: self.bulk_actions,
            default_sort: self.default_sort,
        };
        if let Some(field) = schema.default_sort() {
            schema.sort_field(field)?;
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as Json};

    fn id_of(r: &Json) -> RecordId {
        RecordId::from(r["id"].as_i64().unwrap_or_default())
    }

    #[test]
    fn test_build_valid_schema() {
        let schema = Schema::builder(id_of)
            .field(FieldSpec::new("name").searchable().sortable())
            .field(FieldSpec::new("email").searchable())
            .field(FieldSpec::new("created_at").sortable())
            .filter(FilterSpec::from_values("status", "Status", "status", ["Active", "Inactive"]))
            .bulk_action(Action::new("delete", "Delete", |_: &[&Json]| {}))
            .default_sort("name")
            .build()
            .unwrap();

        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.searchable_fields().count(), 2);
        assert_eq!(schema.sortable_fields().count(), 2);
        assert_eq!(schema.filter("status").unwrap().options().len(), 2);
        assert_eq!(schema.default_sort(), Some("name"));
        assert!(schema.bulk_action("delete").is_some());
        assert!(schema.row_action("delete").is_none());
        assert_eq!(schema.id_of(&json!({"id": 9})), RecordId::Int(9));
    }

    #[test]
    fn test_duplicate_field() {
        let err = Schema::builder(id_of)
            .field(FieldSpec::new("name"))
            .field(FieldSpec::new("name").sortable())
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateField("name".to_string()));
    }

    #[test]
    fn test_empty_field_id() {
        let err = Schema::builder(id_of).field(FieldSpec::new("")).build().unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyIdentifier("field"));
    }

    #[test]
    fn test_duplicate_option_value() {
        let err = Schema::builder(id_of)
            .filter(
                FilterSpec::new("status", "Status")
                    .option(FilterOption::equals("Active", "status", "Active"))
                    .option(FilterOption::new("Also active", "Active", |_: &Json| true)),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateOptionValue {
                filter: "status".to_string(),
                value: "Active".to_string(),
            }
        );
    }

    #[test]
    fn test_same_option_value_in_different_filters_is_fine() {
        let schema = Schema::builder(id_of)
            .filter(FilterSpec::from_values("status", "Status", "status", ["Yes"]))
            .filter(FilterSpec::from_values("verified", "Verified", "verified", ["Yes"]))
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn test_option_value_all_is_allowed() {
        let schema = Schema::builder(id_of)
            .filter(FilterSpec::from_values("scope", "Scope", "scope", ["all", "mine"]))
            .build()
            .unwrap();
        let scope = schema.filter("scope").unwrap();
        assert_eq!(scope.options().len(), 2);
        assert!(scope.find_option("all").is_some());
    }

    #[test]
    fn test_duplicate_filter_and_action() {
        let err = Schema::builder(id_of)
            .filter(FilterSpec::new("status", "Status"))
            .filter(FilterSpec::new("status", "Status again"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateFilter("status".to_string()));

        let err = Schema::builder(id_of)
            .row_action(Action::new("edit", "Edit", |_: &[&Json]| {}))
            .row_action(Action::new("edit", "Edit", |_: &[&Json]| {}))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateAction("edit".to_string()));

        // Same id in different scopes is allowed
        let ok = Schema::builder(id_of)
            .row_action(Action::new("delete", "Delete", |_: &[&Json]| {}))
            .bulk_action(Action::new("delete", "Delete selected", |_: &[&Json]| {}))
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_default_sort_must_be_sortable() {
        let err = Schema::builder(id_of)
            .field(FieldSpec::new("name"))
            .default_sort("name")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::NotSortable("name".to_string()));

        let err = Schema::builder(id_of).default_sort("missing").build().unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownField("missing".to_string()));
    }

    #[test]
    fn test_equals_option() {
        let active = FilterOption::<Json>::equals("Active", "status", "Active");
        assert!(active.matches(&json!({"status": "Active"})));
        assert!(!active.matches(&json!({"status": "Inactive"})));
        assert!(!active.matches(&json!({})));

        let rating = FilterOption::<Json>::equals("5 stars", "rating", "5");
        assert!(rating.matches(&json!({"rating": 5})));
    }
}
