//! User-driven view state and its transitions.
//!
//! `ViewState` is plain data: the caller may own it, persist it, or send it
//! across a message boundary. Transitions are methods that validate against
//! a schema and report whether anything changed; they never look at the
//! records themselves.

use crate::error::ConfigurationError;
use crate::options::{UnknownFieldPolicy, ViewOptions};
use crate::schema::Schema;
use crate::selection::SelectionTracker;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// New active value(s) for one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Exactly one option (single-select dropdown).
    One(String),
    /// Any of these options (checkbox group). An empty set clears.
    Many(BTreeSet<String>),
    /// No constraint.
    All,
}

impl FilterValue {
    /// The option values this sets. A value equal to `sentinel` empties the
    /// set; pass `None` when the filter owns a real option with that value.
    fn into_set(self, sentinel: Option<&str>) -> BTreeSet<String> {
        let set: BTreeSet<String> = match self {
            FilterValue::All => BTreeSet::new(),
            FilterValue::One(v) => BTreeSet::from([v]),
            FilterValue::Many(set) => set,
        };
        match sentinel {
            Some(sentinel) if set.contains(sentinel) => BTreeSet::new(),
            _ => set,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        FilterValue::One(raw.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for FilterValue {
    fn from(values: [&str; N]) -> Self {
        FilterValue::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub search_term: String,
    /// filter id -> active option values. Absent or empty means inactive.
    pub active_filters: BTreeMap<String, BTreeSet<String>>,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    pub selection: SelectionTracker,
    /// Zero-based page index into the visible records.
    pub page: usize,
    pub rows_per_page: Option<usize>,
}

impl ViewState {
    /// Initial state for a schema: its default sort, ascending.
    pub fn initial<T>(schema: &Schema<T>, options: &ViewOptions) -> Self {
        ViewState {
            sort_field: schema.default_sort().map(str::to_string),
            rows_per_page: options.rows_per_page,
            ..ViewState::default()
        }
    }

    /// Active values of one filter (empty if inactive).
    pub fn active_values(&self, filter_id: &str) -> impl Iterator<Item = &str> {
        self.active_filters
            .get(filter_id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filters.values().any(|set| !set.is_empty())
    }

    pub fn set_search_term(&mut self, term: &str, options: &ViewOptions) -> bool {
        if self.search_term == term {
            return false;
        }
        trace!("search term -> {:?}", term);
        self.search_term = term.to_string();
        self.query_changed(options);
        true
    }

    pub fn set_filter<T>(
        &mut self,
        schema: &Schema<T>,
        options: &ViewOptions,
        filter_id: &str,
        value: FilterValue,
    ) -> Result<bool, ConfigurationError> {
        if !check_filter(schema, options, filter_id)? {
            return Ok(false);
        }
        let values = value.into_set(clearing_sentinel(schema, options, filter_id));
        let changed = if values.is_empty() {
            self.active_filters.remove(filter_id).is_some_and(|old| !old.is_empty())
        } else {
            self.active_filters.insert(filter_id.to_string(), values.clone()) != Some(values)
        };
        if changed {
            trace!("filter {} -> {:?}", filter_id, self.active_filters.get(filter_id));
            self.query_changed(options);
        }
        Ok(changed)
    }

    /// Checkbox behaviour: add or remove one value from a filter's set.
    pub fn toggle_filter_option<T>(
        &mut self,
        schema: &Schema<T>,
        options: &ViewOptions,
        filter_id: &str,
        value: &str,
    ) -> Result<bool, ConfigurationError> {
        if !check_filter(schema, options, filter_id)? {
            return Ok(false);
        }
        if clearing_sentinel(schema, options, filter_id) == Some(value) {
            return self.set_filter(schema, options, filter_id, FilterValue::All);
        }
        let set = self.active_filters.entry(filter_id.to_string()).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        if set.is_empty() {
            self.active_filters.remove(filter_id);
        }
        self.query_changed(options);
        Ok(true)
    }

    pub fn clear_filters(&mut self, options: &ViewOptions) -> bool {
        if !self.has_active_filters() {
            self.active_filters.clear();
            return false;
        }
        self.active_filters.clear();
        self.query_changed(options);
        true
    }

    /// Column-header click: the current sort field flips direction, any
    /// other field becomes the sort field in ascending order.
    pub fn set_sort<T>(
        &mut self,
        schema: &Schema<T>,
        options: &ViewOptions,
        field: &str,
    ) -> Result<bool, ConfigurationError> {
        if let Err(err) = schema.sort_field(field) {
            return match options.unknown_field {
                UnknownFieldPolicy::Reject => Err(err),
                UnknownFieldPolicy::Ignore => {
                    warn!("ignoring sort request: {}", err);
                    Ok(false)
                }
            };
        }
        if self.sort_field.as_deref() == Some(field) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = Some(field.to_string());
            self.sort_direction = SortDirection::Asc;
        }
        trace!("sort -> {} {:?}", field, self.sort_direction);
        Ok(true)
    }

    pub fn clear_sort(&mut self) -> bool {
        let changed = self.sort_field.is_some();
        self.sort_field = None;
        self.sort_direction = SortDirection::Asc;
        changed
    }

    /// Check a restored state against a schema: every filter and the sort
    /// field must exist.
    pub fn validate<T>(&self, schema: &Schema<T>) -> Result<(), ConfigurationError> {
        for filter_id in self.active_filters.keys() {
            if schema.filter(filter_id).is_none() {
                return Err(ConfigurationError::UnknownFilter(filter_id.clone()));
            }
        }
        if let Some(field) = &self.sort_field {
            schema.sort_field(field)?;
        }
        Ok(())
    }

    fn query_changed(&mut self, options: &ViewOptions) {
        if options.reset_page_on_query_change {
            self.page = 0;
        }
    }
}

/// Ok(true) if the filter exists, Ok(false) if it does not and the policy
/// says to ignore it.
fn check_filter<T>(
    schema: &Schema<T>,
    options: &ViewOptions,
    filter_id: &str,
) -> Result<bool, ConfigurationError> {
    if schema.filter(filter_id).is_some() {
        return Ok(true);
    }
    match options.unknown_field {
        UnknownFieldPolicy::Reject => Err(ConfigurationError::UnknownFilter(filter_id.to_string())),
        UnknownFieldPolicy::Ignore => {
            warn!("ignoring unknown filter '{}'", filter_id);
            Ok(false)
        }
    }
}

/// The configured sentinel, unless this filter offers a real option with
/// the same value, in which case the option wins.
fn clearing_sentinel<'a, T>(
    schema: &Schema<T>,
    options: &'a ViewOptions,
    filter_id: &str,
) -> Option<&'a str> {
    let sentinel = options.all_sentinel.as_str();
    match schema.filter(filter_id) {
        Some(filter) if filter.find_option(sentinel).is_some() => None,
        _ => Some(sentinel),
    }
}
