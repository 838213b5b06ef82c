//! Search and filter evaluation.
//!
//! A record is visible when it matches the search term AND every active
//! filter. Within one filter the active options are OR-ed.
//!
//! `Predicate::compile` does the per-view work once (case folding the term,
//! resolving option values to options) so the per-record test is just
//! field resolution and substring checks.

use crate::accessor::FieldSpec;
use crate::schema::{FilterOption, FilterSpec, Schema};
use crate::state::ViewState;
use log::warn;

/// Free-text search over the given fields.
///
/// `folded_term` must already be lower-cased. An empty term matches every
/// record.
pub fn matches_search<T>(record: &T, folded_term: &str, fields: &[&FieldSpec<T>]) -> bool {
    if folded_term.is_empty() {
        return true;
    }
    fields.iter().any(|field| {
        field
            .resolve(record)
            .search_text()
            .is_some_and(|text| text.to_lowercase().contains(folded_term))
    })
}

/// One active filter with its active values resolved to options.
struct ActiveFilter<'a, T> {
    id: &'a str,
    options: Vec<&'a FilterOption<T>>,
}

pub struct Predicate<'a, T> {
    folded_term: String,
    search_fields: Vec<&'a FieldSpec<T>>,
    filters: Vec<ActiveFilter<'a, T>>,
}

impl<'a, T> Predicate<'a, T> {
    pub fn compile(schema: &'a Schema<T>, state: &ViewState) -> Self {
        let mut filters = Vec::new();

        for (filter_id, values) in &state.active_filters {
            if values.is_empty() {
                continue;
            }
            let Some(spec) = schema.filter(filter_id) else {
                warn!("active filter '{}' is not in the schema; ignoring it", filter_id);
                continue;
            };
            if let Some(options) = resolve_options(spec, values.iter().map(String::as_str)) {
                filters.push(ActiveFilter {
                    id: spec.id(),
                    options,
                });
            }
        }

        Predicate {
            folded_term: state.search_term.to_lowercase(),
            search_fields: schema.searchable_fields().collect(),
            filters,
        }
    }

    /// True if nothing would be filtered out.
    pub fn is_trivial(&self) -> bool {
        self.folded_term.is_empty() && self.filters.is_empty()
    }

    /// Ids of the filters that actually constrain the view.
    pub fn constraining_filters(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.id).collect()
    }

    pub fn matches(&self, record: &T) -> bool {
        matches_search(record, &self.folded_term, &self.search_fields)
            && self
                .filters
                .iter()
                .all(|filter| filter.options.iter().any(|option| option.matches(record)))
    }
}

/// Resolve active values to options. `None` means the filter is trivially
/// satisfied: a value that names no option passes everything (fail-open),
/// and since options are OR-ed that makes the whole filter pass.
fn resolve_options<'a, 'v, T>(
    spec: &'a FilterSpec<T>,
    values: impl Iterator<Item = &'v str>,
) -> Option<Vec<&'a FilterOption<T>>> {
    let mut options = Vec::new();
    for value in values {
        match spec.find_option(value) {
            Some(option) => options.push(option),
            None => {
                warn!(
                    "filter '{}' has no option '{}'; treating the filter as satisfied",
                    spec.id(),
                    value
                );
                return None;
            }
        }
    }
    if options.is_empty() {
        None
    } else {
        Some(options)
    }
}

/// Stand-alone check of one record against a schema and state.
pub fn matches<T>(record: &T, schema: &Schema<T>, state: &ViewState) -> bool {
    Predicate::compile(schema, state).matches(record)
}
