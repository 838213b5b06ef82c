//! The view composer.
//!
//! `ViewComposer` owns a base record collection, the schema that describes
//! it and the user's `ViewState`. Every transition re-derives the visible
//! sequence from scratch: filter the base collection with the compiled
//! predicate, then stable-sort the survivors. There is no incremental
//! maintenance.

use crate::error::{ConfigurationError, EngineError, Result};
use crate::options::ViewOptions;
use crate::predicate::Predicate;
use crate::repository::ResourceRepository;
use crate::schema::Schema;
use crate::sort::sort_indices;
use crate::state::{FilterValue, ViewState};
use crate::value::RecordId;
use log::{debug, trace, warn};
use std::collections::HashSet;
use std::fmt;

/// A searchable, filterable, sortable, selectable view over `Vec<T>`.
///
/// # Examples
///
/// ```
/// use datagrid::{FieldSpec, FilterSpec, RecordId, Schema, ViewComposer};
/// use serde_json::{json, Value as Json};
///
/// let schema = Schema::builder(|r: &Json| RecordId::from(r["id"].as_i64().unwrap_or_default()))
///     .field(FieldSpec::new("name").searchable().sortable())
///     .filter(FilterSpec::from_values("status", "Status", "status", ["Active", "Inactive"]))
///     .build()
///     .unwrap();
///
/// let mut view = ViewComposer::new(schema, vec![
///     json!({"id": 1, "name": "John Doe", "status": "Active"}),
///     json!({"id": 2, "name": "Jane Smith", "status": "Inactive"}),
///     json!({"id": 3, "name": "Al Doe", "status": "Active"}),
/// ]);
///
/// view.set_search_term("doe");
/// view.set_sort("name").unwrap();
/// let names: Vec<&str> = view
///     .visible_records()
///     .iter()
///     .map(|r| r["name"].as_str().unwrap())
///     .collect();
/// assert_eq!(names, vec!["Al Doe", "John Doe"]);
///
/// view.toggle_select_all();
/// assert_eq!(view.selected_records().len(), 2);
/// ```
pub struct ViewComposer<T> {
    schema: Schema<T>,
    options: ViewOptions,
    records: Vec<T>,
    state: ViewState,
    /// Positions in `records`, in display order.
    visible: Vec<usize>,
}

impl<T> ViewComposer<T> {
    pub fn new(schema: Schema<T>, records: Vec<T>) -> Self {
        let options = ViewOptions::default();
        let state = ViewState::initial(&schema, &options);
        let mut view = ViewComposer {
            schema,
            options,
            records,
            state,
            visible: Vec::new(),
        };
        view.recompute();
        view
    }

    /// Like `new`, with explicit options. Fails on an empty sentinel.
    ///
    /// A filter that offers an option equal to the sentinel keeps that
    /// option; the sentinel does not clear that filter.
    pub fn with_options(
        schema: Schema<T>,
        records: Vec<T>,
        options: ViewOptions,
    ) -> std::result::Result<Self, ConfigurationError> {
        if options.all_sentinel.is_empty() {
            return Err(ConfigurationError::EmptyIdentifier("all_sentinel"));
        }
        if let Some(filter) = schema.filter_with_option(&options.all_sentinel) {
            debug!(
                "filter '{}' has an option '{}'; the sentinel does not clear it",
                filter, options.all_sentinel
            );
        }
        let state = ViewState::initial(&schema, &options);
        let mut view = ViewComposer {
            schema,
            options,
            records,
            state,
            visible: Vec::new(),
        };
        view.recompute();
        Ok(view)
    }

    /// Restore a previously saved state. Selection is pruned to records
    /// that still exist.
    pub fn with_state(mut self, state: ViewState) -> std::result::Result<Self, ConfigurationError> {
        state.validate(&self.schema)?;
        self.state = state;
        self.prune_selection();
        self.recompute();
        Ok(self)
    }

    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    /// The whole base collection, in its original order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    pub fn record(&self, id: &RecordId) -> Option<&T> {
        self.position(id).map(|i| &self.records[i])
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| &self.schema.id_of(r) == id)
    }

    // ------------------------------------------------------------------
    // Base collection
    // ------------------------------------------------------------------

    /// Swap in a new base collection. Search, filters and sort are kept;
    /// selected ids that no longer exist are dropped.
    pub fn replace_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.prune_selection();
        self.recompute();
    }

    /// Replace the record with the same id, or append it.
    pub fn upsert_record(&mut self, record: T) {
        let id = self.schema.id_of(&record);
        match self.position(&id) {
            Some(pos) => self.records[pos] = record,
            None => self.records.push(record),
        }
        self.recompute();
    }

    pub fn remove_record(&mut self, id: &RecordId) -> Option<T> {
        let pos = self.position(id)?;
        let removed = self.records.remove(pos);
        self.state.selection.retain(|selected| selected != id);
        self.recompute();
        Some(removed)
    }

    fn prune_selection(&mut self) {
        if self.state.selection.is_empty() {
            return;
        }
        let live: HashSet<RecordId> = self.records.iter().map(|r| self.schema.id_of(r)).collect();
        let removed = self.state.selection.retain(|id| live.contains(id));
        if removed > 0 {
            debug!("dropped {} selected id(s) no longer in the dataset", removed);
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    pub fn set_search_term(&mut self, term: &str) {
        if self.state.set_search_term(term, &self.options) {
            self.recompute();
        }
    }

    /// Replace one filter's active value(s). The sentinel (`"all"` by
    /// default) clears the filter unless the filter has an option with that
    /// value.
    pub fn set_filter(&mut self, filter_id: &str, value: impl Into<FilterValue>) -> Result<()> {
        if self
            .state
            .set_filter(&self.schema, &self.options, filter_id, value.into())?
        {
            self.recompute();
        }
        Ok(())
    }

    pub fn toggle_filter_option(&mut self, filter_id: &str, value: &str) -> Result<()> {
        if self
            .state
            .toggle_filter_option(&self.schema, &self.options, filter_id, value)?
        {
            self.recompute();
        }
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        if self.state.clear_filters(&self.options) {
            self.recompute();
        }
    }

    /// Sort by `field`, or flip the direction if it is already the sort
    /// field.
    pub fn set_sort(&mut self, field: &str) -> Result<()> {
        if self.state.set_sort(&self.schema, &self.options, field)? {
            self.recompute();
        }
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        if self.state.clear_sort() {
            self.recompute();
        }
    }

    /// Flip one record's selection. Ids not in the collection are ignored.
    pub fn toggle_select(&mut self, id: impl Into<RecordId>) {
        let id = id.into();
        if self.position(&id).is_none() {
            trace!("select {} ignored: no such record", id);
            return;
        }
        let selected = self.state.selection.toggle(id.clone());
        trace!("select {} -> {}", id, selected);
    }

    /// Select every visible record, or clear the selection if all of them
    /// are already selected.
    pub fn toggle_select_all(&mut self) {
        let visible = self.visible_ids();
        self.state.selection.toggle_all(&visible);
        trace!(
            "select all over {} visible -> {} selected",
            visible.len(),
            self.state.selection.len()
        );
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.page = page;
        self.clamp_page();
    }

    /// `None` (or `Some(0)`) shows everything on one page.
    pub fn set_rows_per_page(&mut self, rows: Option<usize>) {
        self.state.rows_per_page = rows.filter(|&n| n > 0);
        self.state.page = 0;
    }

    /// Run a bulk action on the current selection.
    ///
    /// The action only receives records; it must not call back into this
    /// composer. Apply any resulting dataset change afterwards. Returns the
    /// number of records passed; with nothing selected the action is not
    /// invoked.
    pub fn dispatch_bulk_action(&self, action_id: &str) -> Result<usize> {
        let action = self
            .schema
            .bulk_action(action_id)
            .ok_or_else(|| ConfigurationError::UnknownAction(action_id.to_string()))?;
        let selected = self.selected_records();
        if selected.is_empty() {
            debug!("bulk action '{}' skipped: nothing selected", action_id);
            return Ok(0);
        }
        debug!("bulk action '{}' on {} record(s)", action_id, selected.len());
        action.invoke(&selected);
        Ok(selected.len())
    }

    pub fn dispatch_row_action(&self, action_id: &str, id: &RecordId) -> Result<()> {
        let action = self
            .schema
            .row_action(action_id)
            .ok_or_else(|| ConfigurationError::UnknownAction(action_id.to_string()))?;
        let record = self
            .record(id)
            .ok_or_else(|| EngineError::UnknownRecord(id.clone()))?;
        action.invoke(&[record]);
        Ok(())
    }

    /// Re-derive the visible sequence from the base collection.
    pub fn refresh(&mut self) {
        self.recompute();
    }

    fn recompute(&mut self) {
        let predicate = Predicate::compile(&self.schema, &self.state);
        let mut visible: Vec<usize> = if predicate.is_trivial() {
            (0..self.records.len()).collect()
        } else {
            self.records
                .iter()
                .enumerate()
                .filter(|(_, r)| predicate.matches(r))
                .map(|(i, _)| i)
                .collect()
        };

        if let Some(field_id) = &self.state.sort_field {
            match self.schema.field(field_id) {
                Some(field) => {
                    sort_indices(&self.records, &mut visible, field, self.state.sort_direction)
                }
                None => warn!(
                    "sort field '{}' is not in the schema; keeping input order",
                    field_id
                ),
            }
        }

        debug!(
            "view recomputed: {} of {} record(s) visible, sort {:?} {:?}",
            visible.len(),
            self.records.len(),
            self.state.sort_field,
            self.state.sort_direction
        );
        self.visible = visible;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.state.page > last {
            self.state.page = last;
        }
    }

    // ------------------------------------------------------------------
    // Derived view
    // ------------------------------------------------------------------

    pub fn visible_records(&self) -> Vec<&T> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible
            .iter()
            .map(|&i| self.schema.id_of(&self.records[i]))
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Selected records in base-collection order. Selected records hidden
    /// by the current search or filters are included.
    pub fn selected_records(&self) -> Vec<&T> {
        if self.state.selection.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| self.state.selection.is_selected(&self.schema.id_of(r)))
            .collect()
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.state.selection.is_selected(id)
    }

    /// Header checkbox: checked.
    pub fn all_visible_selected(&self) -> bool {
        !self.visible.is_empty() && self.state.selection.all_selected(&self.visible_ids())
    }

    /// Header checkbox: indeterminate.
    pub fn some_visible_selected(&self) -> bool {
        let ids = self.visible_ids();
        self.state.selection.any_selected(&ids) && !self.state.selection.all_selected(&ids)
    }

    /// Always at least 1, even when nothing is visible.
    pub fn page_count(&self) -> usize {
        match self.state.rows_per_page {
            Some(rows) if rows > 0 => self.visible.len().div_ceil(rows).max(1),
            _ => 1,
        }
    }

    /// The visible records on the current page.
    pub fn page_records(&self) -> Vec<&T> {
        let (start, end) = match self.state.rows_per_page {
            Some(rows) if rows > 0 => {
                let start = (self.state.page * rows).min(self.visible.len());
                (start, (start + rows).min(self.visible.len()))
            }
            _ => (0, self.visible.len()),
        };
        self.visible[start..end]
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    // ------------------------------------------------------------------
    // Repository-backed changes
    // ------------------------------------------------------------------

    /// Replace the base collection with the repository's listing.
    pub fn load<R>(&mut self, repo: &R) -> Result<usize>
    where
        R: ResourceRepository<T>,
    {
        let records = repo
            .list()
            .map_err(|e| EngineError::collaborator("list", e))?;
        self.replace_records(records);
        Ok(self.records.len())
    }

    /// Create through the repository, then add the confirmed record.
    pub fn create<R>(&mut self, repo: &R, draft: R::Draft) -> Result<RecordId>
    where
        R: ResourceRepository<T>,
    {
        let record = repo
            .create(draft)
            .map_err(|e| EngineError::collaborator("create", e))?;
        let id = self.schema.id_of(&record);
        self.upsert_record(record);
        Ok(id)
    }

    /// Update through the repository, then replace the record with the
    /// confirmed version.
    pub fn update<R>(&mut self, repo: &R, record: T) -> Result<()>
    where
        R: ResourceRepository<T>,
    {
        let id = self.schema.id_of(&record);
        if self.position(&id).is_none() {
            return Err(EngineError::UnknownRecord(id));
        }
        let saved = repo
            .update(record)
            .map_err(|e| EngineError::collaborator("update", e))?;
        self.upsert_record(saved);
        Ok(())
    }

    /// Delete through the repository, then drop the record.
    pub fn delete<R>(&mut self, repo: &R, id: &RecordId) -> Result<T>
    where
        R: ResourceRepository<T>,
    {
        if self.position(id).is_none() {
            return Err(EngineError::UnknownRecord(id.clone()));
        }
        repo.delete(id)
            .map_err(|e| EngineError::collaborator("delete", e))?;
        self.remove_record(id)
            .ok_or_else(|| EngineError::UnknownRecord(id.clone()))
    }

    /// Delete optimistically: the record disappears from the view at once
    /// and comes back (with its selection) if the repository refuses.
    pub fn delete_optimistic<R>(&mut self, repo: &R, id: &RecordId) -> Result<()>
    where
        R: ResourceRepository<T>,
    {
        let pos = self
            .position(id)
            .ok_or_else(|| EngineError::UnknownRecord(id.clone()))?;
        let was_selected = self.is_selected(id);
        let removed = self.records.remove(pos);
        self.state.selection.retain(|selected| selected != id);
        self.recompute();

        if let Err(e) = repo.delete(id) {
            warn!("rolling back optimistic delete of {}", id);
            self.records.insert(pos, removed);
            if was_selected {
                self.state.selection.toggle(id.clone());
            }
            self.recompute();
            return Err(EngineError::collaborator("delete", e));
        }
        Ok(())
    }
}

impl<T: Clone> ViewComposer<T> {
    /// Update optimistically: the new version shows at once and the old
    /// one is restored if the repository refuses.
    pub fn update_optimistic<R>(&mut self, repo: &R, record: T) -> Result<()>
    where
        R: ResourceRepository<T>,
    {
        let id = self.schema.id_of(&record);
        let pos = self
            .position(&id)
            .ok_or_else(|| EngineError::UnknownRecord(id.clone()))?;
        let previous = std::mem::replace(&mut self.records[pos], record.clone());
        self.recompute();

        match repo.update(record) {
            Ok(saved) => {
                self.records[pos] = saved;
                self.recompute();
                Ok(())
            }
            Err(e) => {
                warn!("rolling back optimistic update of {}", id);
                self.records[pos] = previous;
                self.recompute();
                Err(EngineError::collaborator("update", e))
            }
        }
    }
}

impl<T> fmt::Debug for ViewComposer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewComposer")
            .field("schema", &self.schema)
            .field("records", &self.records.len())
            .field("visible", &self.visible.len())
            .field("state", &self.state)
            .finish()
    }
}
