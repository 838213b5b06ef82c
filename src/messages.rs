//! Message types for hosts that drive a view across a serialization boundary
//! (a webview, a worker, a test harness replaying recorded input).
use crate::error::Result;
use crate::state::{FilterValue, SortDirection, ViewState};
use crate::value::RecordId;
use crate::view::ViewComposer;
use log::debug;
use serde::{Deserialize, Serialize};

/// User input, one variant per transition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ViewMessage {
    SearchChanged { term: String },

    /// Single- or multi-select filter change. The sentinel (`"all"`) clears
    /// unless the filter has an option with that value.
    FilterChanged { filter: String, value: FilterValue },

    /// A checkbox in a multi-select filter was flipped
    FilterOptionToggled { filter: String, value: String },

    FiltersCleared,

    /// A column header was clicked
    SortToggled { field: String },

    SortCleared,

    SelectToggled { id: RecordId },

    SelectAllToggled,

    SelectionCleared,

    BulkAction { action: String },

    RowAction { action: String, id: RecordId },

    PageChanged { page: usize },

    RowsPerPageChanged { rows: Option<usize> },
}

/// One column header as the presentation layer draws it.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnHeader<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub sortable: bool,
    /// Present only on the current sort column.
    pub sorted: Option<SortDirection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterChoice<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterControl<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub options: Vec<FilterChoice<'a>>,
}

/// Everything needed to render the current page.
#[derive(Debug, Serialize)]
pub struct ViewSnapshot<'a, T> {
    pub columns: Vec<ColumnHeader<'a>>,
    pub filters: Vec<FilterControl<'a>>,
    pub rows: Vec<&'a T>,
    pub total: usize,
    pub visible: usize,
    pub page: usize,
    pub page_count: usize,
    pub all_selected: bool,
    pub some_selected: bool,
    pub state: &'a ViewState,
}

impl<T> ViewComposer<T> {
    /// Apply one message. Errors leave the state as it was.
    pub fn apply(&mut self, message: ViewMessage) -> Result<()> {
        match message {
            ViewMessage::SearchChanged { term } => self.set_search_term(&term),
            ViewMessage::FilterChanged { filter, value } => self.set_filter(&filter, value)?,
            ViewMessage::FilterOptionToggled { filter, value } => {
                self.toggle_filter_option(&filter, &value)?
            }
            ViewMessage::FiltersCleared => self.clear_filters(),
            ViewMessage::SortToggled { field } => self.set_sort(&field)?,
            ViewMessage::SortCleared => self.clear_sort(),
            ViewMessage::SelectToggled { id } => self.toggle_select(id),
            ViewMessage::SelectAllToggled => self.toggle_select_all(),
            ViewMessage::SelectionCleared => self.clear_selection(),
            ViewMessage::BulkAction { action } => {
                let count = self.dispatch_bulk_action(&action)?;
                debug!("message: bulk action '{}' handled {} record(s)", action, count);
            }
            ViewMessage::RowAction { action, id } => self.dispatch_row_action(&action, &id)?,
            ViewMessage::PageChanged { page } => self.set_page(page),
            ViewMessage::RowsPerPageChanged { rows } => self.set_rows_per_page(rows),
        }
        Ok(())
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_, T> {
        let state = self.state();
        let columns = self
            .schema()
            .fields()
            .iter()
            .map(|field| ColumnHeader {
                id: field.id(),
                label: field.display_label(),
                sortable: field.is_sortable(),
                sorted: (state.sort_field.as_deref() == Some(field.id()))
                    .then_some(state.sort_direction),
            })
            .collect();
        let filters = self
            .schema()
            .filters()
            .iter()
            .map(|filter| {
                let active = state.active_filters.get(filter.id());
                FilterControl {
                    id: filter.id(),
                    label: filter.label(),
                    options: filter
                        .options()
                        .iter()
                        .map(|option| FilterChoice {
                            label: option.label(),
                            value: option.value(),
                            active: active.is_some_and(|set| set.contains(option.value())),
                        })
                        .collect(),
                }
            })
            .collect();

        ViewSnapshot {
            columns,
            filters,
            rows: self.page_records(),
            total: self.records().len(),
            visible: self.visible_len(),
            page: state.page,
            page_count: self.page_count(),
            all_selected: self.all_visible_selected(),
            some_selected: self.some_visible_selected(),
            state,
        }
    }
}
