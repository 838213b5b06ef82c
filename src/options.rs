//! Engine configuration.
//!
//! Options are plain serde data so a host can ship them alongside the
//! schema (for example as part of a screen definition in JSON).
//!
//! ```
//! use datagrid::{UnknownFieldPolicy, ViewOptions};
//!
//! let options =
//!     ViewOptions::from_json(r#"{ "unknown_field": "ignore", "rows_per_page": 25 }"#).unwrap();
//! assert_eq!(options.unknown_field, UnknownFieldPolicy::Ignore);
//! assert_eq!(options.rows_per_page, Some(25));
//! assert_eq!(options.all_sentinel, "all");
//! ```

use serde::{Deserialize, Serialize};

/// Value that clears a filter in single-select screens.
pub const ALL: &str = "all";

/// What to do when a transition names a sort field or filter the schema
/// does not define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Return a `ConfigurationError`.
    #[default]
    Reject,
    /// Log a warning and leave the view unchanged.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub unknown_field: UnknownFieldPolicy,
    /// Filter value meaning "no constraint".
    pub all_sentinel: String,
    /// Initial page size; `None` shows every visible record on one page.
    pub rows_per_page: Option<usize>,
    /// Jump back to the first page when the search term or filters change.
    pub reset_page_on_query_change: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            unknown_field: UnknownFieldPolicy::Reject,
            all_sentinel: ALL.to_string(),
            rows_per_page: None,
            reset_page_on_query_change: true,
        }
    }
}

impl ViewOptions {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn with_unknown_field(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_field = policy;
        self
    }

    pub fn with_rows_per_page(mut self, rows: usize) -> Self {
        self.rows_per_page = Some(rows);
        self
    }

    pub fn with_all_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.all_sentinel = sentinel.into();
        self
    }
}
