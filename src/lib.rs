//! DataGrid - Schema-Driven Record Views
//!
//! One engine for every admin-style list screen: a screen describes its
//! records with a `Schema` (fields, filters, actions) and gets search,
//! multi-select filtering, type-aware stable sorting, id-based selection,
//! pagination and bulk actions from `ViewComposer`.

pub mod accessor;
pub mod bindings;
pub mod error;
pub mod messages;
pub mod options;
pub mod predicate;
pub mod repository;
pub mod schema;
pub mod selection;
pub mod sort;
pub mod state;
pub mod value;
pub mod view;

pub use accessor::{FieldSpec, Record};
pub use bindings::Handlers;
pub use error::{ConfigurationError, EngineError, Result};
pub use messages::{ColumnHeader, FilterChoice, FilterControl, ViewMessage, ViewSnapshot};
pub use options::{UnknownFieldPolicy, ViewOptions, ALL};
pub use predicate::Predicate;
pub use repository::{InMemoryRepository, RepositoryError, ResourceRepository};
pub use schema::{Action, FilterOption, FilterSpec, Schema, SchemaBuilder};
pub use selection::SelectionTracker;
pub use sort::{compare_values, sort_indices, SortKey};
pub use state::{FilterValue, SortDirection, ViewState};
pub use value::{RecordId, Value};
pub use view::ViewComposer;
