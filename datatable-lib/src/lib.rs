//! Table state engine
//!
//! Turns a row collection plus sort, filter, pagination and selection
//! descriptors into a render-ready view model. The engine is pure data: it
//! never mutates rows or descriptors, and interactions report the next
//! descriptor through callbacks.
//!
//! ```
//! use datatable_lib::Column;
//! use datatable_lib::ColumnSet;
//! use datatable_lib::FilterKind;
//! use datatable_lib::FilterState;
//! use datatable_lib::SortState;
//! use datatable_lib::filter_rows;
//! use datatable_lib::sort_indices;
//! use serde_json::json;
//!
//! let columns = ColumnSet::new(vec![
//!     Column::new("name", "Product").sortable().filterable(FilterKind::Text),
//!     Column::new("stock", "Stock").sortable().filterable(FilterKind::Number),
//! ])
//! .unwrap();
//!
//! let rows = vec![
//!     json!({"name": "Gold Chain", "stock": 5}),
//!     json!({"name": "Silver Bracelet", "stock": 15}),
//!     json!({"name": "Gold Ring", "stock": 2}),
//! ];
//!
//! let kept = filter_rows(&rows, &columns, &FilterState::new().with_global("gold"));
//! let order = sort_indices(&rows, &kept, &columns, &SortState::asc("stock"));
//! assert_eq!(order, [2, 0]);
//! ```

pub mod accessor;
pub mod column;
pub mod config;
pub mod error;
pub mod filter;
pub mod layout;
pub mod model;
pub mod pagination;
pub mod render;
pub mod selection;
pub mod sort;
pub mod table;

pub use accessor::Accessor;
pub use column::Alignment;
pub use column::Column;
pub use column::ColumnSet;
pub use column::FilterOption;
pub use config::TableConfig;
pub use error::ColumnError;
pub use error::PaginationError;
pub use error::TableError;
pub use filter::ColumnFilter;
pub use filter::FilterKind;
pub use filter::FilterState;
pub use filter::filter_rows;
pub use layout::LayoutMode;
pub use layout::ResizeEvents;
pub use layout::ViewportTracker;
pub use pagination::NavButton;
pub use pagination::Pagination;
pub use pagination::PaginationMode;
pub use render::ActionKind;
pub use render::RowAction;
pub use render::TableView;
pub use selection::Selection;
pub use selection::SelectionMode;
pub use sort::Direction;
pub use sort::SortKey;
pub use sort::SortState;
pub use sort::sort_indices;
pub use sort::sort_rows;
pub use table::Callbacks;
pub use table::DataTable;
pub use table::EventResult;
pub use table::Processed;
pub use table::TableState;
pub use table::UiFlags;
