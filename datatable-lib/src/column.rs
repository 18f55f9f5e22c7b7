//! Column descriptors and the validated column set.

use std::collections::HashSet;
use std::fmt;

use crate::accessor::Accessor;
use crate::error::ColumnError;
use crate::filter::FilterKind;
use crate::model::Row;
use crate::model::Value;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// One entry of an enumerated filter (`select` columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    /// Creates a select choice.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Column configuration.
///
/// Columns define how a value is read from a row and how it may be sorted,
/// filtered and displayed.
///
/// # Examples
///
/// ```
/// use datatable_lib::{Alignment, Column, FilterKind};
/// use datatable_lib::model::Record;
///
/// let columns: Vec<Column<Record>> = vec![
///     Column::new("name", "Product").sortable().filterable(FilterKind::Text),
///     Column::new("stock", "Stock").sortable().align(Alignment::Right),
///     Column::new("karat", "Karat").path("meta.karat"),
/// ];
/// ```
pub struct Column<T> {
    /// Unique column identifier
    pub id: String,
    /// Column header text
    pub header: String,
    /// Value resolution strategy
    pub accessor: Accessor<T>,
    /// Whether header clicks sort by this column
    pub sortable: bool,
    /// Whether the column offers a filter input
    pub filterable: bool,
    /// Predicate used by filters on this column
    pub filter_kind: FilterKind,
    /// Choices for `select` filters
    pub filter_options: Vec<FilterOption>,
    /// Display width in pixels
    pub width: Option<u16>,
    /// Horizontal alignment
    pub align: Alignment,
    /// Pinned while scrolling horizontally
    pub sticky: bool,
    /// Excluded from headers, cells and cards
    pub hidden: bool,
}

impl<T> Column<T> {
    /// Create a column reading the row key equal to `id`.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: Accessor::Key(id.clone()),
            id,
            header: header.into(),
            sortable: false,
            filterable: false,
            filter_kind: FilterKind::Text,
            filter_options: Vec::new(),
            width: None,
            align: Alignment::Left,
            sticky: false,
            hidden: false,
        }
    }

    /// Read a different row key than the column id.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.accessor = Accessor::Key(key.into());
        self
    }

    /// Read a dot-separated nested path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.accessor = Accessor::Path(path.into());
        self
    }

    /// Compute the value with a custom function.
    pub fn accessor_fn(mut self, f: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        self.accessor = Accessor::func(f);
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column filterable with the given predicate kind.
    pub fn filterable(mut self, kind: FilterKind) -> Self {
        self.filterable = true;
        self.filter_kind = kind;
        self
    }

    /// Offer enumerated filter choices; implies a `select` filter.
    pub fn options(mut self, options: impl IntoIterator<Item = FilterOption>) -> Self {
        self.filterable = true;
        self.filter_kind = FilterKind::Select;
        self.filter_options = options.into_iter().collect();
        self
    }

    /// Set the display width in pixels.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Pin the column.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Hide the column from rendering. Hidden columns still take part in
    /// filtering and sorting.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            filter_kind: self.filter_kind,
            filter_options: self.filter_options.clone(),
            width: self.width,
            align: self.align,
            sticky: self.sticky,
            hidden: self.hidden,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("sortable", &self.sortable)
            .field("filter_kind", &self.filter_kind)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl<T: Row> Column<T> {
    /// Resolve this column's value for a row.
    pub fn value(&self, row: &T) -> Option<Value> {
        self.accessor.resolve(row)
    }
}

/// An ordered set of columns with unique ids.
pub struct ColumnSet<T> {
    columns: Vec<Column<T>>,
}

impl<T> Clone for ColumnSet<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<T> ColumnSet<T> {
    /// Validates and wraps the columns.
    pub fn new(columns: Vec<Column<T>>) -> Result<Self, ColumnError> {
        validate_ids(&columns)?;
        Ok(Self { columns })
    }

    /// Find a column by id.
    pub fn get(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Position of a column by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// All columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter()
    }

    /// Columns that are rendered (not hidden).
    pub fn visible(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Number of columns, hidden ones included.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no columns were given.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn validate_ids<T>(columns: &[Column<T>]) -> Result<(), ColumnError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for (position, column) in columns.iter().enumerate() {
        if column.id.is_empty() {
            return Err(ColumnError::empty(position));
        }
        if !seen.insert(column.id.as_str()) {
            return Err(ColumnError::duplicate(&column.id));
        }
    }
    Ok(())
}

impl<T> Default for ColumnSet<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}
