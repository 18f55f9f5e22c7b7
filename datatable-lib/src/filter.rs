//! Column and global filtering.
//!
//! Filters are plain descriptors ([`ColumnFilter`], [`FilterState`]). The
//! engine compiles them against a [`ColumnSet`] into a [`FilterPlan`] and
//! returns the indices of the rows that pass, in input order.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::column::Column;
use crate::column::ColumnSet;
use crate::model::Row;
use crate::model::Value;

/// Predicate applied by a column filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Case-insensitive substring.
    #[default]
    Text,
    /// Case-insensitive exact match.
    Select,
    /// Same calendar day; falls back to `Text` when either side is not a date.
    Date,
    /// Numeric equality after parsing both sides as floats.
    Number,
}

impl FilterKind {
    /// Lowercase name used in serialized filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Text => "text",
            FilterKind::Select => "select",
            FilterKind::Date => "date",
            FilterKind::Number => "number",
        }
    }
}

/// Unrecognised kinds parse as `Text`.
impl FromStr for FilterKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "select" => FilterKind::Select,
            "date" => FilterKind::Date,
            "number" => FilterKind::Number,
            _ => FilterKind::Text,
        })
    }
}

impl<'de> Deserialize<'de> for FilterKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse::<FilterKind>().unwrap_or_default())
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter on a single column.
///
/// An empty (or whitespace-only) value places no constraint. When `kind` is
/// `None` the column's own filter kind applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub value: String,
    #[serde(default)]
    pub kind: Option<FilterKind>,
}

impl ColumnFilter {
    /// Creates a filter that uses the column's filter kind.
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            kind: None,
        }
    }

    /// Creates a filter with an explicit kind.
    pub fn with_kind(
        column: impl Into<String>,
        value: impl Into<String>,
        kind: FilterKind,
    ) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            kind: Some(kind),
        }
    }

    /// Returns `true` if this filter constrains anything.
    pub fn is_active(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// The complete filter descriptor: per-column filters (ANDed) plus a global
/// search string.
///
/// # Example
///
/// ```
/// use datatable_lib::{ColumnFilter, FilterState};
///
/// let state = FilterState::new()
///     .with_column(ColumnFilter::new("category", "ring"))
///     .with_global("gold");
///
/// // Editing a filter produces a new descriptor.
/// let cleared = state.set_column("category", "");
/// assert!(cleared.columns().is_empty());
/// assert_eq!(cleared.global(), "gold");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    columns: Vec<ColumnFilter>,
    #[serde(default)]
    global: String,
}

impl FilterState {
    /// No column filters and an empty global search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column filter (builder pattern).
    pub fn with_column(mut self, filter: ColumnFilter) -> Self {
        self.columns.push(filter);
        self
    }

    /// Sets the global search string (builder pattern).
    pub fn with_global(mut self, global: impl Into<String>) -> Self {
        self.global = global.into();
        self
    }

    /// Column filters in the order they were set.
    pub fn columns(&self) -> &[ColumnFilter] {
        &self.columns
    }

    /// The global search string, as typed.
    pub fn global(&self) -> &str {
        &self.global
    }

    /// Current filter value for a column.
    pub fn value_for(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    /// Returns a new descriptor with the column's value replaced. An empty
    /// value removes the column's filter.
    pub fn set_column(&self, column: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut next = self.clone();
        let existing = next.columns.iter().position(|f| f.column == column);

        match (existing, value.trim().is_empty()) {
            (Some(i), true) => {
                next.columns.remove(i);
            }
            (Some(i), false) => next.columns[i].value = value,
            (None, true) => {}
            (None, false) => next.columns.push(ColumnFilter::new(column, value)),
        }
        next
    }

    /// Returns a new descriptor with the global search replaced.
    pub fn set_global(&self, global: impl Into<String>) -> Self {
        Self {
            columns: self.columns.clone(),
            global: global.into(),
        }
    }

    /// Returns a new descriptor with every filter removed.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing would be filtered out.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && !self.columns.iter().any(ColumnFilter::is_active)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// A column filter compiled for repeated evaluation.
struct Compiled<'c, T> {
    column: &'c Column<T>,
    kind: FilterKind,
    needle: String,
    number: Option<f64>,
    date: Option<NaiveDate>,
}

/// Filters compiled against a column set.
pub struct FilterPlan<'c, T> {
    columns: &'c ColumnSet<T>,
    filters: Vec<Compiled<'c, T>>,
    global: Option<String>,
}

impl<'c, T: Row> FilterPlan<'c, T> {
    /// Compiles the descriptor. Filters naming unknown columns and filters
    /// with empty values are dropped.
    pub fn compile(columns: &'c ColumnSet<T>, state: &FilterState) -> Self {
        let mut filters = Vec::with_capacity(state.columns.len());
        for filter in state.columns.iter().filter(|f| f.is_active()) {
            let Some(column) = columns.get(&filter.column) else {
                log::debug!("[filter] ignoring filter on unknown column '{}'", filter.column);
                continue;
            };
            // Text predicates match the value as typed; number and date
            // parsing ignore surrounding whitespace.
            let needle = Value::from(filter.value.as_str());
            filters.push(Compiled {
                column,
                kind: filter.kind.unwrap_or(column.filter_kind),
                needle: filter.value.to_lowercase(),
                number: needle.as_f64(),
                date: needle.as_date(),
            });
        }

        Self {
            columns,
            filters,
            global: (!state.global.is_empty()).then(|| state.global.to_lowercase()),
        }
    }

    /// Returns `true` when no filter is active.
    pub fn is_identity(&self) -> bool {
        self.filters.is_empty() && self.global.is_none()
    }

    /// Returns `true` if the row passes every column filter and the global
    /// search.
    pub fn matches(&self, row: &T) -> bool {
        let columns_pass = self.filters.iter().all(|f| {
            let value = f.column.value(row);
            matches_value(f, value.as_ref())
        });
        columns_pass && self.matches_global(row)
    }

    fn matches_global(&self, row: &T) -> bool {
        let Some(needle) = &self.global else {
            return true;
        };
        self.columns.iter().any(|column| {
            column
                .value(row)
                .is_some_and(|v| v.to_string().to_lowercase().contains(needle.as_str()))
        })
    }

    /// Indices of passing rows, in input order.
    pub fn apply(&self, rows: &[T]) -> Vec<usize> {
        if self.is_identity() {
            return (0..rows.len()).collect();
        }
        let kept: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.matches(row))
            .map(|(i, _)| i)
            .collect();
        log::trace!("[filter] kept {} of {} rows", kept.len(), rows.len());
        kept
    }
}

fn matches_value<T>(filter: &Compiled<'_, T>, value: Option<&Value>) -> bool {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return false;
    };

    match filter.kind {
        FilterKind::Text => contains_text(value, &filter.needle),
        FilterKind::Select => value.to_string().to_lowercase() == filter.needle,
        FilterKind::Number => match (value.as_f64(), filter.number) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        FilterKind::Date => match (value.as_date(), filter.date) {
            (Some(a), Some(b)) => a == b,
            _ => contains_text(value, &filter.needle),
        },
    }
}

fn contains_text(value: &Value, needle: &str) -> bool {
    value.to_string().to_lowercase().contains(needle)
}

/// Indices of the rows that pass `state`, in input order.
pub fn filter_rows<T: Row>(
    rows: &[T],
    columns: &ColumnSet<T>,
    state: &FilterState,
) -> Vec<usize> {
    FilterPlan::compile(columns, state).apply(rows)
}
