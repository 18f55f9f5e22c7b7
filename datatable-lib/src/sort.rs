//! Multi-key stable sorting.

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::NaiveTime;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

use crate::column::Column;
use crate::column::ColumnSet;
use crate::model::Row;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9), nulls last.
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0), nulls first.
    Desc,
}

impl Direction {
    /// True for `Direction::Desc`.
    pub fn is_descending(self) -> bool {
        self == Direction::Desc
    }
}

/// One entry of a sort descriptor list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    #[serde(default)]
    pub direction: Direction,
}

impl SortKey {
    /// Ascending key on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending key on `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

/// Ordered sort descriptor list; the first key has the highest priority.
///
/// # Example
///
/// ```
/// use datatable_lib::{Direction, SortState};
///
/// let sort = SortState::desc("stock").then_asc("name");
/// assert_eq!(sort.indicator("name"), Some((1, Direction::Asc)));
///
/// // A header click produces the next descriptor list.
/// let next = sort.toggle("stock", false);
/// assert!(next.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    /// No sorting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts ascending on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            keys: vec![SortKey::asc(column)],
        }
    }

    /// Sorts descending on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            keys: vec![SortKey::desc(column)],
        }
    }

    /// Adds a lower-priority ascending key.
    pub fn then_asc(mut self, column: impl Into<String>) -> Self {
        self.keys.push(SortKey::asc(column));
        self
    }

    /// Adds a lower-priority descending key.
    pub fn then_desc(mut self, column: impl Into<String>) -> Self {
        self.keys.push(SortKey::desc(column));
        self
    }

    /// Keys in priority order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// True when no sort is applied.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Priority (0 = highest) and direction for a column, if sorted.
    pub fn indicator(&self, column: &str) -> Option<(usize, Direction)> {
        self.keys
            .iter()
            .position(|k| k.column == column)
            .map(|i| (i, self.keys[i].direction))
    }

    /// The descriptor list after a header click on `column`.
    ///
    /// Unsorted becomes ascending, ascending becomes descending, and
    /// descending is removed. Without `multi` the clicked column replaces
    /// every other key; with `multi` it is appended or edited in place.
    pub fn toggle(&self, column: &str, multi: bool) -> Self {
        let next_direction = match self.indicator(column) {
            None => Some(Direction::Asc),
            Some((_, Direction::Asc)) => Some(Direction::Desc),
            Some((_, Direction::Desc)) => None,
        };

        if !multi {
            return Self {
                keys: next_direction
                    .map(|direction| SortKey {
                        column: column.to_string(),
                        direction,
                    })
                    .into_iter()
                    .collect(),
            };
        }

        let mut keys = self.keys.clone();
        match (keys.iter().position(|k| k.column == column), next_direction) {
            (Some(i), Some(direction)) => keys[i].direction = direction,
            (Some(i), None) => {
                keys.remove(i);
            }
            (None, Some(direction)) => keys.push(SortKey {
                column: column.to_string(),
                direction,
            }),
            (None, None) => {}
        }
        Self { keys }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Compares two resolved values in ascending order.
///
/// Missing and null values sort after everything else. Present values are
/// ranked by class (numbers, booleans, dates, then text and anything else)
/// and compared within their class: numbers numerically across integer,
/// float and decimal, dates chronologically with a bare date taken as
/// midnight UTC, text case-folded with the raw string as tie-breaker.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

enum SortClass {
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    Text,
}

impl SortClass {
    fn of(value: &Value) -> Self {
        match value {
            Value::Int(n) => SortClass::Number(*n as f64),
            Value::Float(n) => SortClass::Number(*n),
            Value::Decimal(d) => SortClass::Number(d.to_f64().unwrap_or(f64::NAN)),
            Value::Bool(b) => SortClass::Bool(*b),
            Value::DateTime(dt) => SortClass::Date(*dt),
            Value::Date(d) => SortClass::Date(d.and_time(NaiveTime::MIN).and_utc()),
            _ => SortClass::Text,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortClass::Number(_) => 0,
            SortClass::Bool(_) => 1,
            SortClass::Date(_) => 2,
            SortClass::Text => 3,
        }
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (SortClass::of(a), SortClass::of(b)) {
        (SortClass::Number(x), SortClass::Number(y)) => x.total_cmp(&y),
        (SortClass::Bool(x), SortClass::Bool(y)) => x.cmp(&y),
        (SortClass::Date(x), SortClass::Date(y)) => x.cmp(&y),
        (SortClass::Text, SortClass::Text) => compare_text(&a.to_string(), &b.to_string()),
        (x, y) => x.rank().cmp(&y.rank()),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compares two values of a column whose present values all coerce to
/// numbers, numeric strings included.
fn compare_numeric(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let number = |v: Option<&Value>| {
        v.filter(|v| !v.is_null())
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
    };

    match (number(a), number(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

/// Returns `indices` reordered by `state`.
///
/// The sort is stable: rows that no key separates keep their input order.
/// Keys naming unknown columns are skipped. A key whose present values all
/// read as numbers sorts numerically even when some arrive as strings.
pub fn sort_indices<T: Row>(
    rows: &[T],
    indices: &[usize],
    columns: &ColumnSet<T>,
    state: &SortState,
) -> Vec<usize> {
    let keys: Vec<(&Column<T>, Direction)> = state
        .keys()
        .iter()
        .filter_map(|key| match columns.get(&key.column) {
            Some(column) => Some((column, key.direction)),
            None => {
                log::debug!("[sort] ignoring sort on unknown column '{}'", key.column);
                None
            }
        })
        .collect();

    if keys.is_empty() {
        return indices.to_vec();
    }

    // Resolve each sort value once per row.
    let mut entries: Vec<(usize, Vec<Option<Value>>)> = indices
        .iter()
        .filter_map(|&i| {
            let row = rows.get(i)?;
            Some((i, keys.iter().map(|(column, _)| column.value(row)).collect()))
        })
        .collect();

    let numeric: Vec<bool> = (0..keys.len())
        .map(|k| {
            entries.iter().all(|(_, values)| match &values[k] {
                Some(value) if !value.is_null() => value.as_f64().is_some(),
                _ => true,
            })
        })
        .collect();

    entries.sort_by(|(_, a), (_, b)| {
        keys.iter()
            .enumerate()
            .map(|(k, (_, direction))| {
                let ordering = if numeric[k] {
                    compare_numeric(a[k].as_ref(), b[k].as_ref())
                } else {
                    compare_values(a[k].as_ref(), b[k].as_ref())
                };
                if direction.is_descending() {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    log::trace!("[sort] sorted {} rows by {} keys", entries.len(), keys.len());
    entries.into_iter().map(|(i, _)| i).collect()
}

/// Returns references to `rows` ordered by `state`, leaving the input untouched.
pub fn sort_rows<'a, T: Row>(
    rows: &'a [T],
    columns: &ColumnSet<T>,
    state: &SortState,
) -> Vec<&'a T> {
    let all: Vec<usize> = (0..rows.len()).collect();
    sort_indices(rows, &all, columns, state)
        .into_iter()
        .map(|i| &rows[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    type Json = serde_json::Value;

    fn columns() -> ColumnSet<Json> {
        ColumnSet::new(vec![
            Column::new("id", "Id"),
            Column::new("v", "Value").sortable(),
            Column::new("w", "Weight").sortable(),
        ])
        .unwrap()
    }

    fn ids(rows: &[Json], order: &[usize]) -> Vec<i64> {
        order
            .iter()
            .map(|&i| rows[i]["id"].as_i64().unwrap_or(-1))
            .collect()
    }

    fn sorted(rows: &[Json], state: &SortState) -> Vec<i64> {
        let all: Vec<usize> = (0..rows.len()).collect();
        ids(rows, &sort_indices(rows, &all, &columns(), state))
    }

    #[test]
    fn test_empty_state_is_identity() {
        let rows = vec![json!({"id": 2}), json!({"id": 1})];
        assert_eq!(sorted(&rows, &SortState::new()), [2, 1]);
    }

    #[test]
    fn test_nulls_last_ascending_first_descending() {
        let rows = vec![
            json!({"id": 1, "v": 5}),
            json!({"id": 2, "v": null}),
            json!({"id": 3, "v": 2}),
            json!({"id": 4}),
        ];
        assert_eq!(sorted(&rows, &SortState::asc("v")), [3, 1, 2, 4]);
        assert_eq!(sorted(&rows, &SortState::desc("v")), [2, 4, 1, 3]);
    }

    #[test]
    fn test_multi_key_priority() {
        let rows = vec![
            json!({"id": 1, "v": "b", "w": 1}),
            json!({"id": 2, "v": "a", "w": 1}),
            json!({"id": 3, "v": "a", "w": 2}),
        ];
        let state = SortState::desc("w").then_asc("v");
        assert_eq!(sorted(&rows, &state), [3, 2, 1]);
    }

    #[test]
    fn test_strings_fold_case() {
        let rows = vec![
            json!({"id": 1, "v": "banana"}),
            json!({"id": 2, "v": "Apple"}),
            json!({"id": 3, "v": "apple"}),
        ];
        assert_eq!(sorted(&rows, &SortState::asc("v")), [2, 3, 1]);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let rows = vec![
            json!({"id": 1, "v": 10}),
            json!({"id": 2, "v": 9.5}),
            json!({"id": 3, "v": 100}),
        ];
        assert_eq!(sorted(&rows, &SortState::asc("v")), [2, 1, 3]);
    }

    #[test]
    fn test_mixed_classes_rank_numbers_first() {
        assert_eq!(
            compare_values(Some(&Value::from("10")), Some(&Value::Int(9))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&Value::Bool(true)), Some(&Value::from("a"))),
            Ordering::Less
        );
    }

    #[test]
    fn test_numeric_strings_sort_with_numbers() {
        let rows = vec![
            json!({"id": 1, "v": "100"}),
            json!({"id": 2, "v": 9}),
            json!({"id": 3, "v": " 50 "}),
            json!({"id": 4, "v": null}),
        ];
        assert_eq!(sorted(&rows, &SortState::asc("v")), [2, 3, 1, 4]);
    }

    #[test]
    fn test_word_in_column_falls_back_to_class_rank() {
        let rows = vec![
            json!({"id": 1, "v": "n/a"}),
            json!({"id": 2, "v": 100}),
            json!({"id": 3, "v": "50"}),
            json!({"id": 4, "v": 9}),
        ];
        assert_eq!(sorted(&rows, &SortState::asc("v")), [4, 2, 3, 1]);
    }

    #[test]
    fn test_date_compares_as_midnight_against_datetime() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let date = Value::Date(day);
        let nine = Value::DateTime(day.and_hms_opt(9, 0, 0).unwrap().and_utc());
        let midnight = Value::DateTime(day.and_time(NaiveTime::MIN).and_utc());

        assert_eq!(compare_values(Some(&date), Some(&nine)), Ordering::Less);
        assert_eq!(compare_values(Some(&date), Some(&midnight)), Ordering::Equal);
    }

    #[test]
    fn test_unknown_key_is_skipped() {
        let rows = vec![
            json!({"id": 1, "v": "b"}),
            json!({"id": 2, "v": "a"}),
        ];
        let state = SortState::asc("missing").then_asc("v");
        assert_eq!(sorted(&rows, &state), [2, 1]);
    }

    #[test]
    fn test_sort_rows_leaves_input_untouched() {
        let rows = vec![json!({"id": 1, "v": 3}), json!({"id": 2, "v": 1})];
        let before = rows.clone();
        let out = sort_rows(&rows, &columns(), &SortState::asc("v"));
        assert_eq!(out[0]["id"], 2);
        assert_eq!(rows, before);
    }

    #[test]
    fn test_toggle_cycles_single() {
        let s = SortState::new().toggle("v", false);
        assert_eq!(s, SortState::asc("v"));
        let s = s.toggle("v", false);
        assert_eq!(s, SortState::desc("v"));
        let s = s.toggle("v", false);
        assert!(s.is_empty());
    }

    #[test]
    fn test_toggle_single_replaces_other_keys() {
        let s = SortState::asc("v").then_desc("w").toggle("id", false);
        assert_eq!(s, SortState::asc("id"));
    }

    #[test]
    fn test_toggle_multi_appends_and_edits() {
        let s = SortState::asc("v").toggle("w", true);
        assert_eq!(s, SortState::asc("v").then_asc("w"));
        let s = s.toggle("v", true);
        assert_eq!(s, SortState::desc("v").then_asc("w"));
        let s = s.toggle("v", true);
        assert_eq!(s, SortState::asc("w"));
    }
}
