//! View model produced for the host UI.
//!
//! Nothing here draws. [`render`] turns processed rows into a [`TableView`]
//! that a toolkit walks to paint a grid or a list of cards.

use std::fmt;
use std::sync::Arc;

use crate::column::Alignment;
use crate::column::Column;
use crate::column::ColumnSet;
use crate::config::TableConfig;
use crate::layout::LayoutMode;
use crate::model::Row;
use crate::model::Value;
use crate::selection::Selection;
use crate::selection::SelectionMode;
use crate::sort::Direction;
use crate::sort::SortState;

/// Derives a stable id for a row from the row and its source index.
pub type RowIdFn<T> = Arc<dyn Fn(&T, usize) -> String + Send + Sync>;

/// Row id function that uses the row's position in the source slice.
pub fn index_row_id<T>() -> RowIdFn<T> {
    Arc::new(|_, index| index.to_string())
}

/// Row id function that reads a field and stringifies it.
///
/// Rows without the field fall back to their index.
pub fn field_row_id<T: Row>(field: impl Into<String>) -> RowIdFn<T> {
    let field = field.into();
    Arc::new(move |row, index| match row.field(&field) {
        Some(value) if !value.is_null() => value.to_string(),
        _ => index.to_string(),
    })
}

// =============================================================================
// Row actions
// =============================================================================

/// Built-in action flavours. Hosts pick icons and colours from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    View,
    Edit,
    Delete,
    Custom,
}

type ActionPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type ActionHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A per-row button such as "Edit" or "Delete".
pub struct RowAction<T> {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
    visible: Option<ActionPredicate<T>>,
    handler: ActionHandler<T>,
}

impl<T> RowAction<T> {
    /// Creates an action shown on every row.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ActionKind::Custom,
            visible: None,
            handler: Arc::new(handler),
        }
    }

    /// A `view` action.
    pub fn view(handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self::new("view", "View", handler).kind(ActionKind::View)
    }

    /// An `edit` action.
    pub fn edit(handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self::new("edit", "Edit", handler).kind(ActionKind::Edit)
    }

    /// A `delete` action, styled as destructive.
    pub fn delete(handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self::new("delete", "Delete", handler).kind(ActionKind::Delete)
    }

    /// Overrides the display style.
    pub fn kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Only offer the action for rows matching `predicate`.
    pub fn visible_when(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.visible = Some(Arc::new(predicate));
        self
    }

    /// Whether the action is shown for `row`.
    pub fn is_visible(&self, row: &T) -> bool {
        self.visible.as_ref().is_none_or(|predicate| predicate(row))
    }

    /// Runs the handler. Returns `false` when the action is hidden for `row`.
    pub fn invoke(&self, row: &T) -> bool {
        if !self.is_visible(row) {
            return false;
        }
        (self.handler)(row);
        true
    }

    fn button(&self) -> ActionButton {
        ActionButton {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind,
        }
    }
}

impl<T> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind,
            visible: self.visible.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("conditional", &self.visible.is_some())
            .finish()
    }
}

// =============================================================================
// View model
// =============================================================================

/// Sort marker shown next to a header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortIndicator {
    /// 0 for the primary key.
    pub priority: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub column_id: String,
    pub label: String,
    pub sortable: bool,
    pub filterable: bool,
    pub sort: Option<SortIndicator>,
    pub width: Option<u16>,
    pub align: Alignment,
    pub sticky: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column_id: String,
    /// Column header, used as the field label on cards.
    pub label: String,
    pub value: Option<Value>,
    pub text: String,
    pub align: Alignment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    /// Position in the caller's row slice.
    pub index: usize,
    pub selected: bool,
    pub striped: bool,
    pub cells: Vec<Cell>,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub index: usize,
    pub selected: bool,
    pub fields: Vec<Cell>,
    pub actions: Vec<ActionButton>,
}

/// Header checkbox state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectAllState {
    pub checked: bool,
    pub indeterminate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RowView>,
    /// Present only in multi-select mode.
    pub select_all: Option<SelectAllState>,
    pub bordered: bool,
    pub compact: bool,
}

/// What the host should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Loading,
    Empty { message: String },
    Table(TableLayout),
    Cards(Vec<Card>),
}

impl TableView {
    /// True for the empty-result view.
    pub fn is_empty(&self) -> bool {
        matches!(self, TableView::Empty { .. })
    }

    /// Ids of the rows or cards in display order.
    pub fn row_ids(&self) -> Vec<&str> {
        match self {
            TableView::Table(layout) => layout.rows.iter().map(|r| r.id.as_str()).collect(),
            TableView::Cards(cards) => cards.iter().map(|c| c.id.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Everything [`render`] reads.
pub struct RenderInput<'a, T> {
    pub rows: &'a [T],
    /// Indices into `rows` to display, in display order.
    pub order: &'a [usize],
    pub columns: &'a ColumnSet<T>,
    pub sort: &'a SortState,
    pub selection: &'a Selection,
    pub row_id: &'a RowIdFn<T>,
    pub actions: &'a [RowAction<T>],
    pub config: &'a TableConfig,
    pub mode: LayoutMode,
}

/// Builds the view model.
pub fn render<T: Row>(input: &RenderInput<'_, T>) -> TableView {
    if input.config.loading {
        return TableView::Loading;
    }
    if input.order.is_empty() {
        return TableView::Empty {
            message: input.config.empty_message.clone(),
        };
    }

    let visible: Vec<&Column<T>> = input.columns.visible().collect();
    let rows = input
        .order
        .iter()
        .filter_map(|&index| input.rows.get(index).map(|row| (index, row)));

    match input.mode {
        LayoutMode::Cards => {
            let cards = rows
                .map(|(index, row)| {
                    let id = (input.row_id)(row, index);
                    Card {
                        selected: input.selection.is_selected(&id),
                        id,
                        index,
                        fields: cells(&visible, row),
                        actions: buttons(input.actions, row),
                    }
                })
                .collect();
            TableView::Cards(cards)
        }
        LayoutMode::Table => {
            let rows: Vec<RowView> = rows
                .enumerate()
                .map(|(position, (index, row))| {
                    let id = (input.row_id)(row, index);
                    RowView {
                        selected: input.selection.is_selected(&id),
                        id,
                        index,
                        striped: input.config.striped && position % 2 == 1,
                        cells: cells(&visible, row),
                        actions: buttons(input.actions, row),
                    }
                })
                .collect();

            let select_all = (input.selection.mode == SelectionMode::Multi).then(|| {
                let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
                let summary = input.selection.summary(&ids);
                SelectAllState {
                    checked: summary.all,
                    indeterminate: summary.some,
                }
            });

            TableView::Table(TableLayout {
                headers: headers(&visible, input.sort),
                rows,
                select_all,
                bordered: input.config.bordered,
                compact: input.config.compact,
            })
        }
    }
}

fn headers<T>(columns: &[&Column<T>], sort: &SortState) -> Vec<HeaderCell> {
    columns
        .iter()
        .map(|column| HeaderCell {
            column_id: column.id.clone(),
            label: column.header.clone(),
            sortable: column.sortable,
            filterable: column.filterable,
            sort: sort
                .indicator(&column.id)
                .map(|(priority, direction)| SortIndicator {
                    priority,
                    direction,
                }),
            width: column.width,
            align: column.align,
            sticky: column.sticky,
        })
        .collect()
}

fn cells<T: Row>(columns: &[&Column<T>], row: &T) -> Vec<Cell> {
    columns
        .iter()
        .map(|column| {
            let value = column.value(row);
            Cell {
                column_id: column.id.clone(),
                label: column.header.clone(),
                text: value.as_ref().map(Value::to_string).unwrap_or_default(),
                value,
                align: column.align,
            }
        })
        .collect()
}

fn buttons<T>(actions: &[RowAction<T>], row: &T) -> Vec<ActionButton> {
    actions
        .iter()
        .filter(|action| action.is_visible(row))
        .map(RowAction::button)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;

    fn columns() -> ColumnSet<serde_json::Value> {
        ColumnSet::new(vec![
            Column::new("name", "Name").sortable(),
            Column::new("stock", "Stock").align(Alignment::Right),
            Column::new("sku", "SKU").hidden(),
        ])
        .unwrap()
    }

    fn rows() -> Vec<serde_json::Value> {
        vec![
            json!({"id": "a", "name": "Gold Chain", "stock": 5, "sku": "G-1"}),
            json!({"id": "b", "name": "Silver Ring", "stock": null, "sku": "S-1"}),
            json!({"id": "c", "name": "Pearl Set", "stock": 2, "sku": "P-1"}),
        ]
    }

    fn view_for(
        rows: &[serde_json::Value],
        order: &[usize],
        selection: &Selection,
        config: &TableConfig,
        mode: LayoutMode,
        actions: &[RowAction<serde_json::Value>],
    ) -> TableView {
        let columns = columns();
        let row_id = field_row_id("id");
        render(&RenderInput {
            rows,
            order,
            columns: &columns,
            sort: &SortState::desc("name"),
            selection,
            row_id: &row_id,
            actions,
            config,
            mode,
        })
    }

    #[test]
    fn test_table_headers_skip_hidden_columns() {
        let rows = rows();
        let view = view_for(
            &rows,
            &[0, 1],
            &Selection::multi(),
            &TableConfig::default(),
            LayoutMode::Table,
            &[],
        );
        let TableView::Table(layout) = view else {
            panic!("expected table view");
        };

        let ids: Vec<&str> = layout.headers.iter().map(|h| h.column_id.as_str()).collect();
        assert_eq!(ids, ["name", "stock"]);
        assert_eq!(
            layout.headers[0].sort,
            Some(SortIndicator {
                priority: 0,
                direction: Direction::Desc
            })
        );
        assert_eq!(layout.headers[1].sort, None);
        assert_eq!(layout.rows[1].cells[1].text, "");
        assert_eq!(layout.rows[1].cells[1].value, Some(Value::Null));
    }

    #[test]
    fn test_stripes_follow_display_position() {
        let rows = rows();
        let config = TableConfig::default().with_striped(true);
        let selection = Selection::multi();
        let view = view_for(&rows, &[2, 0, 1], &selection, &config, LayoutMode::Table, &[]);
        let TableView::Table(layout) = view else {
            panic!("expected table view");
        };
        let striped: Vec<bool> = layout.rows.iter().map(|r| r.striped).collect();
        assert_eq!(striped, [false, true, false]);
        assert_eq!(layout.rows[0].index, 2);
    }

    #[test]
    fn test_select_all_indeterminate() {
        let rows = rows();
        let selection = Selection::multi().with_selected(["a"]);
        let config = TableConfig::default();
        let view = view_for(&rows, &[0, 2], &selection, &config, LayoutMode::Table, &[]);
        let TableView::Table(layout) = view else {
            panic!("expected table view");
        };
        assert_eq!(
            layout.select_all,
            Some(SelectAllState {
                checked: false,
                indeterminate: true
            })
        );
        assert!(layout.rows[0].selected);
        assert!(!layout.rows[1].selected);
    }

    #[test]
    fn test_single_mode_has_no_select_all() {
        let rows = rows();
        let (selection, config) = (Selection::single(), TableConfig::default());
        let view = view_for(&rows, &[0], &selection, &config, LayoutMode::Table, &[]);
        let TableView::Table(layout) = view else {
            panic!("expected table view");
        };
        assert_eq!(layout.select_all, None);
    }

    #[test]
    fn test_cards_carry_label_value_pairs() {
        let rows = rows();
        let (selection, config) = (Selection::multi(), TableConfig::default());
        let view = view_for(&rows, &[0], &selection, &config, LayoutMode::Cards, &[]);
        let TableView::Cards(cards) = view else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 1);
        let pairs: Vec<(&str, &str)> = cards[0]
            .fields
            .iter()
            .map(|c| (c.label.as_str(), c.text.as_str()))
            .collect();
        assert_eq!(pairs, [("Name", "Gold Chain"), ("Stock", "5")]);
    }

    #[test]
    fn test_empty_and_loading() {
        let rows = rows();
        let config = TableConfig::default().with_empty_message("Nothing here");
        let view = view_for(&rows, &[], &Selection::multi(), &config, LayoutMode::Table, &[]);
        assert_eq!(
            view,
            TableView::Empty {
                message: "Nothing here".to_string()
            }
        );

        let loading = config.with_loading(true);
        let view = view_for(&rows, &[0], &Selection::multi(), &loading, LayoutMode::Cards, &[]);
        assert_eq!(view, TableView::Loading);
    }

    #[test]
    fn test_actions_respect_visibility() {
        let deleted = Arc::new(AtomicUsize::new(0));
        let actions = vec![
            RowAction::edit(|_: &serde_json::Value| {}),
            {
                let deleted = Arc::clone(&deleted);
                RowAction::delete(move |_: &serde_json::Value| {
                    deleted.fetch_add(1, Ordering::SeqCst);
                })
                .visible_when(|row| row["stock"].as_i64().unwrap_or(0) > 0)
            },
        ];

        let rows = rows();
        let (selection, config) = (Selection::multi(), TableConfig::default());
        let view = view_for(&rows, &[0, 1], &selection, &config, LayoutMode::Table, &actions);
        let TableView::Table(layout) = view else {
            panic!("expected table view");
        };
        assert_eq!(layout.rows[0].actions.len(), 2);
        assert_eq!(layout.rows[1].actions.len(), 1);
        assert_eq!(layout.rows[1].actions[0].kind, ActionKind::Edit);

        assert!(!actions[1].invoke(&rows[1]));
        assert!(actions[1].invoke(&rows[0]));
        assert_eq!(deleted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_field_row_id_falls_back_to_index() {
        let row_id = field_row_id::<serde_json::Value>("id");
        assert_eq!(row_id(&json!({"id": 42}), 0), "42");
        assert_eq!(row_id(&json!({"name": "x"}), 3), "3");
        assert_eq!(index_row_id::<serde_json::Value>()(&json!({}), 7), "7");
    }
}
