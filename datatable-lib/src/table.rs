//! The mounted table: ties descriptors, engines and callbacks together.
//!
//! A [`DataTable`] owns only what lives for one mounted instance (columns,
//! config, row actions, callbacks, the filter panel flag and the viewport).
//! Sort, filter, selection and pagination descriptors belong to the caller
//! and arrive as a [`TableState`] on every call. Interactions never edit that
//! state; they compute the next descriptor and hand it to a callback.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use crate::column::Column;
use crate::column::ColumnSet;
use crate::config::TableConfig;
use crate::error::PaginationError;
use crate::error::TableError;
use crate::filter::FilterPlan;
use crate::filter::FilterState;
use crate::layout::LayoutMode;
use crate::layout::ResizeEvents;
use crate::layout::ResizeSubscription;
use crate::layout::ViewportTracker;
use crate::model::Row;
use crate::pagination::NavButton;
use crate::pagination::Pagination;
use crate::pagination::PaginationMode;
use crate::render::RenderInput;
use crate::render::RowAction;
use crate::render::RowIdFn;
use crate::render::TableView;
use crate::render::index_row_id;
use crate::render::render;
use crate::selection::Selection;
use crate::selection::SelectionSummary;
use crate::sort::SortState;
use crate::sort::sort_indices;

/// Caller-owned descriptors for one render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableState {
    pub sort: SortState,
    pub filter: FilterState,
    pub selection: Selection,
    pub pagination: Option<Pagination>,
}

impl TableState {
    /// Unsorted, unfiltered, nothing selected, no paging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sort descriptor.
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    /// Replaces the filter descriptor.
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    /// Replaces the selection descriptor.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Enables paging with the given descriptor.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Whether an interaction produced a new descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// A callback was invoked.
    Consumed,
    /// Nothing changed; no callback ran.
    Ignored,
}

impl EventResult {
    /// True when a callback ran.
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// Transient per-instance flags. Reset when the table is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiFlags {
    pub filter_panel_open: bool,
    pub layout: LayoutMode,
}

/// Result of running the filter and sort engines.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    /// Row indices to display, in display order. Sliced to the current page
    /// only in local pagination mode.
    pub order: Vec<usize>,
    /// Rows left after filtering, before any page slicing.
    pub matched: usize,
    /// Ids of the displayed rows.
    pub visible_ids: Vec<String>,
    pub selection: SelectionSummary,
    /// The descriptor the controls should show. In local mode the page count
    /// follows `matched`.
    pub pagination: Option<Pagination>,
}

// =============================================================================
// Callbacks
// =============================================================================

type Handler<A> = Arc<dyn Fn(A) + Send + Sync>;
type RowHandler<T> = Arc<dyn Fn(&T, &str) + Send + Sync>;

/// Change notifications. Every handler is optional.
pub struct Callbacks<T> {
    sort_change: Option<Handler<SortState>>,
    filter_change: Option<Handler<FilterState>>,
    global_filter_change: Option<Handler<String>>,
    selection_change: Option<Handler<Selection>>,
    page_change: Option<Handler<Pagination>>,
    page_size_change: Option<Handler<Pagination>>,
    layout_change: Option<Handler<LayoutMode>>,
    row_click: Option<RowHandler<T>>,
    row_double_click: Option<RowHandler<T>>,
}

impl<T> Callbacks<T> {
    /// No callbacks registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the next sort descriptor.
    pub fn on_sort_change(mut self, f: impl Fn(SortState) + Send + Sync + 'static) -> Self {
        self.sort_change = Some(Arc::new(f));
        self
    }

    /// Receives the full filter state with one column filter changed.
    pub fn on_filter_change(mut self, f: impl Fn(FilterState) + Send + Sync + 'static) -> Self {
        self.filter_change = Some(Arc::new(f));
        self
    }

    /// Called with the next global search string.
    pub fn on_global_filter_change(mut self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.global_filter_change = Some(Arc::new(f));
        self
    }

    /// Called with the next selection.
    pub fn on_selection_change(mut self, f: impl Fn(Selection) + Send + Sync + 'static) -> Self {
        self.selection_change = Some(Arc::new(f));
        self
    }

    /// Called when the page index changes.
    pub fn on_page_change(mut self, f: impl Fn(Pagination) + Send + Sync + 'static) -> Self {
        self.page_change = Some(Arc::new(f));
        self
    }

    /// Called when the page size changes.
    pub fn on_page_size_change(mut self, f: impl Fn(Pagination) + Send + Sync + 'static) -> Self {
        self.page_size_change = Some(Arc::new(f));
        self
    }

    /// Called when a settled resize crosses the breakpoint.
    pub fn on_layout_change(mut self, f: impl Fn(LayoutMode) + Send + Sync + 'static) -> Self {
        self.layout_change = Some(Arc::new(f));
        self
    }

    /// Receives the clicked row and its id.
    pub fn on_row_click(mut self, f: impl Fn(&T, &str) + Send + Sync + 'static) -> Self {
        self.row_click = Some(Arc::new(f));
        self
    }

    /// Called with the row and its id on double click.
    pub fn on_row_double_click(mut self, f: impl Fn(&T, &str) + Send + Sync + 'static) -> Self {
        self.row_double_click = Some(Arc::new(f));
        self
    }
}

fn emit<A>(handler: &Option<Handler<A>>, arg: A) {
    if let Some(handler) = handler {
        handler(arg);
    }
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            sort_change: None,
            filter_change: None,
            global_filter_change: None,
            selection_change: None,
            page_change: None,
            page_size_change: None,
            layout_change: None,
            row_click: None,
            row_double_click: None,
        }
    }
}

impl<T> Clone for Callbacks<T> {
    fn clone(&self) -> Self {
        Self {
            sort_change: self.sort_change.clone(),
            filter_change: self.filter_change.clone(),
            global_filter_change: self.global_filter_change.clone(),
            selection_change: self.selection_change.clone(),
            page_change: self.page_change.clone(),
            page_size_change: self.page_size_change.clone(),
            layout_change: self.layout_change.clone(),
            row_click: self.row_click.clone(),
            row_double_click: self.row_double_click.clone(),
        }
    }
}

impl<T> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("sort_change", &self.sort_change.is_some())
            .field("filter_change", &self.filter_change.is_some())
            .field("global_filter_change", &self.global_filter_change.is_some())
            .field("selection_change", &self.selection_change.is_some())
            .field("page_change", &self.page_change.is_some())
            .field("page_size_change", &self.page_size_change.is_some())
            .field("layout_change", &self.layout_change.is_some())
            .field("row_click", &self.row_click.is_some())
            .field("row_double_click", &self.row_double_click.is_some())
            .finish()
    }
}

// =============================================================================
// DataTable
// =============================================================================

/// One mounted table.
///
/// # Example
///
/// ```
/// use datatable_lib::{Column, ColumnSet, DataTable, FilterState, TableConfig, TableState};
/// use serde_json::json;
///
/// let columns = ColumnSet::new(vec![
///     Column::new("name", "Name").sortable(),
///     Column::new("stock", "Stock").sortable(),
/// ])
/// .unwrap();
/// let table = DataTable::new(columns, TableConfig::default(), 1280);
///
/// let rows = vec![
///     json!({"name": "Gold Chain", "stock": 5}),
///     json!({"name": "Silver Ring", "stock": 0}),
/// ];
/// let state = TableState::new().with_filter(FilterState::new().with_global("gold"));
///
/// let processed = table.process(&rows, &state);
/// assert_eq!(processed.order, [0]);
/// ```
pub struct DataTable<T> {
    columns: ColumnSet<T>,
    config: TableConfig,
    row_id: RowIdFn<T>,
    actions: Vec<RowAction<T>>,
    callbacks: Callbacks<T>,
    filter_panel_open: bool,
    viewport: Rc<RefCell<ViewportTracker>>,
    subscription: Option<ResizeSubscription>,
}

impl<T> DataTable<T> {
    /// Mounts a table for a viewport `initial_width` pixels wide.
    pub fn new(columns: ColumnSet<T>, config: TableConfig, initial_width: u32) -> Self {
        let viewport = ViewportTracker::new(
            initial_width,
            config.mobile_breakpoint,
            config.resize_debounce(),
        );
        log::debug!(
            "[table] mounted with {} columns at width {} ({:?})",
            columns.len(),
            initial_width,
            viewport.mode()
        );
        Self {
            columns,
            config,
            row_id: index_row_id(),
            actions: Vec::new(),
            callbacks: Callbacks::default(),
            filter_panel_open: false,
            viewport: Rc::new(RefCell::new(viewport)),
            subscription: None,
        }
    }

    /// Validates `columns` and mounts the table.
    pub fn from_columns(
        columns: Vec<Column<T>>,
        config: TableConfig,
        initial_width: u32,
    ) -> Result<Self, TableError> {
        let columns = ColumnSet::new(columns)?;
        Ok(Self::new(columns, config, initial_width))
    }

    /// Sets the row id function. Defaults to the row's index.
    pub fn with_row_id(
        mut self,
        row_id: impl Fn(&T, usize) -> String + Send + Sync + 'static,
    ) -> Self {
        self.row_id = Arc::new(row_id);
        self
    }

    /// Sets a shared row id function.
    pub fn with_row_id_fn(mut self, row_id: RowIdFn<T>) -> Self {
        self.row_id = row_id;
        self
    }

    /// Appends a row action.
    pub fn with_action(mut self, action: RowAction<T>) -> Self {
        self.actions.push(action);
        self
    }

    /// Registers the host callbacks.
    pub fn with_callbacks(mut self, callbacks: Callbacks<T>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Listens for viewport resizes until the table is dropped.
    pub fn attach(&mut self, events: &ResizeEvents) {
        let viewport = Rc::clone(&self.viewport);
        self.subscription = Some(events.subscribe(move |width, at| {
            viewport.borrow_mut().on_resize(width, at);
        }));
    }

    /// Stops listening for resizes.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// True while subscribed to resize events.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// The column descriptors.
    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    /// Display configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Row actions in display order.
    pub fn actions(&self) -> &[RowAction<T>] {
        &self.actions
    }

    /// Layout currently in effect.
    pub fn layout_mode(&self) -> LayoutMode {
        self.viewport.borrow().mode()
    }

    /// Snapshot of the transient panel and layout flags.
    pub fn flags(&self) -> UiFlags {
        UiFlags {
            filter_panel_open: self.filter_panel_open,
            layout: self.layout_mode(),
        }
    }

    /// Opens or closes the filter panel. Returns the new state.
    pub fn toggle_filter_panel(&mut self) -> bool {
        self.filter_panel_open = !self.filter_panel_open;
        self.filter_panel_open
    }

    /// Records a resize directly, for hosts that do not use [`ResizeEvents`].
    pub fn resize(&self, width: u32, at: Instant) {
        self.viewport.borrow_mut().on_resize(width, at);
    }

    /// Applies a debounced resize. Fires the layout callback when the
    /// breakpoint was crossed.
    pub fn settle(&self, now: Instant) -> Option<LayoutMode> {
        let changed = self.viewport.borrow_mut().settle(now);
        if let Some(mode) = changed {
            emit(&self.callbacks.layout_change, mode);
        }
        changed
    }
}

impl<T: Row> DataTable<T> {
    /// Runs the filter and sort engines over `rows`.
    pub fn process(&self, rows: &[T], state: &TableState) -> Processed {
        let filtered = FilterPlan::compile(&self.columns, &state.filter).apply(rows);
        let mut order = sort_indices(rows, &filtered, &self.columns, &state.sort);
        let matched = order.len();

        let pagination = match (self.config.pagination_mode, state.pagination) {
            (PaginationMode::Local, Some(page)) => {
                let page = page.with_total(matched);
                let range = page.slice_range(matched);
                order = order[range].to_vec();
                Some(page)
            }
            (_, page) => page,
        };

        let visible_ids: Vec<String> = order
            .iter()
            .filter_map(|&index| rows.get(index).map(|row| (self.row_id)(row, index)))
            .collect();
        let selection = state.selection.summary(&visible_ids);

        log::trace!(
            "[table] processed {} rows: {} matched, {} shown",
            rows.len(),
            matched,
            order.len()
        );

        Processed {
            order,
            matched,
            visible_ids,
            selection,
            pagination,
        }
    }

    /// Builds the view model for the current layout mode.
    pub fn view(&self, rows: &[T], state: &TableState) -> TableView {
        let processed = self.process(rows, state);
        render(&RenderInput {
            rows,
            order: &processed.order,
            columns: &self.columns,
            sort: &state.sort,
            selection: &state.selection,
            row_id: &self.row_id,
            actions: &self.actions,
            config: &self.config,
            mode: self.layout_mode(),
        })
    }

    /// Header click. `multi` adds the column as a secondary sort key
    /// instead of replacing the sort.
    pub fn click_header(&self, state: &TableState, column: &str, multi: bool) -> EventResult {
        let sortable = self.columns.get(column).is_some_and(|c| c.sortable);
        if !sortable {
            return EventResult::Ignored;
        }

        let next = state.sort.toggle(column, multi);
        log::debug!("[table] sort on '{}' -> {:?}", column, next.keys());
        emit(&self.callbacks.sort_change, next);
        EventResult::Consumed
    }

    /// Column filter input changed. An empty value clears the filter.
    pub fn set_column_filter(
        &self,
        state: &TableState,
        column: &str,
        value: impl Into<String>,
    ) -> EventResult {
        let next = state.filter.set_column(column, value);
        if next == state.filter {
            return EventResult::Ignored;
        }
        emit(&self.callbacks.filter_change, next);
        self.reset_page(state);
        EventResult::Consumed
    }

    /// Reports a new global search string and returns to the first page.
    pub fn set_global_filter(&self, state: &TableState, value: impl Into<String>) -> EventResult {
        let value = value.into();
        if value == state.filter.global() {
            return EventResult::Ignored;
        }
        emit(&self.callbacks.global_filter_change, value);
        self.reset_page(state);
        EventResult::Consumed
    }

    /// Selects or deselects the row with `id`.
    pub fn toggle_row_selection(&self, state: &TableState, id: &str) -> EventResult {
        let next = state.selection.toggled(id);
        if next == state.selection {
            return EventResult::Ignored;
        }
        emit(&self.callbacks.selection_change, next);
        EventResult::Consumed
    }

    /// Header checkbox. Works on the rows currently shown.
    pub fn toggle_select_all(&self, rows: &[T], state: &TableState) -> EventResult {
        let visible = self.process(rows, state).visible_ids;
        let next = state.selection.toggled_all(&visible);
        if next == state.selection {
            return EventResult::Ignored;
        }
        emit(&self.callbacks.selection_change, next);
        EventResult::Consumed
    }

    /// Navigation button press. Disabled buttons are ignored.
    pub fn go_to(&self, rows: &[T], state: &TableState, button: NavButton) -> EventResult {
        let Some(page) = self.process(rows, state).pagination else {
            return EventResult::Ignored;
        };

        let control = page.control(button);
        if control.disabled {
            return EventResult::Ignored;
        }
        emit(&self.callbacks.page_change, page.go_to(control.target));
        EventResult::Consumed
    }

    /// Page size selector changed. Goes back to the first page.
    pub fn set_page_size(
        &self,
        rows: &[T],
        state: &TableState,
        page_size: usize,
    ) -> Result<EventResult, PaginationError> {
        let processed = self.process(rows, state);
        let Some(page) = processed.pagination else {
            return Ok(EventResult::Ignored);
        };

        let total = match self.config.pagination_mode {
            PaginationMode::Local => Some(processed.matched),
            PaginationMode::Advisory => None,
        };
        let next = page.with_page_size(page_size, total)?;
        emit(&self.callbacks.page_size_change, next);
        Ok(EventResult::Consumed)
    }

    /// Runs the row action `action_id` on `rows[index]`.
    pub fn invoke_action(&self, rows: &[T], index: usize, action_id: &str) -> EventResult {
        let Some(row) = rows.get(index) else {
            return EventResult::Ignored;
        };
        let Some(action) = self.actions.iter().find(|a| a.id == action_id) else {
            log::debug!("[table] unknown row action '{}'", action_id);
            return EventResult::Ignored;
        };

        if action.invoke(row) {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    /// Fires the row click callback for the row at `index`.
    pub fn click_row(&self, rows: &[T], index: usize) -> EventResult {
        self.row_event(&self.callbacks.row_click, rows, index)
    }

    /// Fires the row double-click callback for the row at `index`.
    pub fn double_click_row(&self, rows: &[T], index: usize) -> EventResult {
        self.row_event(&self.callbacks.row_double_click, rows, index)
    }

    fn row_event(&self, handler: &Option<RowHandler<T>>, rows: &[T], index: usize) -> EventResult {
        let (Some(handler), Some(row)) = (handler, rows.get(index)) else {
            return EventResult::Ignored;
        };
        let id = (self.row_id)(row, index);
        handler(row, &id);
        EventResult::Consumed
    }

    fn reset_page(&self, state: &TableState) {
        if let Some(page) = state.pagination.filter(|p| p.page_index() != 0) {
            emit(&self.callbacks.page_change, page.go_to(0));
        }
    }
}

impl<T> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("config", &self.config)
            .field("actions", &self.actions)
            .field("callbacks", &self.callbacks)
            .field("filter_panel_open", &self.filter_panel_open)
            .field("viewport", &self.viewport.borrow())
            .field("attached", &self.subscription.is_some())
            .finish()
    }
}
