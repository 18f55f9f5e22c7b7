use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use datatable_lib::Callbacks;
use datatable_lib::Column;
use datatable_lib::ColumnSet;
use datatable_lib::DataTable;
use datatable_lib::EventResult;
use datatable_lib::FilterKind;
use datatable_lib::FilterState;
use datatable_lib::LayoutMode;
use datatable_lib::NavButton;
use datatable_lib::Pagination;
use datatable_lib::PaginationMode;
use datatable_lib::ResizeEvents;
use datatable_lib::RowAction;
use datatable_lib::Selection;
use datatable_lib::SortState;
use datatable_lib::TableConfig;
use datatable_lib::TableState;
use datatable_lib::render::ActionKind;
use datatable_lib::render::TableView;
use datatable_lib::render::field_row_id;
use serde_json::json;

type Row = serde_json::Value;

fn inventory() -> Vec<Row> {
    vec![
        json!({"sku": "GC-18", "name": "Gold Chain", "stock": 5, "price": 1200.0}),
        json!({"sku": "SB-02", "name": "Silver Bracelet", "stock": 15, "price": 85.5}),
        json!({"sku": "PR-07", "name": "Pearl Ring", "stock": 0, "price": 310.0}),
        json!({"sku": "GE-22", "name": "Gold Earrings", "stock": null, "price": 640.0}),
    ]
}

fn table(config: TableConfig, width: u32) -> DataTable<Row> {
    let columns = ColumnSet::new(vec![
        Column::new("name", "Product").sortable().filterable(FilterKind::Text),
        Column::new("stock", "Stock").sortable().filterable(FilterKind::Number),
        Column::new("price", "Price").sortable(),
        Column::new("sku", "SKU").hidden(),
    ])
    .unwrap();
    DataTable::new(columns, config, width).with_row_id_fn(field_row_id("sku"))
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_select_all_round_trip() {
    let rows = inventory();
    let table = table(TableConfig::default(), 1280);
    let state = TableState::new();
    let visible = table.process(&rows, &state).visible_ids;

    let all = Selection::multi().toggled_all(&visible);
    assert!(all.is_all_selected(&visible));
    assert!(!all.is_some_selected(&visible));

    let none = all.toggled_all(&visible);
    assert!(none.is_empty());
    assert!(!none.is_all_selected(&visible));
}

#[test]
fn test_selection_callback_receives_new_set() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let table = table(TableConfig::default(), 1280)
        .with_callbacks(
            Callbacks::new().on_selection_change(move |s| sink.lock().unwrap().push(s)),
        );

    let state = TableState::new().with_selection(Selection::multi().with_selected(["GC-18"]));
    assert_eq!(table.toggle_row_selection(&state, "PR-07"), EventResult::Consumed);

    // The caller's descriptor is untouched.
    assert_eq!(state.selection.len(), 1);
    let next = seen.lock().unwrap().remove(0);
    assert_eq!(next.ids().collect::<Vec<_>>(), ["GC-18", "PR-07"]);
}

#[test]
fn test_selection_disabled() {
    let table = table(TableConfig::default(), 1280);
    let state = TableState::new().with_selection(Selection::none());
    assert_eq!(table.toggle_row_selection(&state, "GC-18"), EventResult::Ignored);
    assert_eq!(table.toggle_select_all(&inventory(), &state), EventResult::Ignored);
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn test_pagination_boundaries() {
    let first = Pagination::new(0, 10, 3).unwrap();
    assert!(first.control(NavButton::First).disabled);
    assert!(first.control(NavButton::Previous).disabled);
    assert!(!first.control(NavButton::Next).disabled);
    assert!(!first.control(NavButton::Last).disabled);

    let last = Pagination::new(2, 10, 3).unwrap();
    assert!(!last.control(NavButton::First).disabled);
    assert!(!last.control(NavButton::Previous).disabled);
    assert!(last.control(NavButton::Next).disabled);
    assert!(last.control(NavButton::Last).disabled);
}

#[test]
fn test_page_navigation_reports_target() {
    let pages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&pages);
    let config = TableConfig::default().with_pagination_mode(PaginationMode::Local);
    let table = table(config, 1280)
        .with_callbacks(Callbacks::new().on_page_change(move |p| sink.lock().unwrap().push(p)));

    let rows = inventory();
    let state = TableState::new()
        .with_sort(SortState::asc("name"))
        .with_pagination(Pagination::for_total(rows.len(), 3).unwrap());

    let processed = table.process(&rows, &state);
    assert_eq!(processed.visible_ids, ["GC-18", "GE-22", "PR-07"]);

    assert!(table.go_to(&rows, &state, NavButton::Next).is_consumed());
    let next = pages.lock().unwrap()[0];
    assert_eq!(next.page_index(), 1);

    let state = TableState { pagination: Some(next), ..state };
    assert_eq!(table.process(&rows, &state).visible_ids, ["SB-02"]);
    assert_eq!(table.go_to(&rows, &state, NavButton::Last), EventResult::Ignored);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_view_renders_table() {
    let rows = inventory();
    let table = table(TableConfig::default(), 1280);
    let state = TableState::new()
        .with_sort(SortState::desc("stock"))
        .with_selection(Selection::multi().with_selected(["SB-02"]));

    let TableView::Table(layout) = table.view(&rows, &state) else {
        panic!("expected table view");
    };
    let headers: Vec<&str> = layout.headers.iter().map(|h| h.label.as_str()).collect();
    assert_eq!(headers, ["Product", "Stock", "Price"]);
    assert_eq!(layout.rows.len(), 4);

    // Null stock sorts first when descending.
    assert_eq!(layout.rows[0].id, "GE-22");
    assert_eq!(layout.rows[1].id, "SB-02");
    assert!(layout.rows[1].selected);
    assert_eq!(layout.rows[1].cells[2].text, "85.5");

    let select_all = layout.select_all.unwrap();
    assert!(!select_all.checked);
    assert!(select_all.indeterminate);
}

#[test]
fn test_narrow_viewport_renders_cards() {
    let rows = inventory();
    let table = table(TableConfig::default(), 375);
    assert_eq!(table.layout_mode(), LayoutMode::Cards);

    let state = TableState::new().with_filter(FilterState::new().with_global("pearl"));
    let TableView::Cards(cards) = table.view(&rows, &state) else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, "PR-07");
    assert_eq!(cards[0].fields[0].label, "Product");
    assert_eq!(cards[0].fields[1].text, "0");
}

#[test]
fn test_empty_result_shows_message() {
    let rows = inventory();
    let table = table(TableConfig::default().with_empty_message("No products"), 1280);
    let state = TableState::new().with_filter(FilterState::new().with_global("platinum"));

    assert_eq!(
        table.view(&rows, &state),
        TableView::Empty {
            message: "No products".to_string()
        }
    );
}

#[test]
fn test_loading_wins_over_rows() {
    let rows = inventory();
    let table = table(TableConfig::default().with_loading(true), 1280);
    assert_eq!(table.view(&rows, &TableState::new()), TableView::Loading);
}

#[test]
fn test_resize_flips_layout() {
    let events = ResizeEvents::new();
    let mut table = table(TableConfig::default(), 1280);
    table.attach(&events);

    let start = Instant::now();
    events.emit(700, start);
    events.emit(1000, start + Duration::from_millis(50));
    assert_eq!(table.settle(start + Duration::from_millis(300)), None);
    assert_eq!(table.layout_mode(), LayoutMode::Table);

    events.emit(600, start + Duration::from_millis(400));
    assert_eq!(
        table.settle(start + Duration::from_millis(600)),
        Some(LayoutMode::Cards)
    );
    assert!(matches!(table.view(&inventory(), &TableState::new()), TableView::Cards(_)));
}

// =============================================================================
// Interactions
// =============================================================================

#[test]
fn test_header_click_emits_next_sort() {
    let sorts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sorts);
    let table = table(TableConfig::default(), 1280)
        .with_callbacks(Callbacks::new().on_sort_change(move |s| sink.lock().unwrap().push(s)));

    let state = TableState::new().with_sort(SortState::desc("price"));
    table.click_header(&state, "price", false);
    table.click_header(&state, "name", false);
    assert_eq!(table.click_header(&state, "sku", false), EventResult::Ignored);

    let sorts = sorts.lock().unwrap();
    assert!(sorts[0].is_empty());
    assert_eq!(sorts[1], SortState::asc("name"));
}

#[test]
fn test_global_filter_callback() {
    let searches = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&searches);
    let table = table(TableConfig::default(), 1280)
        .with_callbacks(
            Callbacks::new().on_global_filter_change(move |s| sink.lock().unwrap().push(s)),
        );

    let state = TableState::new();
    assert!(table.set_global_filter(&state, "gold").is_consumed());
    assert_eq!(table.set_global_filter(&state, ""), EventResult::Ignored);
    assert_eq!(*searches.lock().unwrap(), ["gold"]);
}

#[test]
fn test_row_actions_dispatch_by_id() {
    let edited = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&edited);
    let table = table(TableConfig::default(), 1280)
        .with_action(RowAction::edit(move |row: &Row| {
            sink.lock().unwrap().push(row["sku"].as_str().unwrap_or_default().to_string());
        }))
        .with_action(
            RowAction::delete(|_: &Row| {}).visible_when(|row| row["stock"].as_i64() == Some(0)),
        );

    let rows = inventory();
    assert!(table.invoke_action(&rows, 1, "edit").is_consumed());
    assert_eq!(table.invoke_action(&rows, 1, "delete"), EventResult::Ignored);
    assert!(table.invoke_action(&rows, 2, "delete").is_consumed());
    assert_eq!(table.invoke_action(&rows, 2, "archive"), EventResult::Ignored);
    assert_eq!(*edited.lock().unwrap(), ["SB-02"]);

    let TableView::Table(layout) = table.view(&rows, &TableState::new()) else {
        panic!("expected table view");
    };
    let kinds: Vec<ActionKind> = layout.rows[2].actions.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, [ActionKind::Edit, ActionKind::Delete]);
}

#[test]
fn test_double_click_reports_row_id() {
    let opened = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&opened);
    let on_open = move |_: &Row, id: &str| sink.lock().unwrap().push(id.to_string());
    let table = table(TableConfig::default(), 1280)
        .with_callbacks(Callbacks::new().on_row_double_click(on_open));

    let rows = inventory();
    assert!(table.double_click_row(&rows, 0).is_consumed());
    assert_eq!(table.click_row(&rows, 0), EventResult::Ignored);
    assert_eq!(*opened.lock().unwrap(), ["GC-18"]);
}
