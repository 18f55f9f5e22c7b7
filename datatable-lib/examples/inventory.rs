//! Inventory table demo
//!
//! Run with: `cargo run -p datatable-lib --example inventory`
//! Engine logs go to `inventory.log`.

use std::fs::File;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use chrono::NaiveDate;
use datatable_lib::Alignment;
use datatable_lib::Callbacks;
use datatable_lib::Column;
use datatable_lib::ColumnSet;
use datatable_lib::DataTable;
use datatable_lib::FilterKind;
use datatable_lib::FilterOption;
use datatable_lib::NavButton;
use datatable_lib::Pagination;
use datatable_lib::PaginationMode;
use datatable_lib::ResizeEvents;
use datatable_lib::RowAction;
use datatable_lib::SortState;
use datatable_lib::TableConfig;
use datatable_lib::TableState;
use datatable_lib::model::Record;
use datatable_lib::render::TableView;
use datatable_lib::render::field_row_id;
use rust_decimal::Decimal;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

fn product(sku: &str, name: &str, metal: &str, karat: i64, stock: i64, price: i64) -> Record {
    Record::new()
        .set("sku", sku)
        .set("name", name)
        .set("stock", stock)
        .set("price", Decimal::new(price, 2))
        .set(
            "restocked",
            NaiveDate::from_ymd_opt(2024, 3, (stock % 28 + 1) as u32),
        )
        .set("meta", Record::new().set("metal", metal).set("karat", karat))
}

fn inventory() -> Vec<Record> {
    vec![
        product("GC-18", "Gold Chain", "gold", 18, 5, 120_000),
        product("SB-02", "Silver Bracelet", "silver", 0, 15, 8_550),
        product("PR-07", "Pearl Ring", "gold", 14, 0, 31_000),
        product("GE-22", "Gold Earrings", "gold", 22, 3, 64_000),
        product("PN-01", "Platinum Necklace", "platinum", 0, 2, 210_000),
    ]
}

fn print_view(title: &str, view: &TableView) {
    println!("== {title}");
    match view {
        TableView::Loading => println!("  loading..."),
        TableView::Empty { message } => println!("  {message}"),
        TableView::Table(layout) => {
            let headers: Vec<String> = layout
                .headers
                .iter()
                .map(|h| match h.sort {
                    Some(sort) if sort.direction.is_descending() => format!("{} v", h.label),
                    Some(_) => format!("{} ^", h.label),
                    None => h.label.clone(),
                })
                .collect();
            println!("  {}", headers.join(" | "));
            for row in &layout.rows {
                let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
                let mark = if row.selected { "[x]" } else { "[ ]" };
                println!("  {mark} {}", cells.join(" | "));
            }
        }
        TableView::Cards(cards) => {
            for card in cards {
                println!("  # {}", card.id);
                for field in &card.fields {
                    println!("    {}: {}", field.label, field.text);
                }
            }
        }
    }
}

fn main() -> std::io::Result<()> {
    let log_file = File::create("inventory.log")?;
    WriteLogger::init(LevelFilter::Trace, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let columns = ColumnSet::new(vec![
        Column::new("name", "Product")
            .sortable()
            .filterable(FilterKind::Text)
            .sticky(),
        Column::new("metal", "Metal")
            .path("meta.metal")
            .options([
                FilterOption::new("gold", "Gold"),
                FilterOption::new("silver", "Silver"),
                FilterOption::new("platinum", "Platinum"),
            ]),
        Column::new("stock", "Stock")
            .sortable()
            .filterable(FilterKind::Number)
            .align(Alignment::Right),
        Column::new("price", "Price")
            .sortable()
            .align(Alignment::Right),
        Column::new("restocked", "Restocked").filterable(FilterKind::Date),
        Column::new("sku", "SKU").hidden(),
    ])
    .expect("column ids are unique");

    // The host owns the descriptors; callbacks write the next state back.
    let state = Arc::new(Mutex::new(
        TableState::new().with_pagination(Pagination::for_total(5, 2).expect("page size")),
    ));
    let callbacks = {
        let (sort, filter, page) = (Arc::clone(&state), Arc::clone(&state), Arc::clone(&state));
        Callbacks::new()
            .on_sort_change(move |next| sort.lock().unwrap().sort = next)
            .on_filter_change(move |next| filter.lock().unwrap().filter = next)
            .on_page_change(move |next| page.lock().unwrap().pagination = Some(next))
    };

    let config = TableConfig::default()
        .with_striped(true)
        .with_pagination_mode(PaginationMode::Local)
        .with_empty_message("No products match");

    let events = ResizeEvents::new();
    let mut table = DataTable::new(columns, config, 1280)
        .with_row_id_fn(field_row_id("sku"))
        .with_action(RowAction::edit(|row: &Record| {
            let sku = row.get("sku").map(ToString::to_string).unwrap_or_default();
            println!("  -> edit {sku}");
        }))
        .with_callbacks(callbacks);
    table.attach(&events);

    let rows = inventory();
    let snapshot = || state.lock().unwrap().clone();

    print_view("first page", &table.view(&rows, &snapshot()));

    table.click_header(&snapshot(), "price", false);
    table.click_header(&snapshot(), "price", false);
    print_view("by price, descending", &table.view(&rows, &snapshot()));

    table.go_to(&rows, &snapshot(), NavButton::Next);
    print_view("second page", &table.view(&rows, &snapshot()));

    table.set_column_filter(&snapshot(), "metal", "gold");
    print_view("gold only", &table.view(&rows, &snapshot()));

    table.invoke_action(&rows, 0, "edit");

    table.set_column_filter(&snapshot(), "stock", "99");
    print_view("no matches", &table.view(&rows, &snapshot()));

    let start = Instant::now();
    events.emit(390, start);
    table.settle(start + Duration::from_millis(200));
    {
        let mut state = state.lock().unwrap();
        state.filter = state.filter.set_column("stock", "");
        state.sort = SortState::asc("name");
    }
    print_view("phone width", &table.view(&rows, &snapshot()));

    Ok(())
}
