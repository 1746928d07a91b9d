//! Horizon Grid Inventory Example
//!
//! Binds a small inventory to an editable table view and drives it the way
//! a toolkit backend would: by forwarding widget ids for clicks and edits.
//! The grid is printed after each step.
//!
//! Run with: cargo run -p horizon-grid --example inventory

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use horizon_grid::prelude::*;

#[derive(Debug, Default, Clone, Record)]
struct Item {
    #[record(label = "SKU")]
    sku: u32,
    name: String,
    price: f64,
    stock: i32,
    restocked: DateTime<Utc>,
}

fn print_grid(title: &str, table: &StructTableView<Item>) {
    println!("== {title}");
    let header: Vec<_> = table
        .header()
        .iter()
        .filter_map(|id| table.tree().widget(*id))
        .map(|w| format!("{:>20}", w.text()))
        .collect();
    println!("{}", header.join(""));

    for row in 0..table.row_count() {
        let cells: Vec<_> = (0..1 + table.fields().len())
            .filter_map(|column| table.cell(row, column))
            .filter_map(|id| table.tree().widget(id))
            .map(|w| format!("{:>20}", w.text()))
            .collect();
        println!("{}", cells.join(""));
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let records = share_records(vec![
        Item {
            sku: 1042,
            name: "hex bolt".into(),
            price: 0.35,
            stock: 1200,
            restocked: Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
        },
        Item {
            sku: 77,
            name: "washer".into(),
            price: 0.05,
            stock: 5400,
            restocked: Utc.with_ymd_and_hms(2024, 2, 14, 16, 30, 0).unwrap(),
        },
        Item {
            sku: 3310,
            name: "anchor".into(),
            price: 1.9,
            stock: 85,
            restocked: Utc.with_ymd_and_hms(2023, 11, 28, 8, 15, 0).unwrap(),
        },
    ]);

    let config = TableViewConfig::default().with_float_precision(2);
    let mut table = StructTableView::<Item>::new(config);

    table.notifier().subscribe(|event| println!("-> {event:?}"));
    table.set_style_fn(|widget, _row, field, view| {
        if field == 3
            && matches!(view.value(), Some(FieldValue::Int(stock)) if stock < 100)
        {
            widget.set_tooltip("low stock");
        }
    });

    let save: SaveCallback = Arc::new(|| println!("-> saved"));
    table.set_records(records.clone(), Some(save))?;
    print_grid("initial", &table);

    // Click the "name" header twice: ascending, then descending.
    let name_header = table.header_widget(1).ok_or("missing header")?;
    table.activate(name_header)?;
    print_grid("sorted by name", &table);
    table.activate(name_header)?;
    print_grid("sorted by name, descending", &table);

    // Edit a price through its widget.
    let price = table.value_widget(0, 2).ok_or("missing cell")?;
    table.commit_widget_edit(price, "0.40")?;

    // Insert after the first row, then append with the button box.
    let insert = table.cell(0, 1 + table.fields().len()).ok_or("missing action")?;
    table.activate(insert)?;
    table.activate(table.add_button().ok_or("missing add button")?)?;
    print_grid("after inserts", &table);

    if let Err(err) = table.commit_edit(1, 3, "plenty") {
        println!("rejected edit: {err}");
    }

    println!("{} records, {} widgets", records.read().len(), table.tree().len());
    Ok(())
}
