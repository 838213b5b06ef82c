/// Customers Example
///
/// This example demonstrates:
/// - Describing JSON records with a Schema
/// - Search, single-select and multi-select filters
/// - Column-header sorting and the header checkbox
/// - Driving the view with serialized messages
///
/// Run with `RUST_LOG=debug` to see every recompute.

use datagrid::{Action, FieldSpec, FilterSpec, RecordId, Schema, ViewComposer, ViewMessage};
use serde_json::{json, Value as Json};

fn print_rows(view: &ViewComposer<Json>) {
    for record in view.visible_records() {
        let id = view.schema().id_of(record);
        let mark = if view.is_selected(&id) { "x" } else { " " };
        let text = |key: &str| record[key].as_str().unwrap_or("").to_string();
        println!(
            "   [{}] {:>2}  {:<14} {:<10} {}",
            mark,
            id,
            text("name"),
            text("status"),
            text("joined")
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    println!("=== DataGrid Customers Example ===\n");

    // 1. Describe the screen
    let schema = Schema::builder(|r: &Json| RecordId::from(r["id"].as_i64().unwrap_or_default()))
        .field(FieldSpec::new("name").label("Name").searchable().sortable())
        .field(FieldSpec::new("email").label("Email").searchable())
        .field(FieldSpec::new("joined").label("Joined").sortable())
        .filter(FilterSpec::from_values(
            "status",
            "Status",
            "status",
            ["Active", "Inactive", "Pending"],
        ))
        .bulk_action(Action::new("email", "Send email", |records: &[&Json]| {
            for r in records {
                println!("   -> emailing {}", r["email"].as_str().unwrap_or("?"));
            }
        }))
        .default_sort("name")
        .build()?;

    let records = vec![
        json!({
            "id": 1,
            "name": "John Doe",
            "email": "john@example.com",
            "status": "Active",
            "joined": "2023-04-01T09:30:00Z",
        }),
        json!({
            "id": 2,
            "name": "Jane Smith",
            "email": "jane@example.com",
            "status": "Inactive",
            "joined": "2022-12-15T14:00:00Z",
        }),
        json!({
            "id": 3,
            "name": "alice Doe",
            "email": "alice@example.com",
            "status": "Pending",
            "joined": "2024-01-20T08:15:00Z",
        }),
        json!({
            "id": 4,
            "name": "Bob Stone",
            "email": "bob@example.com",
            "status": "Active",
            "joined": "2021-06-30T17:45:00Z",
        }),
        json!({
            "id": 5,
            "name": "Eve Adams",
            "email": "eve@example.com",
            "status": "Pending",
            "joined": "2023-11-11T11:11:00Z",
        }),
    ];

    let mut view = ViewComposer::new(schema, records);
    println!("1. Default sort by name:");
    print_rows(&view);

    // 2. Search
    println!("2. Search \"doe\":");
    view.set_search_term("doe");
    print_rows(&view);
    view.set_search_term("");

    // 3. Multi-select filter
    println!("3. Status in {{Active, Pending}}, newest first:");
    view.toggle_filter_option("status", "Active")?;
    view.toggle_filter_option("status", "Pending")?;
    view.set_sort("joined")?;
    view.set_sort("joined")?;
    print_rows(&view);

    // 4. Header checkbox and bulk action
    println!("4. Select all visible, then send email:");
    view.toggle_select_all();
    print_rows(&view);
    let sent = view.dispatch_bulk_action("email")?;
    println!("   {} record(s) passed to the action\n", sent);

    // 5. The same kind of input as JSON messages
    println!("5. Replaying messages:");
    let messages = r#"[
        {"type": "SelectionCleared"},
        {"type": "FilterChanged", "filter": "status", "value": "all"},
        {"type": "SortToggled", "field": "name"},
        {"type": "SelectToggled", "id": 2}
    ]"#;
    for message in serde_json::from_str::<Vec<ViewMessage>>(messages)? {
        view.apply(message)?;
    }
    print_rows(&view);

    println!("Snapshot:\n{}", serde_json::to_string_pretty(&view.snapshot())?);

    Ok(())
}
