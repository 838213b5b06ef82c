/// Orders Example
///
/// This example demonstrates:
/// - Implementing `Record` for a plain struct
/// - Computed and rendered columns
/// - Loading and saving through a `ResourceRepository`
/// - Optimistic updates rolling back when the repository refuses
/// - Pagination and event-handler closures

use datagrid::{
    Action, EngineError, FieldSpec, FilterOption, FilterSpec, Handlers, InMemoryRepository,
    Record, RecordId, Schema, Value, ViewComposer, ViewOptions,
};
use log::info;

#[derive(Debug, Clone)]
struct Order {
    id: i64,
    customer: String,
    status: String,
    quantity: u32,
    unit_price: f64,
    placed_at: String,
}

struct Draft {
    customer: &'static str,
    quantity: u32,
    unit_price: f64,
}

impl Record for Order {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "customer" => Some(Value::from(self.customer.as_str())),
            "status" => Some(Value::from(self.status.as_str())),
            "quantity" => Some(Value::from(self.quantity)),
            "unit_price" => Some(Value::from(self.unit_price)),
            "placed_at" => Some(Value::from(self.placed_at.as_str())),
            _ => None,
        }
    }
}

fn order(
    id: i64,
    customer: &str,
    status: &str,
    quantity: u32,
    unit_price: f64,
    placed_at: &str,
) -> Order {
    Order {
        id,
        customer: customer.to_string(),
        status: status.to_string(),
        quantity,
        unit_price,
        placed_at: placed_at.to_string(),
    }
}

fn schema() -> Result<Schema<Order>, EngineError> {
    let schema = Schema::builder(|o: &Order| RecordId::from(o.id))
        .field(FieldSpec::new("customer").label("Customer").searchable().sortable())
        .field(FieldSpec::new("status").label("Status").searchable())
        .field(
            FieldSpec::computed("total", |o: &Order| {
                Value::Number(o.quantity as f64 * o.unit_price)
            })
            .label("Total")
            .sortable(),
        )
        .field(FieldSpec::new("placed_at").label("Placed").sortable())
        .field(FieldSpec::computed("badge", |o: &Order| {
            Value::Rendered(format!("<span class=\"badge {}\">", o.status))
        }))
        .filter(FilterSpec::from_values(
            "status",
            "Status",
            "status",
            ["open", "shipped", "cancelled"],
        ))
        .filter(
            FilterSpec::new("size", "Order size")
                .option(FilterOption::new("Small", "small", |o: &Order| o.quantity < 10))
                .option(FilterOption::new("Bulk", "bulk", |o: &Order| o.quantity >= 10)),
        )
        .row_action(Action::new("open", "Open", |orders: &[&Order]| {
            for o in orders {
                info!("opening order {}", o.id);
            }
        }))
        .bulk_action(Action::new("ship", "Mark shipped", |orders: &[&Order]| {
            info!("shipping {} order(s)", orders.len());
        }))
        .default_sort("placed_at")
        .build()?;
    Ok(schema)
}

fn print_page(view: &ViewComposer<Order>) {
    println!(
        "   page {}/{} ({} of {} orders visible)",
        view.state().page + 1,
        view.page_count(),
        view.visible_len(),
        view.records().len()
    );
    for o in view.page_records() {
        println!(
            "   #{:<3} {:<14} {:<10} {:>8.2}  {}",
            o.id,
            o.customer,
            o.status,
            o.quantity as f64 * o.unit_price,
            o.placed_at
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    println!("=== DataGrid Orders Example ===\n");

    let repo = InMemoryRepository::new(
        |o: &Order| RecordId::from(o.id),
        |id, draft: Draft| Order {
            id,
            customer: draft.customer.to_string(),
            status: "open".to_string(),
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            placed_at: "2024-03-05T12:00:00Z".to_string(),
        },
    )
    .with_records(vec![
        order(1, "Widget Co", "open", 10, 9.99, "2024-03-02T10:00:00Z"),
        order(2, "Gadget Ltd", "shipped", 5, 19.99, "2024-03-01T09:00:00Z"),
        order(3, "Doohickey Inc", "open", 15, 4.99, "2024-02-28T17:30:00Z"),
        order(4, "Widget Co", "cancelled", 1, 250.0, "2024-03-03T08:15:00Z"),
        order(5, "Sprocket AG", "open", 40, 1.25, "2024-03-04T16:45:00Z"),
    ]);

    // 1. Load through the repository, three rows per page
    let options = ViewOptions::default().with_rows_per_page(3);
    let mut view = ViewComposer::with_options(schema()?, Vec::new(), options)?;
    view.load(&repo)?;
    println!("1. Loaded, oldest first:");
    print_page(&view);

    // 2. Create one and sort by computed total, largest first
    view.create(
        &repo,
        Draft {
            customer: "Gizmo GmbH",
            quantity: 2,
            unit_price: 75.0,
        },
    )?;
    view.set_sort("total")?;
    view.set_sort("total")?;
    println!("2. After create, by total descending:");
    print_page(&view);
    view.set_page(1);
    print_page(&view);

    // 3. Open orders in bulk quantities
    view.set_filter("status", "open")?;
    view.set_filter("size", "bulk")?;
    println!("3. Open bulk orders:");
    print_page(&view);

    // 4. Optimistic update against a repository that refuses writes
    repo.set_read_only(true);
    let mut edited = order(5, "Sprocket AG", "shipped", 40, 1.25, "2024-03-04T16:45:00Z");
    edited.quantity = 400;
    match view.update_optimistic(&repo, edited) {
        Ok(()) => println!("4. Update saved"),
        Err(err) => println!("4. Update rolled back: {}", err),
    }
    print_page(&view);
    repo.set_read_only(false);

    // 5. Hand the view to widget callbacks
    let handlers = Handlers::new(view);
    let on_search = handlers.on_search_change();
    let on_filter = handlers.on_filter_change();
    let on_select_all = handlers.on_toggle_select_all();
    let on_bulk = handlers.on_bulk_action();

    on_filter("status", "all")?;
    on_filter("size", "all")?;
    on_search("widget");
    on_select_all();
    let shipped = on_bulk("ship")?;
    println!("5. Bulk action over {} selected order(s)", shipped);

    let view = handlers.view();
    view.borrow().dispatch_row_action("open", &RecordId::from(4))?;
    print_page(&view.borrow());

    Ok(())
}
