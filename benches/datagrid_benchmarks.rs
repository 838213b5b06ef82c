use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use datagrid::*;
use serde_json::{json, Value as Json};

const STATUSES: [&str; 3] = ["Active", "Inactive", "Pending"];

fn schema() -> Schema<Json> {
    Schema::builder(|r: &Json| RecordId::from(r["id"].as_i64().unwrap_or_default()))
        .field(FieldSpec::new("name").searchable().sortable())
        .field(FieldSpec::new("email").searchable())
        .field(FieldSpec::new("score").sortable())
        .field(FieldSpec::new("joined").sortable())
        .filter(FilterSpec::from_values("status", "Status", "status", STATUSES))
        .build()
        .unwrap()
}

fn records(n: usize) -> Vec<Json> {
    (0..n)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Customer {:05}", (i * 7919) % n),
                "email": format!("user{}@example.com", i),
                "score": ((i * 31) % 997) as f64 / 10.0,
                "status": STATUSES[i % 3],
                "joined": format!("2023-{:02}-{:02}T12:00:00Z", i % 12 + 1, i % 28 + 1),
            })
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [1000, 10000].iter() {
        let mut view = ViewComposer::new(schema(), records(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                view.set_search_term(black_box("customer 00"));
                view.set_search_term(black_box(""));
            });
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [1000, 10000].iter() {
        let mut view = ViewComposer::new(schema(), records(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                view.set_filter("status", black_box(["Active", "Pending"])).unwrap();
                view.set_filter("status", black_box(ALL)).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    for field in ["name", "score", "joined"] {
        let mut group = c.benchmark_group(format!("sort_{}", field));

        for size in [1000, 10000].iter() {
            let mut view = ViewComposer::new(schema(), records(*size));
            group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
                b.iter(|| view.set_sort(black_box(field)).unwrap());
            });
        }
        group.finish();
    }
}

fn bench_toggle_select_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_select_all");

    for size in [1000, 10000].iter() {
        let mut view = ViewComposer::new(schema(), records(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                view.toggle_select_all();
                black_box(view.selected_records().len())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_search,
    bench_filter,
    bench_sort,
    bench_toggle_select_all,
);

criterion_main!(benches);
