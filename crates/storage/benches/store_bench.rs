use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use souq_model::{Condition, FilterQuery, Listing, SortMode};
use souq_storage::{MemoryStorage, MockClock, ProductStore};

const CATEGORIES: [&str; 4] = ["Electronics", "Books", "Furniture", "Cars"];

fn seeded_store(n: usize) -> ProductStore<MemoryStorage, MockClock> {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let mut store = ProductStore::with_clock(MemoryStorage::new(), MockClock::new(now));
    for i in 0..n {
        let created = now - Duration::minutes(i as i64 * 7);
        let mut listing = Listing::new(
            i.to_string(),
            format!("item {i}"),
            (i % 1000) as f64,
            CATEGORIES[i % CATEGORIES.len()],
            created,
        );
        if i % 3 == 0 {
            listing.condition = Some(Condition::Used);
        }
        store.add(listing);
    }
    store
}

fn bench_filter(c: &mut Criterion) {
    let store = seeded_store(2_000);

    c.bench_function("filter_category_price_desc_2k", |b| {
        let query = FilterQuery::new()
            .category("Electronics")
            .price_range(100.0, 900.0)
            .sort(SortMode::PriceDesc);
        b.iter(|| black_box(store.filter(&query)))
    });

    c.bench_function("filter_search_newest_2k", |b| {
        let query = FilterQuery::new()
            .search("item 9")
            .condition("used")
            .sort(SortMode::Newest);
        b.iter(|| black_box(store.filter(&query)))
    });
}

fn bench_get_all(c: &mut Criterion) {
    let mut store = seeded_store(2_000);

    c.bench_function("get_all_expiry_pass_2k", |b| {
        b.iter(|| black_box(store.get_all().len()))
    });
}

criterion_group!(benches, bench_filter, bench_get_all);
criterion_main!(benches);
