use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pantry_core::{predict, ProductShelfLife, PurchaseContext, StorageProfile, WeatherReading};

fn bench_predict(c: &mut Criterion) {
    let product = ProductShelfLife::base(10).with_room(5).with_fridge(20).with_freezer(180);
    let storage = StorageProfile::named("Chest Freezer Drawer");
    let bought = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let context = PurchaseContext::opened(bought, bought);

    c.bench_function("predict_opened_freezer", |b| {
        b.iter(|| {
            predict(
                black_box(&product),
                black_box(&storage),
                black_box(&WeatherReading::FALLBACK),
                black_box(&context),
            )
        })
    });
}

criterion_group!(benches, bench_predict);
criterion_main!(benches);
