use criterion::{criterion_group, criterion_main, Criterion};

use service::inventory::InventoryLevels;
use service::suppliers::{NewSupplier, SupplierStore};

// Every add rewrites the whole table, so cost grows with the row count.
fn bench_add(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let path = std::env::temp_dir().join(format!("bench_suppliers_{}/suppliers.csv", uuid::Uuid::new_v4()));
    let store = rt.block_on(SupplierStore::new(&path)).unwrap();
    let inventory = InventoryLevels::seeded("101");

    for _ in 0..500 {
        rt.block_on(store.add(NewSupplier { quantity_liters: Some(10.0), ..Default::default() }, &inventory)).unwrap();
    }

    c.bench_function("supplier_add_500_rows", |b| {
        b.iter(|| {
            let input = NewSupplier {
                supplier_name: Some("Bench Farm".into()),
                quantity_liters: Some(12.5),
                price_per_liter: Some(0.8),
                ..Default::default()
            };
            rt.block_on(store.add(input, &inventory)).unwrap();
        });
    });

    c.bench_function("supplier_list_with_earnings", |b| {
        b.iter(|| rt.block_on(store.list_with_earnings()).unwrap());
    });

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

criterion_group!(benches, bench_add);
criterion_main!(benches);
