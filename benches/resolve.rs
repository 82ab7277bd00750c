use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pantry_canon::{
    similarity, CallContext, CreateIngredient, InMemoryIngredientStore, IngredientCatalog,
    ResolverConfig,
};

fn make_catalog(records: usize) -> IngredientCatalog {
    let store = Arc::new(InMemoryIngredientStore::new());
    let catalog = IngredientCatalog::new(store, ResolverConfig::default());
    let ctx = CallContext::background();

    // Seed distinct names with a couple of aliases each so the scan does
    // realistic per-record work.
    for i in 0..records {
        catalog
            .create(
                &ctx,
                CreateIngredient {
                    name: format!("ingredient {i:05}"),
                    aliases: vec![format!("item {i:05}"), format!("thing {i:05}")],
                    ..CreateIngredient::default()
                },
            )
            .unwrap();
    }
    catalog
}

fn bench_similarity(c: &mut Criterion) {
    c.bench_function("similarity/short_pair", |b| {
        b.iter(|| similarity(black_box("extra virgin olive oil"), black_box("extra-virgin olive oil")));
    });
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for records in [100usize, 1_000] {
        let catalog = make_catalog(records);
        let ctx = CallContext::background();
        group.throughput(Throughput::Elements(records as u64));

        // Exact hit on the last record: full scan, no write.
        let last = format!("ingredient {:05}", records - 1);
        group.bench_with_input(BenchmarkId::new("exact_last", records), &last, |b, name| {
            b.iter(|| catalog.resolve(&ctx, black_box(name)).unwrap());
        });

        // Fuzzy hit: scored against every record.
        group.bench_with_input(BenchmarkId::new("fuzzy", records), &records, |b, _| {
            b.iter(|| catalog.resolve(&ctx, black_box("ingredient 0000")).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_similarity, bench_resolve);
criterion_main!(benches);
