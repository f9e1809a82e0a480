//! Composition benchmarks against the built-in catalogs.
//!
//! ```bash
//! cargo bench --bench compose
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use variant_forge::data::DataManager;
use variant_forge::items::{compose, compute_item_id, filter_selectable, ItemCategory, VariantChoice};

fn choices(manager: &DataManager, names: &[&str], category: ItemCategory) -> Vec<VariantChoice> {
    names
        .iter()
        .filter_map(|name| manager.find_variant_for(name, category))
        .map(|v| VariantChoice::new(v.clone()))
        .collect()
}

fn bench_compose(c: &mut Criterion) {
    let manager = DataManager::default();
    let sword = manager.find_base("Longsword").expect("default longsword");
    let full = choices(&manager, &["+3", "Adamantine", "Vorpal", "Weapon of Warning"], ItemCategory::Weapon);

    let none: Vec<VariantChoice> = Vec::new();

    c.bench_function("compose_no_variants", |b| {
        b.iter(|| compose(black_box(&sword), black_box(&none)))
    });

    c.bench_function("compose_four_variants", |b| {
        b.iter(|| compose(black_box(&sword), black_box(&full)))
    });

    c.bench_function("compute_item_id", |b| {
        b.iter(|| compute_item_id(black_box(&sword.name), black_box(&full)))
    });
}

fn bench_gating(c: &mut Criterion) {
    let manager = DataManager::default();
    let sword = manager.find_base("Longsword").expect("default longsword");
    let candidates = manager.load_variants(Some(ItemCategory::Weapon));
    let chosen = choices(&manager, &["+1", "Silvered"], ItemCategory::Weapon);

    c.bench_function("filter_selectable", |b| {
        b.iter(|| filter_selectable(black_box(&sword), black_box(&candidates), black_box(&chosen)))
    });
}

criterion_group!(benches, bench_compose, bench_gating);
criterion_main!(benches);
