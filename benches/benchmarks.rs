criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        building_the_adtree,
        materializing_a_contingency_table,
        filling_the_cache,
}

use anomalog::mining::cache::Cache;
use anomalog::mining::contingency::ContingencyTable;
use anomalog::records::table::RecordTable;
use anomalog::tree::tree::AdTree;

/// a table big enough for the walk to matter
fn sample() -> RecordTable {
    let arities = vec![6, 5, 4, 3, 4];
    let rows = (0..10_000)
        .map(|_| arities.iter().map(|&a| rand::random_range(1..=a)).collect())
        .collect();
    RecordTable::new(arities, rows).expect("sample table is well formed")
}

fn building_the_adtree(c: &mut criterion::Criterion) {
    let ref table = sample();
    c.bench_function("build an AD-tree over 10k records", |b| {
        b.iter(|| AdTree::new(table))
    });
}

fn materializing_a_contingency_table(c: &mut criterion::Criterion) {
    let ref table = sample();
    let tree = AdTree::new(table).expect("tree builds");
    c.bench_function("materialize a 3-attribute contingency table", |b| {
        b.iter(|| ContingencyTable::new(&tree, &[0, 2, 4]))
    });
}

fn filling_the_cache(c: &mut criterion::Criterion) {
    let ref table = sample();
    let tree = AdTree::new(table).expect("tree builds");
    c.bench_function("fill the cache to level 3", |b| {
        b.iter(|| Cache::new(&tree, 3))
    });
}
