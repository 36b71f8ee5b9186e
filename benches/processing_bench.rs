use criterion::{criterion_group, criterion_main, Criterion};
use rankboard::aggregate::{category_frequency, score_histogram, top_category_totals};
use rankboard::pipeline::{filter_and_sort, SortDirection, SortSpec};
use rankboard::records::process;
use rankboard::scorer::Rule;
use serde_json::{Map, Value};
use std::hint::black_box;

const CATEGORY_COUNT: usize = 40;

fn setup_rows(players: usize) -> (Vec<Value>, Vec<Rule>) {
    let mut rng = fastrand::Rng::with_seed(7);
    let rows = (0..players)
        .map(|i| {
            let mut map = Map::new();
            map.insert("PLAYER".to_string(), Value::from(format!("player_{}", i)));
            for c in 0..CATEGORY_COUNT {
                // Sparse: most players touch a handful of categories
                if rng.u8(..) < 64 {
                    map.insert(format!("cat_{}", c), Value::from(rng.u32(0..500)));
                }
            }
            Value::Object(map)
        })
        .collect();

    let rules = (0..CATEGORY_COUNT)
        .step_by(2)
        .map(|c| Rule::new(format!("cat_{}", c), rng.f64() * 100.0))
        .collect();
    (rows, rules)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (rows, rules) = setup_rows(5_000);

    c.bench_function("process (5k players)", |b| {
        b.iter(|| process(black_box(&rows), black_box(&rules)))
    });

    let records = process(&rows, &rules).records;
    let sort = SortSpec::new("cat_3", SortDirection::Desc);

    c.bench_function("filter_and_sort (5k players)", |b| {
        b.iter(|| filter_and_sort(black_box(&records), black_box("er_1"), black_box(&sort)))
    });

    c.bench_function("dashboard aggregates (5k players)", |b| {
        b.iter(|| {
            let totals = top_category_totals(black_box(&records), 7, "Others");
            let freq = category_frequency(black_box(&records), 10);
            let hist = score_histogram(black_box(&records));
            (totals, freq, hist)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
