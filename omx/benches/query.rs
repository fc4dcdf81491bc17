use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use omx::{MatrixData, MatrixOptions, MemoryEngine, OmxConfig, OmxFile, Predicate};
use rand::Rng;

const PERIODS: [&str; 5] = ["ea", "am", "md", "pm", "ev"];
const MODES: [&str; 4] = ["hwy", "trn", "walk", "bike"];

fn populated(matrices: usize) -> OmxFile<MemoryEngine> {
    let mut rng = rand::thread_rng();
    let mut file = OmxFile::with_engine(MemoryEngine::new(), None, OmxConfig::default())
        .expect("open in-memory container");

    for i in 0..matrices {
        let options = MatrixOptions::new()
            .with_attribute("timeperiod", PERIODS[rng.gen_range(0..PERIODS.len())])
            .with_attribute("mode", MODES[rng.gen_range(0..MODES.len())])
            .with_attribute("year", 2010i64 + (i % 3) as i64);
        let data = MatrixData::filled((32, 32), 0.0f32).expect("matrix data");
        file.create_matrix(&format!("m{i:04}"), data, options)
            .expect("create matrix");
    }
    file
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for matrices in [10, 100, 1000] {
        let file = populated(matrices);
        let single = Predicate::new().with("timeperiod", "am");
        let conjunctive = Predicate::new()
            .with("timeperiod", "am")
            .with("mode", "hwy")
            .with("year", 2011i64);

        group.bench_with_input(BenchmarkId::new("names_single", matrices), &file, |b, f| {
            b.iter(|| f.query_names(black_box(&single)))
        });
        group.bench_with_input(
            BenchmarkId::new("names_conjunctive", matrices),
            &file,
            |b, f| b.iter(|| f.query_names(black_box(&conjunctive))),
        );
        group.bench_with_input(BenchmarkId::new("matrices_single", matrices), &file, |b, f| {
            b.iter(|| f.query(black_box(&single)))
        });
    }

    group.finish();
}

fn bench_reverse_lookup(c: &mut Criterion) {
    let entries: Vec<u32> = (1..=5000).collect();
    c.bench_function("reverse_lookup_5000", |b| {
        b.iter(|| omx_core::reverse_lookup(black_box(&entries)))
    });
}

criterion_group!(benches, bench_query, bench_reverse_lookup);
criterion_main!(benches);
