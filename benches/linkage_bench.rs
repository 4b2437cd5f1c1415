use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geolink::{
    build_index, destination, AddressRecord, AddressRegistry, BatchConfig, BatchLinkageRunner,
    Coordinate, IncomingRecord, LinkageConfig, LinkageContext,
};

const STREETS: &[&str] = &["Lenina", "Marksa", "Sovetskaya", "Kirova", "Gogolya", "Frunze"];

/// Registry of `count` addresses scattered within 5 km of the city centre.
fn sample_registry(count: usize) -> AddressRegistry {
    let mut rng = fastrand::Rng::with_seed(42);
    let centre = Coordinate::new_unchecked(55.03, 82.92);
    let records = (0..count)
        .map(|i| AddressRecord {
            id: format!("a-{i}"),
            canonical_text: format!("{} {}", STREETS[i % STREETS.len()], rng.u32(1..200)),
            coordinate: destination(centre, rng.f64() * 360.0, rng.f64() * 5_000.0),
        })
        .collect();
    AddressRegistry::from_records(records).expect("valid registry")
}

fn sample_incoming(registry: &AddressRegistry, count: usize) -> Vec<IncomingRecord> {
    let mut rng = fastrand::Rng::with_seed(7);
    (0..count)
        .map(|i| {
            let base = &registry.records()[rng.usize(..registry.len())];
            IncomingRecord {
                external_id: format!("ext-{i}"),
                raw_text: format!("ул. {}", base.canonical_text),
                coordinate: destination(base.coordinate, rng.f64() * 360.0, rng.f64() * 200.0),
            }
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    for size in [1_000usize, 10_000, 50_000] {
        let registry = sample_registry(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &registry, |b, registry| {
            b.iter(|| build_index(black_box(registry)).expect("index builds"))
        });
    }
    group.finish();
}

fn bench_radius_query(c: &mut Criterion) {
    let registry = sample_registry(50_000);
    let index = build_index(&registry).expect("index builds");
    let centre = Coordinate::new_unchecked(55.03, 82.92);

    let mut group = c.benchmark_group("radius_query");
    for radius in [30.0, 100.0, 300.0] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| index.neighbors_within(black_box(centre), radius).len())
        });
    }
    group.bench_function("nearest_10", |b| b.iter(|| index.nearest(black_box(centre), 10).len()));
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for size in [1_000usize, 10_000] {
        let registry = sample_registry(size);
        let incoming = sample_incoming(&registry, 256);
        let ctx = LinkageContext::new(registry, LinkageConfig::default()).expect("valid context");

        group.throughput(Throughput::Elements(incoming.len() as u64));
        group.bench_with_input(BenchmarkId::new("single", size), &incoming, |b, incoming| {
            b.iter(|| {
                for record in incoming {
                    let _ = black_box(ctx.resolve(record));
                }
            })
        });

        let runner = BatchLinkageRunner::new(
            &ctx,
            BatchConfig {
                workers: 4,
                progress_every: 1_000,
            },
        )
        .expect("valid batch config");
        group.bench_with_input(BenchmarkId::new("batch_4_workers", size), &incoming, |b, incoming| {
            b.iter(|| runner.run(black_box(incoming)).expect("batch runs"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_index_build, bench_radius_query, bench_resolve);
criterion_main!(benches);
