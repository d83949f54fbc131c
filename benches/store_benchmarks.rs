use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use futures::executor::block_on;
use timescape::{
    EventStore, FoldPolicy, GeographicRegion, LocatedEvent, MemorySource, RawCoordinate,
    RawEventRecord, TemporalInterval,
};

fn records(count: usize) -> Vec<RawEventRecord> {
    (0..count)
        .map(|i| RawEventRecord {
            id: format!("Q{}", i),
            label: format!("Event {}", i),
            start: Some("2020-06-01".into()),
            end: Some("2020-06-02".into()),
            coord: RawCoordinate::Text(format!(
                "Point({} {})",
                (i % 100) as f64 * 0.1,
                (i / 100) as f64 * 0.1
            )),
        })
        .collect()
}

fn year() -> TemporalInterval {
    "2020-01-01/2020-12-31".parse().unwrap()
}

fn benchmark_cache_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_hits");

    for count in [100, 1_000, 10_000] {
        let store = EventStore::new(MemorySource::new(records(count)));
        let full = GeographicRegion::new(0.0, 0.0, 10.0, 10.0).unwrap();
        block_on(store.get_events(&year(), &full)).unwrap();

        let half = GeographicRegion::new(0.0, 0.0, 5.0, 5.0).unwrap();
        group.bench_with_input(BenchmarkId::new("contained_query", count), &half, |b, region| {
            b.iter(|| block_on(store.get_events(black_box(&year()), black_box(region))).unwrap())
        });
    }

    group.finish();
}

fn benchmark_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");

    for policy in [FoldPolicy::FirstMatch, FoldPolicy::Transitive] {
        group.bench_function(format!("{:?}_disjoint_200", policy), |b| {
            b.iter(|| {
                let store = EventStore::builder(MemorySource::default())
                    .fold_policy(policy)
                    .build()
                    .unwrap();
                for i in 0..200 {
                    let offset = i as f64 * 2.0;
                    let region =
                        GeographicRegion::new(offset, offset, offset + 1.0, offset + 1.0)
                            .unwrap();
                    store.register_coverage(&year(), &region, &[]);
                }
                black_box(store.coverage(&year()).len())
            })
        });

        group.bench_function(format!("{:?}_overlapping_200", policy), |b| {
            let event = LocatedEvent::new("Q1", year(), geo::Point::new(0.5, 0.5), "Event");
            b.iter(|| {
                let store = EventStore::builder(MemorySource::default())
                    .fold_policy(policy)
                    .build()
                    .unwrap();
                for i in 0..200 {
                    let offset = i as f64 * 0.5;
                    let region =
                        GeographicRegion::new(offset, offset, offset + 1.0, offset + 1.0)
                            .unwrap();
                    store.register_coverage(&year(), &region, std::slice::from_ref(&event));
                }
                black_box(store.coverage(&year()).len())
            })
        });
    }

    group.finish();
}

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.bench_function("interval", |b| {
        b.iter(|| black_box("2020-01-01T00:00:00Z/P1Y2M").parse::<TemporalInterval>().unwrap())
    });

    group.bench_function("record_translation", |b| {
        let batch = records(1_000);
        b.iter(|| {
            batch
                .iter()
                .cloned()
                .filter_map(|r| LocatedEvent::from_record(r).ok())
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_cache_hits, benchmark_fold, benchmark_parsing);
criterion_main!(benches);
