use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dagology_core::geometry::{Geometry, causal_set, minkowski_interval};
use dagology_core::order::{OrderMatrix, longest_path_matrix, transitive_closure};
use dagology_core::separation::{naive_spacelike_matrix, two_link_spacelike_matrix};
use rand::SeedableRng;
use rand::rngs::StdRng;

const SIZES: [usize; 3] = [50, 100, 200];

fn sprinkled(n: usize) -> OrderMatrix {
    let mut rng = StdRng::seed_from_u64(0x00DA_6010 + n as u64);
    let coords = minkowski_interval(n, 2, true, &mut rng).expect("sprinkle");
    causal_set(&coords, &Geometry::Minkowski { c: 1.0 }, 1.0, &mut rng).expect("causal set")
}

fn bench_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("order.sprinkled_2d");

    for n in SIZES {
        let relation = sprinkled(n);
        let lp = longest_path_matrix(&relation, None).expect("acyclic");
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("closure", n), &relation, |b, relation| {
            b.iter(|| black_box(transitive_closure(relation)));
        });

        group.bench_with_input(BenchmarkId::new("longest_path", n), &relation, |b, relation| {
            b.iter(|| black_box(longest_path_matrix(relation, None)));
        });

        group.bench_with_input(BenchmarkId::new("naive_spacelike", n), &lp, |b, lp| {
            b.iter(|| black_box(naive_spacelike_matrix(lp, None)));
        });

        group.bench_with_input(BenchmarkId::new("two_link_spacelike", n), &lp, |b, lp| {
            b.iter(|| black_box(two_link_spacelike_matrix(lp, None)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_order);
criterion_main!(benches);
