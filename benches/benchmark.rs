use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use duomap::{OrderedMap, UnorderedMap};

const SCALES: [usize; 3] = [1_000, 10_000, 100_000];

fn random_keys(n: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| rng.gen_range(0..=99_999_999u32).to_string())
        .collect()
}

fn ordered_map(keys: &[String]) -> OrderedMap {
    let mut map = OrderedMap::new();
    for key in keys {
        map.insert(key, "test").unwrap();
    }
    map
}

fn unordered_map(keys: &[String]) -> UnorderedMap {
    let mut map = UnorderedMap::with_buckets(100, 0.80);
    for key in keys {
        map.insert(key, "test");
    }
    map
}

pub fn ordered_benchmarks(c: &mut Criterion) {
    for n in SCALES {
        let keys = random_keys(n, 0);
        let probes = random_keys(n, 1);
        let map = ordered_map(&keys);

        c.bench_with_input(BenchmarkId::new("ordered_insert", n), &keys, |b, keys| {
            b.iter(|| ordered_map(keys))
        });

        c.bench_with_input(BenchmarkId::new("ordered_search", n), &probes, |b, probes| {
            b.iter(|| {
                for key in probes {
                    black_box(map.search(key).unwrap());
                }
            })
        });

        c.bench_with_input(BenchmarkId::new("ordered_traverse", n), &map, |b, map| {
            b.iter(|| black_box(map.traverse()))
        });

        c.bench_with_input(BenchmarkId::new("ordered_remove", n), &keys, |b, keys| {
            b.iter_batched(
                || map.clone(),
                |mut map| {
                    for key in keys {
                        map.remove(key).unwrap();
                    }
                    map
                },
                BatchSize::LargeInput,
            )
        });
    }
}

pub fn unordered_benchmarks(c: &mut Criterion) {
    for n in SCALES {
        let keys = random_keys(n, 0);
        let probes = random_keys(n, 1);
        let map = unordered_map(&keys);

        c.bench_with_input(BenchmarkId::new("unordered_insert", n), &keys, |b, keys| {
            b.iter(|| unordered_map(keys))
        });

        c.bench_with_input(
            BenchmarkId::new("unordered_search", n),
            &probes,
            |b, probes| {
                b.iter(|| {
                    for key in probes {
                        black_box(map.get(key));
                    }
                })
            },
        );

        c.bench_with_input(BenchmarkId::new("unordered_traverse", n), &map, |b, map| {
            b.iter(|| {
                for pair in map.iter() {
                    black_box(pair);
                }
            })
        });

        c.bench_with_input(BenchmarkId::new("unordered_remove", n), &keys, |b, keys| {
            b.iter_batched(
                || map.clone(),
                |mut map| {
                    for key in keys {
                        map.remove(key);
                    }
                    map
                },
                BatchSize::LargeInput,
            )
        });
    }
}

criterion_group!(benches, ordered_benchmarks, unordered_benchmarks);
criterion_main!(benches);
