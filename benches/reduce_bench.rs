use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use toil::{reduce, Options};

fn heavy_sum(mut a: u64, mut b: u64) -> Result<u64, String> {
    for _ in 0..100 {
        a = (a * 31) % 1_000_000_007;
        b = (b * 37) % 1_000_000_007;
    }
    Ok(a + b)
}

/// Benchmark an expensive combining function at growing input sizes
fn bench_heavy_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_heavy_sum");
    let opts = Options::new();

    for size in [1_000u64, 10_000, 100_000].iter() {
        let input: Vec<u64> = (1..=*size).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| black_box(reduce(input.clone(), heavy_sum, opts).unwrap()));
        });
    }
    group.finish();
}

/// Same workload across worker counts
fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_worker_scaling");
    let input: Vec<u64> = (1..=50_000).collect();

    for workers in [1i64, 2, 4, 8, 16, num_cpus::get() as i64].iter() {
        let opts = Options::new().with_workers(*workers);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &input, |b, input| {
            b.iter(|| {
                let out = reduce(
                    input.clone(),
                    |a: u64, b: u64| {
                        let mut r = a ^ b;
                        for _ in 0..500 {
                            r = (r.wrapping_mul(1_103_515_245).wrapping_add(12_345)) & 0x7fff_ffff;
                            r ^= r >> 16;
                        }
                        Ok::<_, String>(r)
                    },
                    opts,
                )
                .unwrap();
                black_box(out)
            });
        });
    }
    group.finish();
}

/// Non-commutative combining of strings
fn bench_string_concat(c: &mut Criterion) {
    let input: Vec<String> = (0..10_000).map(|i| format!("chunk_{}_", i)).collect();

    c.bench_function("reduce_string_concat", |b| {
        b.iter(|| {
            let out = reduce(
                input.clone(),
                |a: String, b: String| {
                    let mut joined = a + &b;
                    joined.truncate(1000);
                    Ok::<_, String>(joined)
                },
                Options::new(),
            )
            .unwrap();
            black_box(out)
        });
    });
}

criterion_group!(benches, bench_heavy_sum, bench_worker_scaling, bench_string_concat);
criterion_main!(benches);
