use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use fieldarray::nd::{Array, ArrayCoordinates, ArraySort, DenseArray, SparseArray, TypedArray};

fn build_sparse(n: i64) -> SparseArray<f64> {
    let mut a = SparseArray::with_extents([n, n]).expect("valid extents");
    for i in 0..n {
        a.add_value(&[i, (i * 7) % n].into(), i as f64)
            .expect("matching dimensions");
    }
    a
}

fn bench_sparse_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_lookup");

    for &n in &[256i64, 1024i64] {
        let sparse = build_sparse(n);
        let hit: ArrayCoordinates = [n - 1, ((n - 1) * 7) % n].into();
        let miss: ArrayCoordinates = [0, 1].into();

        group.bench_with_input(BenchmarkId::new("hit_last", n), &n, |b, _| {
            b.iter(|| black_box(sparse.value(&hit).expect("in bounds")));
        });

        group.bench_with_input(BenchmarkId::new("miss", n), &n, |b, _| {
            b.iter(|| black_box(sparse.value(&miss).expect("in bounds")));
        });

        group.bench_with_input(BenchmarkId::new("sort_rows", n), &n, |b, _| {
            b.iter(|| {
                let mut a = sparse.clone();
                a.sort(&ArraySort::new(vec![1, 0])).expect("valid dimensions");
                black_box(a.non_null_size());
            });
        });

        let dense = DenseArray::<f64>::with_extents([n, n]).expect("valid extents");
        group.bench_with_input(BenchmarkId::new("dense_lookup", n), &n, |b, _| {
            b.iter(|| black_box(dense.value(&hit).expect("in bounds")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sparse_lookup);
criterion_main!(benches);
