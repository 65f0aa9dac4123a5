//! Benchmarks for the solver variants
//!
//! Measures fit and predict separately on synthetic multi-label data, so the
//! `O(n^3)` exact factorization can be compared against the reduced sketched
//! systems at matching sample counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use iokr::kernel::GaussianKernel;
use iokr::sketch::{PSparsified, Sketch, SubSample};
use iokr::solver::{Iokr, Isokr, Siokr, Sisokr};
use iokr::utils::{candidate_set, synthetic};
use iokr::{Regressor, SplitDataset};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_data(n_train: usize) -> SplitDataset {
    synthetic::multilabel(n_train, 50, 8, 4, 42).expect("valid parameters")
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    for &n in &[100usize, 200] {
        let data = bench_data(n);
        let m = n / 4;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let r_in = SubSample::new(m, n).expect("valid shape").draw(&mut rng);
        let r_out = PSparsified::new(m, n, 0.1)
            .expect("valid shape")
            .draw(&mut rng);

        group.bench_with_input(BenchmarkId::new("iokr", n), &data, |b, data| {
            b.iter(|| {
                let mut solver =
                    Iokr::new(1e-6, GaussianKernel::new(0.1), GaussianKernel::new(1.0))
                        .expect("valid solver");
                solver
                    .fit(black_box(&data.x_train), black_box(&data.y_train))
                    .expect("fit succeeds");
            })
        });

        group.bench_with_input(BenchmarkId::new("siokr", n), &data, |b, data| {
            b.iter(|| {
                let mut solver = Siokr::new(
                    1e-6,
                    GaussianKernel::new(0.1),
                    GaussianKernel::new(1.0),
                    r_out.clone(),
                )
                .expect("valid solver");
                solver
                    .fit(black_box(&data.x_train), black_box(&data.y_train))
                    .expect("fit succeeds");
            })
        });

        group.bench_with_input(BenchmarkId::new("isokr", n), &data, |b, data| {
            b.iter(|| {
                let mut solver = Isokr::new(
                    1e-6,
                    GaussianKernel::new(0.1),
                    GaussianKernel::new(1.0),
                    r_in.clone(),
                )
                .expect("valid solver");
                solver
                    .fit(black_box(&data.x_train), black_box(&data.y_train))
                    .expect("fit succeeds");
            })
        });

        group.bench_with_input(BenchmarkId::new("sisokr", n), &data, |b, data| {
            b.iter(|| {
                let mut solver = Sisokr::new(
                    1e-6,
                    GaussianKernel::new(0.1),
                    GaussianKernel::new(1.0),
                    r_in.clone(),
                    r_out.clone(),
                )
                .expect("valid solver");
                solver
                    .fit(black_box(&data.x_train), black_box(&data.y_train))
                    .expect("fit succeeds");
            })
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    let n = 200;
    let data = bench_data(n);
    let y_c = candidate_set(&data.y_train);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let r_in = SubSample::new(n / 4, n).expect("valid shape").draw(&mut rng);
    let r_out = PSparsified::new(n / 4, n, 0.1)
        .expect("valid shape")
        .draw(&mut rng);

    let mut exact = Iokr::new(1e-6, GaussianKernel::new(0.1), GaussianKernel::new(1.0))
        .expect("valid solver");
    exact
        .fit(&data.x_train, &data.y_train)
        .expect("fit succeeds");
    group.bench_function("iokr", |b| {
        b.iter(|| {
            exact
                .predict(black_box(&data.x_test), black_box(&y_c))
                .expect("predict succeeds")
        })
    });

    let mut sketched = Sisokr::new(
        1e-6,
        GaussianKernel::new(0.1),
        GaussianKernel::new(1.0),
        r_in,
        r_out,
    )
    .expect("valid solver");
    sketched
        .fit(&data.x_train, &data.y_train)
        .expect("fit succeeds");
    group.bench_function("sisokr", |b| {
        b.iter(|| {
            sketched
                .predict(black_box(&data.x_test), black_box(&y_c))
                .expect("predict succeeds")
        })
    });

    group.finish();
}

fn bench_sketch_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("sketch_draw");
    let n = 1000;
    let m = 100;

    group.bench_function("subsample", |b| {
        let sketch = SubSample::new(m, n).expect("valid shape");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        b.iter(|| black_box(sketch.draw(&mut rng)))
    });

    group.bench_function("p_sparsified", |b| {
        let sketch = PSparsified::new(m, n, 0.1).expect("valid shape");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        b.iter(|| black_box(sketch.draw(&mut rng)))
    });

    group.finish();
}

criterion_group!(benches, bench_fit, bench_predict, bench_sketch_draw);
criterion_main!(benches);
