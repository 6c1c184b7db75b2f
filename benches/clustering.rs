use cohort::{Clustering, Kmeans, Profile, ReportBuilder, ScalingMode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn synthetic_profiles(n: usize, d: usize) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f32>()).collect())
        .collect()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    let data = synthetic_profiles(1000, 16);
    group.bench_function("fit_predict_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new(10).with_seed(42);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    let data = synthetic_profiles(1000, 16);
    group.bench_function("zscore_n1000_d16", |b| {
        b.iter(|| {
            for v in black_box(&data) {
                ScalingMode::ZScore.apply(v).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    let data = synthetic_profiles(1000, 16);
    let axes: Vec<String> = (0..16).map(|i| format!("axis{i}")).collect();
    let profiles: Vec<Profile> = data
        .iter()
        .enumerate()
        .map(|(i, v)| Profile {
            id: i as u64,
            name: format!("profile{i}"),
            vector: v.clone(),
        })
        .collect();
    let fit = Kmeans::new(10).with_seed(42).fit(&data).unwrap();

    group.bench_function("build_n1000_k10", |b| {
        b.iter(|| {
            ReportBuilder::new()
                .build(
                    black_box(&fit.centers),
                    black_box(&fit.labels),
                    &profiles,
                    &axes,
                )
                .unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_scaling, bench_report);
criterion_main!(benches);
