use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mipcascade::srgb::{linear_to_srgb, srgb_to_linear};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

pub fn bench_srgb_to_linear(c: &mut Criterion) {
    c.bench_function("srgb_to_linear", |b| {
        let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
        let values: Vec<f32> = (0..4096).map(|_| rng.random_range(0.0..=255.0)).collect();

        b.iter(|| {
            black_box(&values)
                .iter()
                .map(|&v| srgb_to_linear(v))
                .sum::<f32>()
        })
    });
}

pub fn bench_linear_to_srgb(c: &mut Criterion) {
    c.bench_function("linear_to_srgb", |b| {
        let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
        let values: Vec<f32> = (0..4096).map(|_| rng.random_range(0.0..=1.0)).collect();

        b.iter(|| {
            black_box(&values)
                .iter()
                .map(|&v| linear_to_srgb(v))
                .sum::<f32>()
        })
    });
}

criterion_group!(srgb, bench_srgb_to_linear, bench_linear_to_srgb);
criterion_main!(srgb);
