use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use spectral_transform::complex::{v_cartesian_to_polar, v_polar_to_cartesian};
use spectral_transform::spectrum::{Fft, FftConfig, Registry};

const SIZES: [usize; 2] = [512, 2048];

fn signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| (i as f64 * 0.37).sin() + 0.25 * (i as f64 * 1.91).cos())
        .collect()
}

fn make(name: &str, size: usize) -> Fft {
    let registry = Registry::default();
    Fft::with_config(&registry, size, FftConfig::with_implementation(name))
        .expect("valid transform size")
}

pub fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");

    for name in ["realfft", "rustfft"] {
        for size in SIZES {
            let mut fft = make(name, size);
            let input = signal(size);
            let mut re = vec![0.0; fft.bins()];
            let mut im = vec![0.0; fft.bins()];

            let id = BenchmarkId::new(name, size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| fft.forward(black_box(&input), &mut re, &mut im))
            });
        }
    }

    group.finish();
}

pub fn bench_forward_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_f32");

    for size in SIZES {
        let mut fft = make("realfft", size);
        let input: Vec<f32> = signal(size).into_iter().map(|x| x as f32).collect();
        let mut re = vec![0.0f32; fft.bins()];
        let mut im = vec![0.0f32; fft.bins()];

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| fft.forward(black_box(&input), &mut re, &mut im))
        });
    }

    group.finish();
}

pub fn bench_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverse");

    for name in ["realfft", "rustfft"] {
        for size in SIZES {
            let mut fft = make(name, size);
            let mut re = vec![0.0; fft.bins()];
            let mut im = vec![0.0; fft.bins()];
            fft.forward(&signal(size), &mut re, &mut im)
                .expect("forward transform");
            let mut out = vec![0.0; size];

            let id = BenchmarkId::new(name, size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| fft.inverse(black_box(&re), black_box(&im), &mut out))
            });
        }
    }

    group.finish();
}

pub fn bench_polar(c: &mut Criterion) {
    let mut group = c.benchmark_group("polar");

    for size in SIZES {
        let bins = size / 2 + 1;
        let re = signal(bins);
        let im: Vec<f64> = re.iter().rev().copied().collect();
        let mut mag = vec![0.0; bins];
        let mut phase = vec![0.0; bins];

        group.bench_with_input(BenchmarkId::new("cartesian_to_polar", size), &size, |b, _| {
            b.iter(|| v_cartesian_to_polar(&mut mag, &mut phase, black_box(&re), black_box(&im)))
        });

        let mut re_out = vec![0.0; bins];
        let mut im_out = vec![0.0; bins];
        group.bench_with_input(BenchmarkId::new("polar_to_cartesian", size), &size, |b, _| {
            b.iter(|| v_polar_to_cartesian(&mut re_out, &mut im_out, black_box(&mag), black_box(&phase)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forward, bench_forward_single, bench_inverse, bench_polar);
criterion_main!(benches);
