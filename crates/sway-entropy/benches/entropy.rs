use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng as _;
use rand_distr::{Distribution as _, StandardNormal};
use rand_pcg::Pcg64Mcg;
use std::hint::black_box;
use sway_entropy::{
    cancel::CancelToken, multiscale::multiscale_entropy, sample_entropy::sample_entropy,
};

fn white_noise(len: usize) -> Vec<f64> {
    let mut rng = Pcg64Mcg::seed_from_u64(0);
    (0..len).map(|_| StandardNormal.sample(&mut rng)).collect()
}

fn bench_sample_entropy(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_entropy");
    for len in [500, 2000] {
        let signal = white_noise(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_function(format!("noise_{len}"), |b| {
            b.iter(|| sample_entropy(black_box(&signal), 2, 0.2));
        });
    }
    group.finish();
}

fn bench_multiscale(c: &mut Criterion) {
    let signal = white_noise(3000);
    let cancel = CancelToken::new();
    c.bench_function("multiscale_noise_3000_s20", |b| {
        b.iter(|| black_box(multiscale_entropy(black_box(&signal), 20, 2, 0.15, &cancel)));
    });
}

criterion_group!(benches, bench_sample_entropy, bench_multiscale);
criterion_main!(benches);
