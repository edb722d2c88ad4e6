use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use repet::primitives::{acorr, stft};

fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / fs).sin())
        .collect()
}

fn benchmark_stft_varying_length(c: &mut Criterion) {
    let fs = 8000.0;
    let mut group = c.benchmark_group("stft");

    for seconds in [4, 8, 16, 32].iter() {
        let n = seconds * fs as usize;
        let signal = sine(440.0, fs, n);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{seconds}s")),
            &signal,
            |b, signal| {
                b.iter(|| {
                    let (spec, _params) = stft(black_box(signal), fs).unwrap();
                    black_box(spec);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_acorr(c: &mut Criterion) {
    let fs = 8000.0;
    let n = 16 * fs as usize;
    let signal = sine(220.0, fs, n);
    let (spec, _params) = stft(&signal, fs).unwrap();
    let half = spec.nrows() / 2 + 1;
    let magnitude = spec
        .slice(ndarray::s![0..half, ..])
        .mapv(|v| v.norm() * v.norm());

    c.bench_function("acorr_magnitude_spectrogram", |b| {
        b.iter(|| {
            let result = acorr(black_box(&magnitude)).unwrap();
            black_box(result);
        });
    });
}

criterion_group!(benches, benchmark_stft_varying_length, benchmark_acorr);
criterion_main!(benches);
