use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spectral_downsampler::{SpectralEngine, TransformOptions, WindowType};

fn bench_transform(c: &mut Criterion) {
    let input: Vec<i32> = (0..3072).map(|i| ((i * 7919) % 20001 - 10000) * 1000).collect();
    let mut output = vec![0; 768];
    let mut engine = SpectralEngine::prepare(3072, 768).unwrap();

    c.bench_function("transform 3072→768", |b| {
        b.iter(|| {
            engine
                .transform(black_box(&input), &mut output, &TransformOptions::default())
                .unwrap()
        })
    });

    let hann = TransformOptions {
        window: WindowType::Hann,
        ..Default::default()
    };
    c.bench_function("transform 3072→768 hann", |b| {
        b.iter(|| engine.transform(black_box(&input), &mut output, &hann).unwrap())
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
