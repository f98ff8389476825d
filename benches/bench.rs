use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rgbabench::convert::{bgr24_to_rgba32, bgra32_to_rgba32, rgb24_to_rgba32};
use rgbabench::resource::{self, DEFAULT_RESOURCE};
use rgbabench::{Strategy, StrategyKind};

pub fn bench_convert(c: &mut Criterion) {
    let (width, height) = (1024, 768);
    let rgb: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
    let mut bgra: Vec<u8> = (0..width * height * 4).map(|i| (i % 253) as u8).collect();

    c.bench_function("bgra32_to_rgba32 1024x768", |b| {
        b.iter(|| {
            bgra32_to_rgba32(black_box(&mut bgra));
        })
    });
    c.bench_function("rgb24_to_rgba32 1024x768", |b| {
        b.iter(|| black_box(rgb24_to_rgba32(&rgb, width, height)).unwrap())
    });
    c.bench_function("bgr24_to_rgba32 1024x768", |b| {
        b.iter(|| black_box(bgr24_to_rgba32(&rgb, width, height)).unwrap())
    });
}

pub fn bench_strategies(c: &mut Criterion) {
    let data = resource::load(DEFAULT_RESOURCE).unwrap();
    for kind in StrategyKind::available() {
        let strategy = kind.build().unwrap();
        c.bench_function(&format!("{} (decode {})", DEFAULT_RESOURCE, strategy.name()), |b| {
            b.iter(|| black_box(strategy.decode(black_box(data))).unwrap())
        });
    }
}

criterion_group!(benches, bench_convert, bench_strategies);
criterion_main!(benches);
