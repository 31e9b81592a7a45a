//! Benchmarks for the per-frame glyph conversion.
//!
//! Run with: cargo bench -p ac-ascii
#![allow(clippy::unwrap_used)]

use ac_ascii::compositor::Compositor;
use ac_ascii::mapper::GlyphMapper;
use ac_ascii::sampler::sample_cells;
use ac_core::color::Rgb;
use ac_core::config::{ColorLevel, ColorMode, GlyphSet, RenderConfig};
use ac_core::frame::DecodedImage;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Diagonal color gradient, every cell different.
fn gradient(w: u32, h: u32) -> DecodedImage {
    let mut img = DecodedImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            img.set_rgb(x, y, Rgb((x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8));
        }
    }
    img
}

fn bench_mapper(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyph_mapper");
    let img = gradient(200, 60);
    group.throughput(Throughput::Elements(200 * 60));

    for (name, config) in [
        ("plain", RenderConfig::default()),
        (
            "ansi256",
            RenderConfig {
                color_mode: ColorMode::Original,
                color_level: ColorLevel::Ansi256,
                ..RenderConfig::default()
            },
        ),
    ] {
        let mapper = GlyphMapper::new(&config).unwrap();
        group.bench_with_input(BenchmarkId::new("map_sample_grid", name), &img, |b, img| {
            b.iter(|| mapper.map_sample_grid(sample_cells(black_box(img))));
        });
    }
    group.finish();
}

fn bench_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");
    for dither in [false, true] {
        let config = RenderConfig {
            glyphs: GlyphSet::Braille,
            dither,
            ..RenderConfig::default()
        };
        let compositor = Compositor::new(&config).unwrap();
        let img = gradient(400, 240);
        group.bench_with_input(BenchmarkId::new("braille", dither), &img, |b, img| {
            b.iter(|| compositor.process(black_box(img)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mapper, bench_compositor);
criterion_main!(benches);
