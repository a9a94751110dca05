// benches/benchmark.rs
//
// Criterion benchmarks for the hot transforms: resample-heavy resize,
// convolution-heavy unsharp mask, and the pure remapping paths.

use criterion::{criterion_group, criterion_main, Criterion};
use imagetool::{
    pixelate, resize, rotate, unsharp_mask, watermark, Pixel, PixelBuffer, ResizeOptions,
    UnsharpMaskOptions, WatermarkOptions,
};
use std::hint::black_box;

fn test_image(width: u32, height: u32) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            img.put_pixel(
                x,
                y,
                Pixel::opaque((x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8),
            );
        }
    }
    img
}

fn bench_resize(c: &mut Criterion) {
    let img = test_image(1024, 768);
    c.bench_function("resize_1024_to_256_crop", |b| {
        b.iter(|| {
            let out = resize(
                black_box(img.clone()),
                &ResizeOptions {
                    width: Some(256),
                    height: Some(256),
                    ..ResizeOptions::default()
                },
            )
            .unwrap();
            black_box(out)
        })
    });
}

fn bench_unsharp_mask(c: &mut Criterion) {
    let img = test_image(512, 512);
    c.bench_function("unsharp_mask_512", |b| {
        b.iter(|| {
            let mut img = black_box(img.clone());
            unsharp_mask(&mut img, &UnsharpMaskOptions::default());
            black_box(img)
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let img = test_image(512, 512);
    c.bench_function("rotate_90_512", |b| {
        b.iter(|| black_box(rotate(black_box(img.clone()), 90).unwrap()))
    });
}

fn bench_pixelate(c: &mut Criterion) {
    let img = test_image(512, 512);
    c.bench_function("pixelate_512_block_8", |b| {
        b.iter(|| {
            let mut img = black_box(img.clone());
            pixelate(&mut img, 8).unwrap();
            black_box(img)
        })
    });
}

fn bench_watermark_tiled(c: &mut Criterion) {
    let img = test_image(1024, 768);
    let wm = test_image(64, 64);
    c.bench_function("watermark_tiled_1024", |b| {
        b.iter(|| {
            let out = watermark(
                black_box(img.clone()),
                &wm,
                &WatermarkOptions {
                    repeat: true,
                    opacity: 40,
                    ..WatermarkOptions::default()
                },
            )
            .unwrap();
            black_box(out)
        })
    });
}

criterion_group!(
    benches,
    bench_resize,
    bench_unsharp_mask,
    bench_rotate,
    bench_pixelate,
    bench_watermark_tiled
);
criterion_main!(benches);
