// src/engine/sharpen.rs
//
// Unsharp mask: blur with a fixed 3x3 kernel, then push each channel away
// from its blurred value wherever the difference clears the threshold.
// Parameter calibration follows the classic Photoshop-style scaling.

use crate::buffer::{Pixel, PixelBuffer};
use crate::ops::UnsharpMaskOptions;

/// 3x3 Gaussian-like low-pass, normalized by 16.
const KERNEL: [[u32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

/// Sharpen in place.
///
/// Calibration: `amount` is capped at 500 and scaled by 0.016, `radius` is
/// capped at 50, doubled and rounded, `threshold` is a raw 0-255 channel
/// difference. A calibrated radius of 0 leaves the buffer untouched.
pub fn unsharp_mask(img: &mut PixelBuffer, opts: &UnsharpMaskOptions) {
    let amount = opts.amount.min(500.0) * 0.016;
    let radius = (opts.radius.min(50.0) * 2.0).round().abs();
    let threshold = opts.threshold;

    if radius == 0.0 {
        return;
    }

    let blurred = blur3(img);
    let (w, h) = img.dimensions();

    for y in 0..h {
        for x in 0..w {
            let orig = img.pixel(x, y);
            let blur = blurred.pixel(x, y);

            // Each channel decides independently whether it differs enough
            // from the blur to be pushed. Threshold 0 sharpens everything.
            let channel = |orig: u8, blur: u8| -> u8 {
                let diff = orig as f64 - blur as f64;
                if diff.abs() >= threshold as f64 {
                    (orig as f64 + amount * diff).clamp(0.0, 255.0) as u8
                } else {
                    orig
                }
            };

            img.put_pixel(
                x,
                y,
                Pixel::new(
                    channel(orig.r, blur.r),
                    channel(orig.g, blur.g),
                    channel(orig.b, blur.b),
                    orig.a,
                ),
            );
        }
    }
}

/// Blur RGB with the fixed kernel, replicating edge pixels. Alpha passes
/// through untouched.
fn blur3(src: &PixelBuffer) -> PixelBuffer {
    let (w, h) = src.dimensions();
    let mut out = src.clone();

    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut acc = [0u32; 3];
            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, &weight) in row.iter().enumerate() {
                    let sx = (x + kx as i64 - 1).clamp(0, w as i64 - 1) as u32;
                    let sy = (y + ky as i64 - 1).clamp(0, h as i64 - 1) as u32;
                    let p = src.pixel(sx, sy);
                    acc[0] += weight * p.r as u32;
                    acc[1] += weight * p.g as u32;
                    acc[2] += weight * p.b as u32;
                }
            }
            let alpha = src.pixel(x as u32, y as u32).a;
            out.put_pixel(
                x as u32,
                y as u32,
                Pixel::new(
                    (acc[0] / 16) as u8,
                    (acc[1] / 16) as u8,
                    (acc[2] / 16) as u8,
                    alpha,
                ),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut img = PixelBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                img.put_pixel(x, y, Pixel::opaque((x * 40) as u8, (y * 40) as u8, 128));
            }
        }
        img
    }

    #[test]
    fn test_zero_radius_is_byte_identical_noop() {
        let mut img = gradient(5, 5);
        let before = img.clone();
        unsharp_mask(
            &mut img,
            &UnsharpMaskOptions {
                amount: 80.0,
                radius: 0.0,
                threshold: 0,
            },
        );
        assert_eq!(img, before);

        // Radius small enough to calibrate down to zero behaves the same.
        unsharp_mask(
            &mut img,
            &UnsharpMaskOptions {
                amount: 80.0,
                radius: 0.2,
                threshold: 0,
            },
        );
        assert_eq!(img, before);
    }

    #[test]
    fn test_flat_image_is_unchanged() {
        let mut img = PixelBuffer::filled(6, 6, Pixel::opaque(90, 90, 90)).unwrap();
        let before = img.clone();
        unsharp_mask(&mut img, &UnsharpMaskOptions::default());
        assert_eq!(img, before);
    }

    #[test]
    fn test_edge_gets_amplified() {
        // Mid-gray vertical edge (100 | 150): boundary pixels move apart,
        // flat areas away from the edge stay put.
        let mut img = PixelBuffer::filled(6, 4, Pixel::opaque(100, 100, 100)).unwrap();
        for y in 0..4 {
            for x in 3..6 {
                img.put_pixel(x, y, Pixel::opaque(150, 150, 150));
            }
        }
        unsharp_mask(
            &mut img,
            &UnsharpMaskOptions {
                amount: 200.0,
                radius: 1.0,
                threshold: 0,
            },
        );
        assert_eq!(img.pixel(0, 1).r, 100);
        assert_eq!(img.pixel(5, 1).r, 150);
        // amount calibrates to 3.2; blur at the boundary is 112/137.
        assert!(img.pixel(2, 1).r < 100, "dark side overshoots darker");
        assert!(img.pixel(3, 1).r > 150, "bright side overshoots brighter");
    }

    #[test]
    fn test_threshold_masks_small_differences() {
        // A barely-noisy flat area with a high threshold stays put.
        let mut img = PixelBuffer::filled(5, 5, Pixel::opaque(100, 100, 100)).unwrap();
        img.put_pixel(2, 2, Pixel::opaque(102, 100, 100));
        let before = img.clone();
        unsharp_mask(
            &mut img,
            &UnsharpMaskOptions {
                amount: 300.0,
                radius: 1.0,
                threshold: 50,
            },
        );
        assert_eq!(img, before);
    }

    #[test]
    fn test_alpha_is_never_modified() {
        let mut img = PixelBuffer::new(4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                img.put_pixel(x, y, Pixel::new((x * 80) as u8, 0, 0, (y * 60) as u8));
            }
        }
        let alphas: Vec<u8> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .map(|(x, y)| img.pixel(x, y).a)
            .collect();
        unsharp_mask(
            &mut img,
            &UnsharpMaskOptions {
                amount: 400.0,
                radius: 2.0,
                threshold: 0,
            },
        );
        let after: Vec<u8> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .map(|(x, y)| img.pixel(x, y).a)
            .collect();
        assert_eq!(alphas, after);
    }

    #[test]
    fn test_blur3_averages_neighbors() {
        // Single white pixel in black surroundings: center keeps 4/16 of it.
        let mut img = PixelBuffer::new(3, 3).unwrap();
        img.put_pixel(1, 1, Pixel::WHITE);
        let blurred = blur3(&img);
        assert_eq!(blurred.pixel(1, 1).r as u32, 255 * 4 / 16);
        assert_eq!(blurred.pixel(0, 0).r as u32, 255 / 16);
        assert_eq!(blurred.pixel(1, 0).r as u32, 255 * 2 / 16);
    }
}
