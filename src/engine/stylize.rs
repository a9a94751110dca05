// src/engine/stylize.rs
//
// In-place pixel rewrites: pixelate (block averaging), meshify (dot grid),
// grayscale (luma mapping).

use crate::buffer::{Pixel, PixelBuffer};
use crate::color::luma;
use crate::error::ImageToolError;
use crate::ops::MeshifyOptions;

type StylizeResult<T> = std::result::Result<T, ImageToolError>;

/// Replace every `blocksize` x `blocksize` block with its average color.
/// Blocks at the right and bottom edges may be partial; each of R, G, B, A
/// is averaged independently over the pixels the block actually covers.
pub fn pixelate(img: &mut PixelBuffer, blocksize: u32) -> StylizeResult<()> {
    if blocksize == 0 {
        return Err(ImageToolError::invalid_block_size(blocksize));
    }

    let (w, h) = img.dimensions();
    let mut y = 0;
    while y < h {
        let block_h = blocksize.min(h - y);
        let mut x = 0;
        while x < w {
            let block_w = blocksize.min(w - x);

            let mut sums = [0u64; 4];
            for by in y..y + block_h {
                for bx in x..x + block_w {
                    let p = img.pixel(bx, by);
                    sums[0] += p.r as u64;
                    sums[1] += p.g as u64;
                    sums[2] += p.b as u64;
                    sums[3] += p.a as u64;
                }
            }
            let total = block_w as u64 * block_h as u64;
            let avg = Pixel::new(
                (sums[0] / total) as u8,
                (sums[1] / total) as u8,
                (sums[2] / total) as u8,
                (sums[3] / total) as u8,
            );

            for by in y..y + block_h {
                for bx in x..x + block_w {
                    img.put_pixel(bx, by, avg);
                }
            }
            x += blocksize;
        }
        y += blocksize;
    }
    Ok(())
}

/// Overlay an opaque dot at every pixel whose coordinates are both multiples
/// of the block size. Everything else stays untouched.
pub fn meshify(img: &mut PixelBuffer, opts: &MeshifyOptions) -> StylizeResult<()> {
    if opts.blocksize == 0 {
        return Err(ImageToolError::invalid_block_size(opts.blocksize));
    }
    let [r, g, b] = opts.color.resolve()?;
    let dot = Pixel::opaque(r, g, b);

    let (w, h) = img.dimensions();
    let step = opts.blocksize as usize;
    for y in (0..h).step_by(step) {
        for x in (0..w).step_by(step) {
            img.put_pixel(x, y, dot);
        }
    }
    Ok(())
}

/// Map every pixel to its luma gray, preserving alpha.
pub fn grayscale(img: &mut PixelBuffer) {
    for px in img.data_mut().chunks_exact_mut(4) {
        let gray = luma(px[0], px[1], px[2]);
        px[0] = gray;
        px[1] = gray;
        px[2] = gray;
    }
}
