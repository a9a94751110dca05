// src/engine/compose.rs
//
// Alpha-aware compositing. `blend` merges a region of one buffer onto
// another honoring both the source's own alpha channel and a caller opacity;
// `copy_region` is the opaque raw copy used for letterbox padding. Both clip
// silently at the destination and source bounds.

use crate::buffer::{Pixel, PixelBuffer, CHANNELS};

/// Overlap of a `extent`-wide span placed at `dst_off`/`src_off` with both
/// buffers. Returns (dst_start, src_start, count) or None when nothing lands.
fn clip_span(
    dst_dim: u32,
    src_dim: u32,
    dst_off: i64,
    src_off: i64,
    extent: u32,
) -> Option<(u32, u32, u32)> {
    let mut start = 0i64;
    if dst_off < 0 {
        start = start.max(-dst_off);
    }
    if src_off < 0 {
        start = start.max(-src_off);
    }
    let end = (extent as i64)
        .min(dst_dim as i64 - dst_off)
        .min(src_dim as i64 - src_off);
    if end <= start {
        return None;
    }
    Some((
        (dst_off + start) as u32,
        (src_off + start) as u32,
        (end - start) as u32,
    ))
}

/// Blend a `width` x `height` region of `src` onto `dst` at
/// `(dst_x, dst_y)`, reading from `(src_x, src_y)`.
///
/// The effective per-pixel factor is `opacity/100 * src_alpha/255`: a naive
/// RGB-only merge ignores the source's own alpha and halos semi-transparent
/// edges. Destination alpha only ever increases (max of old and effective).
#[allow(clippy::too_many_arguments)]
pub fn blend(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    dst_x: i64,
    dst_y: i64,
    src_x: i64,
    src_y: i64,
    width: u32,
    height: u32,
    opacity: u8,
) {
    let opacity = opacity.min(100) as f32 / 100.0;
    if opacity == 0.0 {
        return;
    }

    let Some((dx0, sx0, cols)) = clip_span(dst.width(), src.width(), dst_x, src_x, width) else {
        return;
    };
    let Some((dy0, sy0, rows)) = clip_span(dst.height(), src.height(), dst_y, src_y, height)
    else {
        return;
    };

    for row in 0..rows {
        for col in 0..cols {
            let s = src.pixel(sx0 + col, sy0 + row);
            if s.a == 0 {
                continue;
            }
            let d = dst.pixel(dx0 + col, dy0 + row);
            let t = opacity * (s.a as f32 / 255.0);
            let lerp = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * t).round() as u8;
            let alpha = d.a.max((t * 255.0).round() as u8);
            dst.put_pixel(
                dx0 + col,
                dy0 + row,
                Pixel::new(lerp(d.r, s.r), lerp(d.g, s.g), lerp(d.b, s.b), alpha),
            );
        }
    }
}

/// Opaque raw copy of a region, alpha included. Used for centering a resized
/// image on a padding canvas.
#[allow(clippy::too_many_arguments)]
pub fn copy_region(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    dst_x: i64,
    dst_y: i64,
    src_x: i64,
    src_y: i64,
    width: u32,
    height: u32,
) {
    let Some((dx0, sx0, cols)) = clip_span(dst.width(), src.width(), dst_x, src_x, width) else {
        return;
    };
    let Some((dy0, sy0, rows)) = clip_span(dst.height(), src.height(), dst_y, src_y, height)
    else {
        return;
    };

    let dst_stride = dst.width() as usize * CHANNELS;
    let src_stride = src.width() as usize * CHANNELS;
    let bytes = cols as usize * CHANNELS;
    for row in 0..rows as usize {
        let d = (dy0 as usize + row) * dst_stride + dx0 as usize * CHANNELS;
        let s = (sy0 as usize + row) * src_stride + sx0 as usize * CHANNELS;
        let src_row = &src.data()[s..s + bytes];
        dst.data_mut()[d..d + bytes].copy_from_slice(src_row);
    }
}
