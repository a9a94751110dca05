// src/engine/analyze.rs
//
// Color extraction: average color via a 1x1 area-average probe, dominant
// color via a 100x100 probe histogrammed over its top-left quadrant.

use crate::buffer::PixelBuffer;
use crate::color::PackedColor;
use crate::engine::resample::resample;
use crate::error::ImageToolError;
use std::collections::HashMap;

type AnalyzeResult<T> = std::result::Result<T, ImageToolError>;

/// Side of the downsampling probe used by [`dominating_color`].
const PROBE_SIZE: u32 = 100;
/// Side of the sampled quadrant within the probe. Only the top-left
/// `SAMPLE_SIZE` x `SAMPLE_SIZE` corner feeds the histogram; this sampling
/// region is part of the operation's contract, not an oversight.
const SAMPLE_SIZE: u32 = 50;

/// Average color of the whole image: one area-averaged pixel.
pub fn average_color(img: &PixelBuffer) -> AnalyzeResult<PackedColor> {
    let probe = resample(img, 1, 1)?;
    let p = probe.pixel(0, 0);
    Ok(PackedColor::from_rgb([p.r, p.g, p.b]))
}

/// Most frequent color in the probe's top-left quadrant. Ties go to the
/// color seen first in row-major order.
pub fn dominating_color(img: &PixelBuffer) -> AnalyzeResult<PackedColor> {
    let probe = resample(img, PROBE_SIZE, PROBE_SIZE)?;

    let mut counts: HashMap<[u8; 4], u32> = HashMap::new();
    for y in 0..SAMPLE_SIZE {
        for x in 0..SAMPLE_SIZE {
            *counts.entry(probe.pixel(x, y).to_array()).or_insert(0) += 1;
        }
    }

    // Re-walk in sampling order so equal counts resolve to the color that
    // appeared first.
    let mut best = probe.pixel(0, 0);
    let mut best_count = 0u32;
    for y in 0..SAMPLE_SIZE {
        for x in 0..SAMPLE_SIZE {
            let p = probe.pixel(x, y);
            let count = counts[&p.to_array()];
            if count > best_count {
                best = p;
                best_count = count;
            }
        }
    }

    Ok(PackedColor::from_rgb([best.r, best.g, best.b]))
}
