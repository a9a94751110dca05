// src/engine/orient.rs
//
// Coordinate remapping: 90-degree-aligned rotation, flips, and the EXIF
// orientation table that composes them.

use crate::buffer::PixelBuffer;
use crate::error::ImageToolError;
use crate::ops::FlipMode;

type OrientResult<T> = std::result::Result<T, ImageToolError>;

/// Rotate by a multiple of 90 degrees. 0 and 360 return the input unchanged;
/// anything else than 90/180/270 fails.
pub fn rotate(img: PixelBuffer, degrees: u32) -> OrientResult<PixelBuffer> {
    match degrees {
        0 | 360 => return Ok(img),
        90 | 180 | 270 => {}
        _ => return Err(ImageToolError::invalid_rotation_angle(degrees)),
    }

    let (w, h) = img.dimensions();
    let (dst_w, dst_h) = if degrees == 180 { (w, h) } else { (h, w) };
    let mut dst = PixelBuffer::new(dst_w, dst_h)?;

    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = match degrees {
                // Clockwise quarter turn
                90 => (h - 1 - y, x),
                // Point reflection
                180 => (w - 1 - x, h - 1 - y),
                // Counter-clockwise quarter turn
                _ => (y, w - 1 - x),
            };
            dst.put_pixel(dx, dy, img.pixel(x, y));
        }
    }
    Ok(dst)
}

/// Mirror the buffer horizontally, vertically, or both.
pub fn flip(img: PixelBuffer, mode: FlipMode) -> PixelBuffer {
    let (w, h) = img.dimensions();
    let mut dst = img.clone();

    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = match mode {
                FlipMode::Horizontal => (w - 1 - x, y),
                FlipMode::Vertical => (x, h - 1 - y),
                FlipMode::Both => (w - 1 - x, h - 1 - y),
            };
            dst.put_pixel(dx, dy, img.pixel(x, y));
        }
    }
    dst
}

/// Undo an EXIF orientation (1-8). Missing or out-of-range values are a
/// no-op, as is orientation 1.
pub fn autorotate(img: PixelBuffer, orientation: Option<u16>) -> OrientResult<PixelBuffer> {
    let img = match orientation {
        Some(2) => flip(img, FlipMode::Horizontal),
        Some(3) => rotate(img, 180)?,
        Some(4) => flip(img, FlipMode::Vertical),
        Some(5) => rotate(flip(img, FlipMode::Vertical), 90)?,
        Some(6) => rotate(img, 90)?,
        Some(7) => rotate(flip(img, FlipMode::Horizontal), 90)?,
        Some(8) => rotate(img, 270)?,
        _ => img,
    };
    Ok(img)
}
