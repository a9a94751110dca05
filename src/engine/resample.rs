// src/engine/resample.rs
//
// Area-averaged resampling on top of fast_image_resize. All scaling in the
// crate funnels through here: resize, watermark scaling, and the color
// analyzers' downsampling probes. Alpha is premultiplied around the resize
// so semi-transparent pixels do not bleed color.

use crate::buffer::PixelBuffer;
use crate::engine::geometry::SourceWindow;
use crate::error::ImageToolError;
use fast_image_resize::{self as fir, FilterType, MulDiv, PixelType, ResizeAlg, ResizeOptions};

type ResampleResult<T> = std::result::Result<T, ImageToolError>;

fn area_average() -> ResizeOptions {
    ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box))
}

/// Resample the whole buffer to a new size.
pub fn resample(src: &PixelBuffer, dst_width: u32, dst_height: u32) -> ResampleResult<PixelBuffer> {
    let window = SourceWindow::full(src.width(), src.height());
    resample_window(src, &window, dst_width, dst_height)
}

/// Resample a (possibly fractional) source window to a new size.
pub fn resample_window(
    src: &PixelBuffer,
    window: &SourceWindow,
    dst_width: u32,
    dst_height: u32,
) -> ResampleResult<PixelBuffer> {
    let src_dims = src.dimensions();
    let dst_dims = (dst_width, dst_height);

    if dst_width == 0 || dst_height == 0 {
        return Err(ImageToolError::resample_failed(
            src_dims,
            dst_dims,
            "invalid target dimensions",
        ));
    }

    let mut src_image = fir::images::Image::new(src.width(), src.height(), PixelType::U8x4);
    src_image.buffer_mut().copy_from_slice(src.data());
    let mut dst_image = fir::images::Image::new(dst_width, dst_height, PixelType::U8x4);

    let mul_div = MulDiv::default();
    mul_div
        .multiply_alpha_inplace(&mut src_image)
        .map_err(|e| {
            ImageToolError::resample_failed(src_dims, dst_dims, format!("premultiply failed: {e}"))
        })?;

    let options = area_average().crop(window.x, window.y, window.width, window.height);
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| {
            ImageToolError::resample_failed(src_dims, dst_dims, format!("resize error: {e:?}"))
        })?;

    mul_div
        .divide_alpha_inplace(&mut dst_image)
        .map_err(|e| {
            ImageToolError::resample_failed(src_dims, dst_dims, format!("unpremultiply failed: {e}"))
        })?;

    PixelBuffer::from_raw(dst_width, dst_height, dst_image.into_vec())
}
