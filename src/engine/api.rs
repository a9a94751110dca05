// src/engine/api.rs
//
// The compound operations: resize (plan + resample + background + padding)
// and watermark (plan + scale + blend). Everything else is a single
// component call and lives with its component.

use crate::buffer::{Pixel, PixelBuffer};
use crate::engine::geometry::{self, WatermarkPlan};
use crate::engine::{codec, compose, resample};
use crate::error::ImageToolError;
use crate::ops::{ResizeOptions, WatermarkOptions};

type ApiResult<T> = std::result::Result<T, ImageToolError>;

/// Alpha survives a resize only when both the source and destination
/// formats can carry it; a transparent source headed for an opaque format
/// is flattened onto white.
fn flatten_to_white(opts: &ResizeOptions) -> bool {
    match opts.input_format {
        Some(input) if codec::supports_alpha(input) => {
            !opts.output_format.is_some_and(codec::supports_alpha)
        }
        _ => false,
    }
}

/// Resize `src` according to `opts`.
///
/// Follows the plan from [`geometry::plan_resize`]: area-averaged resample
/// of the planned source window, optional white flattening, then an
/// optional letterbox canvas at the originally requested size.
pub fn resize(src: PixelBuffer, opts: &ResizeOptions) -> ApiResult<PixelBuffer> {
    let plan = geometry::plan_resize(src.width(), src.height(), opts)?;
    let mut resized = resample::resample_window(&src, &plan.src, plan.width, plan.height)?;

    if flatten_to_white(opts) {
        let mut canvas = PixelBuffer::filled(plan.width, plan.height, Pixel::WHITE)?;
        compose::blend(&mut canvas, &resized, 0, 0, 0, 0, plan.width, plan.height, 100);
        resized = canvas;
    }

    let Some((canvas_w, canvas_h)) = plan.canvas else {
        return Ok(resized);
    };

    let [r, g, b] = opts.paddings.resolve_color()?;
    let mut canvas = PixelBuffer::filled(canvas_w, canvas_h, Pixel::opaque(r, g, b))?;
    let x = ((canvas_w as f64 - plan.width as f64) / 2.0).round() as i64;
    let y = ((canvas_h as f64 - plan.height as f64) / 2.0).round() as i64;
    compose::copy_region(&mut canvas, &resized, x, y, 0, 0, plan.width, plan.height);
    Ok(canvas)
}

/// Composite `wm` onto `img` according to `opts`.
pub fn watermark(
    img: PixelBuffer,
    wm: &PixelBuffer,
    opts: &WatermarkOptions,
) -> ApiResult<PixelBuffer> {
    let mut img = img;
    match geometry::plan_watermark(img.dimensions(), wm.dimensions(), opts) {
        WatermarkPlan::Stretch { width, height } => {
            let scaled = resample::resample(wm, width, height)?;
            compose::blend(&mut img, &scaled, 0, 0, 0, 0, width, height, 100);
        }
        WatermarkPlan::Fit { rect } => {
            let scaled = resample::resample(wm, rect.width, rect.height)?;
            compose::blend(
                &mut img,
                &scaled,
                rect.x,
                rect.y,
                0,
                0,
                rect.width,
                rect.height,
                100,
            );
        }
        WatermarkPlan::Place { origins } => {
            let (ww, wh) = wm.dimensions();
            for (x, y) in origins {
                compose::blend(&mut img, wm, x, y, 0, 0, ww, wh, opts.opacity);
            }
        }
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{Paddings, WatermarkPosition};
    use image::ImageFormat;

    fn solid(w: u32, h: u32, p: Pixel) -> PixelBuffer {
        PixelBuffer::filled(w, h, p).unwrap()
    }

    #[test]
    fn test_resize_plain_downscale() {
        let src = solid(100, 100, Pixel::opaque(40, 80, 120));
        let out = resize(
            src,
            &ResizeOptions {
                width: Some(10),
                height: Some(10),
                ..ResizeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.pixel(5, 5), Pixel::opaque(40, 80, 120));
    }

    #[test]
    fn test_resize_crop_output_matches_request() {
        let src = solid(300, 100, Pixel::WHITE);
        let out = resize(
            src,
            &ResizeOptions {
                width: Some(50),
                height: Some(50),
                ..ResizeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.dimensions(), (50, 50));
    }

    #[test]
    fn test_resize_keep_ratio_with_padding_restores_request() {
        // 200x100 into 100x100 keep-ratio: content is 100x50, letterboxed
        // onto a white 100x100 canvas with 25px bands.
        let src = solid(200, 100, Pixel::opaque(0, 0, 255));
        let out = resize(
            src,
            &ResizeOptions {
                width: Some(100),
                height: Some(100),
                keep_ratio: true,
                ..ResizeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.pixel(50, 10), Pixel::WHITE);
        assert_eq!(out.pixel(50, 50), Pixel::opaque(0, 0, 255));
        assert_eq!(out.pixel(50, 90), Pixel::WHITE);
    }

    #[test]
    fn test_resize_padding_color() {
        let src = solid(200, 100, Pixel::opaque(0, 0, 255));
        let out = resize(
            src,
            &ResizeOptions {
                width: Some(100),
                height: Some(100),
                keep_ratio: true,
                paddings: Paddings::Color(crate::color::ColorSpec::Hex("#ff0000".into())),
                ..ResizeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.pixel(50, 5), Pixel::opaque(255, 0, 0));
    }

    #[test]
    fn test_resize_no_enlarge_returns_input_size() {
        let src = solid(60, 40, Pixel::WHITE);
        let out = resize(
            src,
            &ResizeOptions {
                width: Some(500),
                height: Some(500),
                enlarge: false,
                ..ResizeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.dimensions(), (60, 40));
    }

    #[test]
    fn test_resize_flattens_alpha_for_opaque_output() {
        // Half-transparent red PNG resized for JPEG output: composited on
        // white.
        let src = solid(10, 10, Pixel::new(255, 0, 0, 128));
        let out = resize(
            src,
            &ResizeOptions {
                width: Some(10),
                height: Some(10),
                input_format: Some(ImageFormat::Png),
                output_format: Some(ImageFormat::Jpeg),
                ..ResizeOptions::default()
            },
        )
        .unwrap();
        let p = out.pixel(5, 5);
        assert_eq!(p.a, 255);
        assert!(p.r > 200 && p.g > 100 && p.g < 160, "got {p:?}");
    }

    #[test]
    fn test_resize_preserves_alpha_for_alpha_output() {
        let src = solid(10, 10, Pixel::new(255, 0, 0, 128));
        let out = resize(
            src,
            &ResizeOptions {
                width: Some(5),
                height: Some(5),
                input_format: Some(ImageFormat::Png),
                output_format: Some(ImageFormat::Png),
                ..ResizeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.pixel(2, 2).a, 128);
    }

    #[test]
    fn test_watermark_stretch_covers_everything() {
        let img = solid(100, 100, Pixel::opaque(0, 0, 0));
        let wm = solid(50, 50, Pixel::opaque(9, 99, 199));
        let out = watermark(
            img,
            &wm,
            &WatermarkOptions {
                scale: true,
                stretch: true,
                ..WatermarkOptions::default()
            },
        )
        .unwrap();
        for y in 0..100 {
            for x in 0..100 {
                assert_eq!(out.pixel(x, y), Pixel::opaque(9, 99, 199));
            }
        }
    }

    #[test]
    fn test_watermark_fit_leaves_margins() {
        // Wide canvas, square watermark: left and right margins stay.
        let img = solid(200, 100, Pixel::opaque(0, 0, 0));
        let wm = solid(10, 10, Pixel::WHITE);
        let out = watermark(
            img,
            &wm,
            &WatermarkOptions {
                scale: true,
                ..WatermarkOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.pixel(10, 50), Pixel::opaque(0, 0, 0));
        assert_eq!(out.pixel(100, 50), Pixel::WHITE);
        assert_eq!(out.pixel(190, 50), Pixel::opaque(0, 0, 0));
    }

    #[test]
    fn test_watermark_positioned_with_opacity() {
        let img = solid(10, 10, Pixel::opaque(0, 0, 0));
        let wm = solid(2, 2, Pixel::opaque(200, 200, 200));
        let out = watermark(
            img,
            &wm,
            &WatermarkOptions {
                position: WatermarkPosition::BottomRight,
                opacity: 50,
                ..WatermarkOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out.pixel(9, 9), Pixel::opaque(100, 100, 100));
        assert_eq!(out.pixel(7, 7), Pixel::opaque(0, 0, 0));
    }

    #[test]
    fn test_watermark_tiled_covers_canvas() {
        let img = solid(50, 50, Pixel::opaque(0, 0, 0));
        let wm = solid(20, 20, Pixel::WHITE);
        for position in [
            WatermarkPosition::TopLeft,
            WatermarkPosition::TopRight,
            WatermarkPosition::BottomRight,
            WatermarkPosition::BottomLeft,
            WatermarkPosition::Center,
        ] {
            let out = watermark(
                img.clone(),
                &wm,
                &WatermarkOptions {
                    repeat: true,
                    position,
                    ..WatermarkOptions::default()
                },
            )
            .unwrap();
            for y in 0..50 {
                for x in 0..50 {
                    assert_eq!(out.pixel(x, y), Pixel::WHITE, "{position:?} at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_watermark_semi_transparent_blend() {
        let img = solid(4, 4, Pixel::opaque(0, 0, 0));
        let wm = solid(4, 4, Pixel::new(255, 255, 255, 128));
        let out = watermark(img, &wm, &WatermarkOptions::default()).unwrap();
        let p = out.pixel(2, 2);
        assert!((p.r as i32 - 128).abs() <= 1, "got {p:?}");
    }
}
