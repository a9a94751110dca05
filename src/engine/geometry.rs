// src/engine/geometry.rs
//
// Pure placement math: resize planning (crop / keep-ratio / enlarge /
// letterbox) and watermark layout (stretch / fit / anchors / tiling).
// Nothing in this module touches pixels.

use crate::error::ImageToolError;
use crate::ops::{ResizeOptions, Units, WatermarkOptions, WatermarkPosition};

type GeometryResult<T> = std::result::Result<T, ImageToolError>;

/// Integer destination rectangle. The origin is signed so tiled placements
/// can start off-canvas and get clipped by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Fractional source window handed to the resampler. Fractional extents are
/// deliberate: a fill-crop of a 100x100 image into 3:2 needs a 66.67px
/// source column, and the resampler can honor it exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceWindow {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f64,
            height: height as f64,
        }
    }
}

/// Resample instruction produced by [`plan_resize`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResizePlan {
    /// Source window to resample from.
    pub src: SourceWindow,
    /// Final resampled size.
    pub width: u32,
    pub height: u32,
    /// When set, the resized image is centered on a padding canvas of this
    /// size (the originally requested box).
    pub canvas: Option<(u32, u32)>,
}

/// Compute the resample instruction for a resize request.
///
/// Order of decisions: percent conversion, keep-ratio correction, missing
/// dimension derivation, the no-enlarge clamp, then fill-crop. Keep-ratio
/// values stay fractional until the end and truncate, so the crop window and
/// the output size agree with each other.
pub fn plan_resize(
    input_width: u32,
    input_height: u32,
    opts: &ResizeOptions,
) -> GeometryResult<ResizePlan> {
    if input_width == 0 || input_height == 0 {
        return Err(ImageToolError::invalid_dimensions(
            Some(input_width),
            Some(input_height),
        ));
    }
    if opts.width == Some(0) || opts.height == Some(0) {
        return Err(ImageToolError::invalid_dimensions(opts.width, opts.height));
    }

    let iw = input_width as f64;
    let ih = input_height as f64;

    let mut want_w = opts.width.map(f64::from);
    let mut want_h = opts.height.map(f64::from);

    if opts.units == Units::Percent {
        want_w = want_w.map(|w| (iw * w / 100.0).round());
        want_h = want_h.map(|h| (ih * h / 100.0).round());
    }

    // The box the caller actually asked for; padding restores it at the end.
    let requested = match (want_w, want_h) {
        (Some(w), Some(h)) => Some((w, h)),
        _ => None,
    };

    if opts.keep_ratio {
        if let (Some(w), Some(h)) = (want_w, want_h) {
            if iw / ih > w / h {
                want_h = Some(ih * w / iw);
            } else {
                want_w = Some(iw * h / ih);
            }
        }
    }

    let (mut w, mut h) = match (want_w, want_h) {
        (None, None) => (iw, ih),
        (Some(w), None) => (w, (w * ih / iw).round()),
        (None, Some(h)) => ((h * iw / ih).round(), h),
        (Some(w), Some(h)) => (w, h),
    };

    let mut src = SourceWindow::full(input_width, input_height);

    if !opts.enlarge && (w > iw || h > ih) {
        w = iw;
        h = ih;
    } else if opts.crop {
        // Fill crop: trim the relatively-longer source dimension symmetrically
        // so the window matches the output aspect exactly.
        if iw / ih > w / h {
            let ratio = ih / h;
            src.width = ratio * w;
            src.x = ((iw - src.width) / 2.0).round();
        } else {
            let ratio = iw / w;
            src.height = ratio * h;
            src.y = ((ih - src.height) / 2.0).round();
        }
    }

    let out_w = w as u32;
    let out_h = h as u32;
    if out_w == 0 || out_h == 0 {
        return Err(ImageToolError::invalid_dimensions(Some(out_w), Some(out_h)));
    }

    let canvas = match requested {
        Some((req_w, req_h)) if opts.keep_ratio && opts.paddings.enabled() => {
            let (req_w, req_h) = (req_w as u32, req_h as u32);
            if req_w != out_w || req_h != out_h {
                Some((req_w, req_h))
            } else {
                None
            }
        }
        _ => None,
    };

    Ok(ResizePlan {
        src,
        width: out_w,
        height: out_h,
        canvas,
    })
}

/// Where and how a watermark lands on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum WatermarkPlan {
    /// Resample the watermark to the full canvas.
    Stretch { width: u32, height: u32 },
    /// Resample the watermark to `rect`, centered on the longer axis.
    Fit { rect: Rect },
    /// Blend the watermark as-is at each origin (one for a plain placement,
    /// many for tiling).
    Place { origins: Vec<(i64, i64)> },
}

/// Compute watermark placement for a canvas of `(width, height)` and a
/// watermark of `(wm_width, wm_height)`.
pub fn plan_watermark(
    canvas: (u32, u32),
    watermark: (u32, u32),
    opts: &WatermarkOptions,
) -> WatermarkPlan {
    let (iw, ih) = canvas;
    let (ww, wh) = watermark;

    if opts.scale {
        if opts.stretch {
            return WatermarkPlan::Stretch {
                width: iw,
                height: ih,
            };
        }
        return WatermarkPlan::Fit {
            rect: fit_rect(canvas, watermark),
        };
    }

    if opts.repeat {
        // An explicit coordinate makes no sense for tiling; fall back to the
        // centered pattern.
        let anchor = match opts.position {
            WatermarkPosition::At(_, _) => WatermarkPosition::Center,
            p => p,
        };
        return WatermarkPlan::Place {
            origins: tile_origins(iw, ih, ww, wh, anchor),
        };
    }

    WatermarkPlan::Place {
        origins: vec![anchor_origin(iw, ih, ww, wh, opts.position)],
    }
}

/// Largest box of the watermark's aspect that fits inside the canvas,
/// centered along the slack axis.
fn fit_rect(canvas: (u32, u32), watermark: (u32, u32)) -> Rect {
    let (iw, ih) = (canvas.0 as f64, canvas.1 as f64);
    let (ww, wh) = (watermark.0 as f64, watermark.1 as f64);

    let mut x = 0.0;
    let mut y = 0.0;
    let mut w = iw;
    let mut h = ih;

    if iw / ih > ww / wh {
        let ratio = ih / wh;
        w = ratio * ww;
        x = ((iw - w) / 2.0).round();
    } else {
        let ratio = iw / ww;
        h = ratio * wh;
        y = ((ih - h) / 2.0).round();
    }

    Rect {
        x: x as i64,
        y: y as i64,
        width: w as u32,
        height: h as u32,
    }
}

/// Closed-form offset of a single watermark placement.
fn anchor_origin(iw: u32, ih: u32, ww: u32, wh: u32, position: WatermarkPosition) -> (i64, i64) {
    let (iw, ih, ww, wh) = (iw as i64, ih as i64, ww as i64, wh as i64);
    match position {
        WatermarkPosition::TopLeft => (0, 0),
        WatermarkPosition::TopRight => (iw - ww, 0),
        WatermarkPosition::BottomRight => (iw - ww, ih - wh),
        WatermarkPosition::BottomLeft => (0, ih - wh),
        WatermarkPosition::Center => (
            ((iw - ww) as f64 / 2.0).round() as i64,
            ((ih - wh) as f64 / 2.0).round() as i64,
        ),
        WatermarkPosition::At(x, y) => (x, y),
    }
}

/// Tile origins stepping by the watermark size, arranged so one tile edge is
/// flush with the anchored corner. The centered variant shifts the lattice by
/// half the remainder so the pattern is symmetric; off-canvas origins are
/// kept and clipped by the compositor.
fn tile_origins(iw: u32, ih: u32, ww: u32, wh: u32, anchor: WatermarkPosition) -> Vec<(i64, i64)> {
    let (iw, ih, ww, wh) = (iw as i64, ih as i64, ww as i64, wh as i64);
    let mut origins = Vec::new();

    match anchor {
        WatermarkPosition::TopLeft => {
            let mut y = 0;
            while y < ih {
                let mut x = 0;
                while x < iw {
                    origins.push((x, y));
                    x += ww;
                }
                y += wh;
            }
        }
        WatermarkPosition::TopRight => {
            let mut y = 0;
            while y < ih {
                let mut x = iw;
                while x > -ww {
                    origins.push((x, y));
                    x -= ww;
                }
                y += wh;
            }
        }
        WatermarkPosition::BottomRight => {
            let mut y = ih;
            while y > -wh {
                let mut x = iw;
                while x > -ww {
                    origins.push((x, y));
                    x -= ww;
                }
                y -= wh;
            }
        }
        WatermarkPosition::BottomLeft => {
            let mut y = ih;
            while y > -wh {
                let mut x = 0;
                while x < iw {
                    origins.push((x, y));
                    x += ww;
                }
                y -= wh;
            }
        }
        WatermarkPosition::Center | WatermarkPosition::At(_, _) => {
            let start_x = -((iw % ww) / 2);
            let start_y = -((ih % wh) / 2);
            let mut y = start_y;
            while y < ih {
                let mut x = start_x;
                while x < iw {
                    origins.push((x, y));
                    x += ww;
                }
                y += wh;
            }
        }
    }

    origins
}
