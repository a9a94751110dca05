// src/ops.rs
//
// Typed operation configuration. Each transform has one options struct whose
// Default carries the documented defaults, and the Operation enum is the
// closed set of transforms a pipeline can apply.

use crate::buffer::PixelBuffer;
use crate::color::ColorSpec;
use crate::error::ImageToolError;
use image::ImageFormat;
use std::str::FromStr;

/// Units for requested resize dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Px,
    Percent,
}

/// Letterbox padding behavior for keep-ratio resizes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Paddings {
    /// No padding canvas; the aspect-corrected size is returned as-is.
    Disabled,
    /// Pad with opaque white.
    #[default]
    White,
    /// Pad with a caller-specified color.
    Color(ColorSpec),
}

impl Paddings {
    pub fn enabled(&self) -> bool {
        !matches!(self, Paddings::Disabled)
    }

    /// The padding fill color. White unless a valid color was given.
    pub fn resolve_color(&self) -> Result<[u8; 3], ImageToolError> {
        match self {
            Paddings::Disabled | Paddings::White => Ok([255, 255, 255]),
            Paddings::Color(spec) => spec.resolve(),
        }
    }
}

/// Resize configuration.
///
/// Unset `width`/`height` are derived from the input aspect ratio where
/// possible. `input_format`/`output_format` drive the background
/// transparency rule: alpha survives only when both ends support it.
#[derive(Debug, Clone)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub units: Units,
    pub keep_ratio: bool,
    pub paddings: Paddings,
    pub enlarge: bool,
    pub crop: bool,
    pub input_format: Option<ImageFormat>,
    pub output_format: Option<ImageFormat>,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            units: Units::Px,
            keep_ratio: false,
            paddings: Paddings::White,
            enlarge: true,
            crop: true,
            input_format: None,
            output_format: None,
        }
    }
}

/// Named watermark anchors plus an explicit coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    #[default]
    Center,
    At(i64, i64),
}

/// Watermark configuration.
///
/// `scale` overrides `position` and `repeat`; `stretch` only matters with
/// `scale`. `opacity` (0-100) applies to plain and tiled placements.
#[derive(Debug, Clone, Copy)]
pub struct WatermarkOptions {
    pub scale: bool,
    pub stretch: bool,
    pub repeat: bool,
    pub position: WatermarkPosition,
    pub opacity: u8,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            scale: false,
            stretch: false,
            repeat: false,
            position: WatermarkPosition::Center,
            opacity: 100,
        }
    }
}

/// Unsharp mask configuration (pre-calibration values).
#[derive(Debug, Clone, Copy)]
pub struct UnsharpMaskOptions {
    pub amount: f64,
    pub radius: f64,
    pub threshold: u8,
}

impl Default for UnsharpMaskOptions {
    fn default() -> Self {
        Self {
            amount: 50.0,
            radius: 0.5,
            threshold: 3,
        }
    }
}

/// Mesh overlay configuration.
#[derive(Debug, Clone)]
pub struct MeshifyOptions {
    pub blocksize: u32,
    pub color: ColorSpec,
}

impl Default for MeshifyOptions {
    fn default() -> Self {
        Self {
            blocksize: 2,
            color: ColorSpec::Rgb([0, 0, 0]),
        }
    }
}

/// Flip axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipMode {
    Horizontal,
    Vertical,
    Both,
}

impl FromStr for FlipMode {
    type Err = ImageToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            "both" => Ok(Self::Both),
            other => Err(ImageToolError::invalid_flip_mode(other.to_string())),
        }
    }
}

/// A transform with its parameters, applied by the pipeline.
///
/// Design principle: each operation is self-contained and stateless. The
/// watermark operation owns its overlay buffer so a pipeline is a plain
/// value that can be stored and replayed.
#[derive(Debug, Clone)]
pub enum Operation {
    Resize(ResizeOptions),
    Watermark {
        watermark: PixelBuffer,
        options: WatermarkOptions,
    },
    UnsharpMask(UnsharpMaskOptions),
    Rotate { degrees: u32 },
    Flip { mode: FlipMode },
    Autorotate { orientation: Option<u16> },
    Grayscale,
    Pixelate { blocksize: u32 },
    Meshify(MeshifyOptions),
}

impl Operation {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize(_) => "resize",
            Self::Watermark { .. } => "watermark",
            Self::UnsharpMask(_) => "unsharp_mask",
            Self::Rotate { .. } => "rotate",
            Self::Flip { .. } => "flip",
            Self::Autorotate { .. } => "autorotate",
            Self::Grayscale => "grayscale",
            Self::Pixelate { .. } => "pixelate",
            Self::Meshify(_) => "meshify",
        }
    }
}
