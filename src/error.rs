// src/error.rs
//
// Unified error handling for imagetool
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - InvalidInput: unreadable or unsafe source data
// - InvalidParameter: rejected operation options
// - AllocationFailure: destination buffer could not be created
// - CompositingFailure: resample/blend primitive failed
// - Codec: encode errors
// - Io: filesystem errors

use std::borrow::Cow;
use thiserror::Error;

/// Coarse error classification.
///
/// Every [`ImageToolError`] variant maps onto exactly one kind; callers that
/// only care about "whose fault was it" can branch on this instead of the
/// full variant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable/undecodable source or watermark, or unsafe dimensions
    InvalidInput,
    /// Rejected operation option (rotation angle, flip mode, color, ...)
    InvalidParameter,
    /// Destination buffer could not be created
    AllocationFailure,
    /// Resample or blend primitive failed
    CompositingFailure,
    /// Encoding failed
    Codec,
    /// Filesystem failure
    Io,
}

/// imagetool error types
///
/// All errors are type-safe and provide clear, actionable messages.
#[derive(Debug, Error)]
pub enum ImageToolError {
    // File I/O Errors
    #[error("File not found: {path}")]
    FileNotFound { path: Cow<'static, str> },

    #[error("Failed to read file '{path}': {source}")]
    FileReadFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWriteFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    // Decode Errors
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: Cow<'static, str> },

    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    // Size Limit Errors
    #[error("Image dimension {dimension} exceeds maximum {max}")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("Image pixel count {pixels} exceeds maximum {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    // Buffer Errors
    #[error("Failed to allocate {width}x{height} pixel buffer")]
    AllocationFailed { width: u32, height: u32 },

    #[error("Pixel data length {actual} does not match {width}x{height} RGBA buffer (expected {expected})")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    // Operation Errors
    #[error("Invalid dimensions: width={width:?}, height={height:?}")]
    InvalidDimensions {
        width: Option<u32>,
        height: Option<u32>,
    },

    #[error("Unsupported rotation angle: {degrees}. Only 0, 90, 180, 270 and 360 are supported")]
    InvalidRotationAngle { degrees: u32 },

    #[error("Unsupported flip mode: '{mode}'. Expected horizontal, vertical, or both")]
    InvalidFlipMode { mode: Cow<'static, str> },

    #[error("Malformed color value: '{value}'")]
    MalformedColor { value: Cow<'static, str> },

    #[error("Invalid block size: {value}. Block size must be at least 1")]
    InvalidBlockSize { value: u32 },

    #[error("Resample failed ({source_width}x{source_height} -> {target_width}x{target_height}): {message}")]
    ResampleFailed {
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
        message: Cow<'static, str>,
    },

    #[error("Compositing failed: {message}")]
    CompositingFailed { message: Cow<'static, str> },

    // Encode Errors
    #[error("Failed to encode as {format}: {message}")]
    EncodeFailed {
        format: Cow<'static, str>,
        message: Cow<'static, str>,
    },
}

impl ImageToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::UnsupportedFormat { .. }
            | Self::DecodeFailed { .. }
            | Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. }
            | Self::BufferSizeMismatch { .. } => ErrorKind::InvalidInput,
            Self::InvalidDimensions { .. }
            | Self::InvalidRotationAngle { .. }
            | Self::InvalidFlipMode { .. }
            | Self::MalformedColor { .. }
            | Self::InvalidBlockSize { .. } => ErrorKind::InvalidParameter,
            Self::AllocationFailed { .. } => ErrorKind::AllocationFailure,
            Self::ResampleFailed { .. } | Self::CompositingFailed { .. } => {
                ErrorKind::CompositingFailure
            }
            Self::EncodeFailed { .. } => ErrorKind::Codec,
            Self::FileReadFailed { .. }
            | Self::FileWriteFailed { .. }
            | Self::CreateDirFailed { .. } => ErrorKind::Io,
        }
    }
}

// Constructor Helpers
impl ImageToolError {
    pub fn file_not_found(path: impl Into<Cow<'static, str>>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn file_read_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn file_write_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn create_dir_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::CreateDirFailed {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported_format(format: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn allocation_failed(width: u32, height: u32) -> Self {
        Self::AllocationFailed { width, height }
    }

    pub fn buffer_size_mismatch(width: u32, height: u32, expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch {
            width,
            height,
            expected,
            actual,
        }
    }

    pub fn invalid_dimensions(width: Option<u32>, height: Option<u32>) -> Self {
        Self::InvalidDimensions { width, height }
    }

    pub fn invalid_rotation_angle(degrees: u32) -> Self {
        Self::InvalidRotationAngle { degrees }
    }

    pub fn invalid_flip_mode(mode: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidFlipMode { mode: mode.into() }
    }

    pub fn malformed_color(value: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedColor {
            value: value.into(),
        }
    }

    pub fn invalid_block_size(value: u32) -> Self {
        Self::InvalidBlockSize { value }
    }

    pub fn resample_failed(
        source_dims: (u32, u32),
        target_dims: (u32, u32),
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::ResampleFailed {
            source_width: source_dims.0,
            source_height: source_dims.1,
            target_width: target_dims.0,
            target_height: target_dims.1,
            message: message.into(),
        }
    }

    pub fn compositing_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::CompositingFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(
        format: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }
}
