// src/engine/codec.rs
//
// Codec boundary: bytes in, PixelBuffer out, and back. JPEG goes through
// mozjpeg (libjpeg-turbo); PNG and GIF through the image crate. Dimension
// limits are enforced before pixels are allocated.

use crate::buffer::PixelBuffer;
use crate::engine::{MAX_DIMENSION, MAX_PIXELS};
use crate::error::ImageToolError;
use image::codecs::gif::GifEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use mozjpeg::{ColorSpace, Compress, Decompress};
use std::io::Cursor;
use std::panic::{catch_unwind, AssertUnwindSafe};

type CodecResult<T> = std::result::Result<T, ImageToolError>;

/// Contain panics from C-backed codec paths and report them as errors.
fn run_guarded<T>(label: &'static str, f: impl FnOnce() -> CodecResult<T>) -> CodecResult<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(_) => Err(ImageToolError::decode_failed(format!(
            "{label}: codec panicked"
        ))),
    }
}

/// Detect input format using magic bytes. Returns None if unknown.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Whether a format can carry an alpha channel through encode.
pub fn supports_alpha(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Png | ImageFormat::Gif)
}

/// Infer the output format from a path's extension (jpg/jpeg/png/gif).
pub fn format_from_extension(path: &str) -> Option<ImageFormat> {
    let pos = path.rfind('.')?;
    match path[pos + 1..].to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "gif" => Some(ImageFormat::Gif),
        _ => None,
    }
}

/// Check image dimensions against the decompression-bomb limits.
pub fn check_dimensions(width: u32, height: u32) -> CodecResult<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ImageToolError::dimension_exceeds_limit(
            width.max(height),
            MAX_DIMENSION,
        ));
    }
    let pixels = width as u64 * height as u64;
    if pixels > MAX_PIXELS {
        return Err(ImageToolError::pixel_count_exceeds_limit(pixels, MAX_PIXELS));
    }
    Ok(())
}

/// Inspect encoded bytes and ensure the dimensions are safe before decoding.
fn ensure_dimensions_safe(bytes: &[u8]) -> CodecResult<()> {
    let cursor = Cursor::new(bytes);
    if let Ok(reader) = ImageReader::new(cursor).with_guessed_format() {
        if let Ok((width, height)) = reader.into_dimensions() {
            return check_dimensions(width, height);
        }
    }
    Ok(())
}

/// Unified decode entrypoint: detect the format once, route JPEG to
/// mozjpeg and everything else to the image crate.
pub fn decode(bytes: &[u8]) -> CodecResult<(PixelBuffer, Option<ImageFormat>)> {
    let detected = detect_format(bytes);
    let img = match detected {
        Some(ImageFormat::Jpeg) => decode_jpeg(bytes)?,
        _ => decode_with_image_crate(bytes)?,
    };
    Ok((img, detected))
}

/// Decode JPEG using mozjpeg (backed by libjpeg-turbo).
pub fn decode_jpeg(data: &[u8]) -> CodecResult<PixelBuffer> {
    run_guarded("decode:jpeg", || {
        if !data.windows(2).any(|pair| pair == [0xFF, 0xD9]) {
            return Err(ImageToolError::decode_failed(
                "mozjpeg: missing JPEG EOI marker",
            ));
        }

        let decompress = Decompress::new_mem(data).map_err(|e| {
            ImageToolError::decode_failed(format!("mozjpeg decompress init failed: {e:?}"))
        })?;
        let mut decompress = decompress.rgb().map_err(|e| {
            ImageToolError::decode_failed(format!("mozjpeg rgb conversion failed: {e:?}"))
        })?;

        let width = decompress.width() as u32;
        let height = decompress.height() as u32;
        check_dimensions(width, height)?;

        let pixels: Vec<[u8; 3]> = decompress.read_scanlines().map_err(|e| {
            ImageToolError::decode_failed(format!("mozjpeg: failed to read scanlines: {e:?}"))
        })?;

        let mut data = Vec::with_capacity(pixels.len() * 4);
        for [r, g, b] in pixels {
            data.extend_from_slice(&[r, g, b, 255]);
        }
        PixelBuffer::from_raw(width, height, data)
    })
}

/// Decode non-JPEG formats via the image crate.
fn decode_with_image_crate(data: &[u8]) -> CodecResult<PixelBuffer> {
    ensure_dimensions_safe(data)?;
    let img = image::load_from_memory(data)
        .map_err(|e| ImageToolError::decode_failed(format!("decode failed: {e}")))?;
    check_dimensions(img.width(), img.height())?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(width, height, rgba.into_raw())
}

/// Extract the EXIF Orientation tag (1-8). Returns None if missing or invalid.
pub fn detect_orientation(bytes: &[u8]) -> Option<u16> {
    let mut cursor = Cursor::new(bytes);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut cursor).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let value = field.value.get_uint(0)?;
    let orientation = value as u16;
    if (1..=8).contains(&orientation) {
        Some(orientation)
    } else {
        None
    }
}

/// Encoder settings. `quality` applies to JPEG (0-100), `compression` to
/// PNG (0-9).
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub quality: u8,
    pub compression: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: 100,
            compression: 9,
        }
    }
}

/// Encode a buffer into the given format.
pub fn encode(img: &PixelBuffer, format: ImageFormat, opts: &EncodeOptions) -> CodecResult<Vec<u8>> {
    match format {
        ImageFormat::Jpeg => encode_jpeg(img, opts.quality),
        ImageFormat::Png => encode_png(img, opts.compression),
        ImageFormat::Gif => encode_gif(img),
        other => {
            let name = format!("{other:?}").to_lowercase();
            Err(ImageToolError::unsupported_format(name))
        }
    }
}

/// Encode to JPEG using mozjpeg: progressive, optimized coding, 0-100
/// quality. Alpha is dropped (JPEG has none).
pub fn encode_jpeg(img: &PixelBuffer, quality: u8) -> CodecResult<Vec<u8>> {
    run_guarded("encode:jpeg", || {
        let (width, height) = img.dimensions();
        let rgb: Vec<u8> = img
            .data()
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect();

        let mut comp = Compress::new(ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_color_space(ColorSpace::JCS_YCbCr);
        comp.set_quality(quality.min(100) as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let estimated = (width as usize * height as usize * 3 / 10).max(4096);
        let mut output = Vec::with_capacity(estimated);

        let mut writer = comp.start_compress(&mut output).map_err(|e| {
            ImageToolError::encode_failed("jpeg", format!("mozjpeg: failed to start compress: {e:?}"))
        })?;

        let stride = width as usize * 3;
        for row in rgb.chunks(stride) {
            writer.write_scanlines(row).map_err(|e| {
                ImageToolError::encode_failed(
                    "jpeg",
                    format!("mozjpeg: failed to write scanlines: {e:?}"),
                )
            })?;
        }

        writer.finish().map_err(|e| {
            ImageToolError::encode_failed("jpeg", format!("mozjpeg: failed to finish: {e:?}"))
        })?;

        Ok(output)
    })
}

/// Encode to PNG, mapping the 0-9 compression level onto the encoder's
/// fast/default/best bands.
pub fn encode_png(img: &PixelBuffer, compression: u8) -> CodecResult<Vec<u8>> {
    let level = match compression.min(9) {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    };
    let mut output = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut output, level, PngFilter::Adaptive);
    encoder
        .write_image(
            img.data(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ImageToolError::encode_failed("png", e.to_string()))?;
    Ok(output)
}

/// Encode to GIF.
pub fn encode_gif(img: &PixelBuffer) -> CodecResult<Vec<u8>> {
    let mut output = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut output);
        encoder
            .encode(
                img.data(),
                img.width(),
                img.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| ImageToolError::encode_failed("gif", e.to_string()))?;
    }
    Ok(output)
}
