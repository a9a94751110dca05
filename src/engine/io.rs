// src/engine/io.rs
//
// Filesystem boundary: path-or-buffer inputs, output directory creation,
// encoding to disk, best-effort permission bits.

use crate::buffer::PixelBuffer;
use crate::engine::codec::{self, EncodeOptions};
use crate::error::ImageToolError;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::warn;

type IoResult<T> = std::result::Result<T, ImageToolError>;

/// An operation input: either a file to decode or an already-decoded buffer.
/// Resolved exactly once, before the core ever sees pixels.
#[derive(Debug)]
pub enum Input {
    Path(PathBuf),
    Buffer(PixelBuffer),
}

impl Input {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }
}

impl From<PixelBuffer> for Input {
    fn from(buffer: PixelBuffer) -> Self {
        Self::Buffer(buffer)
    }
}

/// Resolve an input into a pixel buffer plus its detected source format
/// (None for in-memory buffers).
pub fn open(input: Input) -> IoResult<(PixelBuffer, Option<ImageFormat>)> {
    match input {
        Input::Buffer(buffer) => Ok((buffer, None)),
        Input::Path(path) => {
            let bytes = std::fs::read(&path).map_err(|e| {
                let display = path.display().to_string();
                if e.kind() == std::io::ErrorKind::NotFound {
                    ImageToolError::file_not_found(display)
                } else {
                    ImageToolError::file_read_failed(display, e)
                }
            })?;
            codec::decode(&bytes)
        }
    }
}

/// Output settings for [`save`].
#[derive(Debug, Clone, Copy)]
pub struct SaveOptions {
    /// JPEG quality (0-100).
    pub quality: u8,
    /// PNG compression level (0-9).
    pub compression: u8,
    /// Permission bits to apply to the written file (Unix only, best-effort).
    pub chmod: Option<u32>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            quality: 100,
            compression: 9,
            chmod: None,
        }
    }
}

/// Encode `img` into the format implied by the path's extension and write
/// it, creating missing parent directories first. A chmod failure after a
/// successful write is reported via logs but does not fail the save.
pub fn save(img: &PixelBuffer, path: &Path, opts: &SaveOptions) -> IoResult<()> {
    let path_str = path.display().to_string();
    let format = codec::format_from_extension(&path_str)
        .ok_or_else(|| ImageToolError::unsupported_format(path_str.clone()))?;

    ensure_parent_dirs(path)?;

    let encode_opts = EncodeOptions {
        quality: opts.quality,
        compression: opts.compression,
    };
    let bytes = codec::encode(img, format, &encode_opts)?;
    std::fs::write(path, &bytes)
        .map_err(|e| ImageToolError::file_write_failed(path_str.clone(), e))?;

    if let Some(mode) = opts.chmod {
        if let Err(err) = apply_permissions(path, mode) {
            warn!(target: "imagetool::io", path = %path_str, %err, "failed to apply permissions");
        }
    }
    Ok(())
}

/// Create every missing directory leading up to `path`.
pub fn ensure_parent_dirs(path: &Path) -> IoResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ImageToolError::create_dir_failed(parent.display().to_string(), e)
            })?;
        }
    }
    Ok(())
}

/// Apply permission bits to a written file.
#[cfg(unix)]
pub fn apply_permissions(path: &Path, mode: u32) -> IoResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| ImageToolError::file_write_failed(path.display().to_string(), e))
}

#[cfg(not(unix))]
pub fn apply_permissions(_path: &Path, _mode: u32) -> IoResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;

    fn sample() -> PixelBuffer {
        PixelBuffer::filled(4, 4, Pixel::opaque(10, 20, 30)).unwrap()
    }

    #[test]
    fn test_save_and_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save(&sample(), &path, &SaveOptions::default()).unwrap();

        let (decoded, format) = open(Input::path(&path)).unwrap();
        assert_eq!(format, Some(ImageFormat::Png));
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/out.png");
        save(&sample(), &path, &SaveOptions::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tiff");
        let err = save(&sample(), &path, &SaveOptions::default()).unwrap_err();
        assert!(matches!(err, ImageToolError::UnsupportedFormat { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_applies_chmod() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save(
            &sample(),
            &path,
            &SaveOptions {
                chmod: Some(0o640),
                ..SaveOptions::default()
            },
        )
        .unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_open_missing_file() {
        let err = open(Input::path("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ImageToolError::FileNotFound { .. }));
    }

    #[test]
    fn test_open_buffer_passes_through() {
        let (buffer, format) = open(Input::from(sample())).unwrap();
        assert_eq!(format, None);
        assert_eq!(buffer, sample());
    }
}
