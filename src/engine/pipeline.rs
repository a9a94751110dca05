// src/engine/pipeline.rs
//
// Apply an ordered list of typed operations to one buffer. The closed
// Operation enum replaces dynamic method-name dispatch: every step is
// resolved at compile time, and the first failure aborts the chain.

use crate::buffer::PixelBuffer;
use crate::engine::{api, orient, sharpen, stylize};
use crate::error::ImageToolError;
use crate::ops::Operation;
use tracing::debug;

type PipelineResult<T> = std::result::Result<T, ImageToolError>;

/// Thread `img` through `ops` in order.
pub fn apply_ops(img: PixelBuffer, ops: &[Operation]) -> PipelineResult<PixelBuffer> {
    let mut img = img;
    for op in ops {
        debug!(
            target: "imagetool::pipeline",
            op = op.name(),
            width = img.width(),
            height = img.height(),
            "applying operation"
        );
        img = apply_op(img, op)?;
    }
    Ok(img)
}

fn apply_op(img: PixelBuffer, op: &Operation) -> PipelineResult<PixelBuffer> {
    match op {
        Operation::Resize(opts) => api::resize(img, opts),
        Operation::Watermark { watermark, options } => api::watermark(img, watermark, options),
        Operation::UnsharpMask(opts) => {
            let mut img = img;
            sharpen::unsharp_mask(&mut img, opts);
            Ok(img)
        }
        Operation::Rotate { degrees } => orient::rotate(img, *degrees),
        Operation::Flip { mode } => Ok(orient::flip(img, *mode)),
        Operation::Autorotate { orientation } => orient::autorotate(img, *orientation),
        Operation::Grayscale => {
            let mut img = img;
            stylize::grayscale(&mut img);
            Ok(img)
        }
        Operation::Pixelate { blocksize } => {
            let mut img = img;
            stylize::pixelate(&mut img, *blocksize)?;
            Ok(img)
        }
        Operation::Meshify(opts) => {
            let mut img = img;
            stylize::meshify(&mut img, opts)?;
            Ok(img)
        }
    }
}
