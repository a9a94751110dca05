// lib.rs
//
// imagetool: a raster image transformation engine.
//
// Design goals:
// - Stateless, synchronous transforms over owned RGBA buffers
// - Placement math separated from pixel work and testable on its own
// - Alpha-correct compositing wherever a watermark lands
// - Codec and filesystem concerns confined to the crate's edges

pub mod buffer;
pub mod color;
pub mod engine;
pub mod error;
pub mod ops;

pub use buffer::{Pixel, PixelBuffer};
pub use color::{hex_to_rgb, ColorSpec, PackedColor};
pub use engine::analyze::{average_color, dominating_color};
pub use engine::api::{resize, watermark};
pub use engine::orient::{autorotate, flip, rotate};
pub use engine::pipeline::apply_ops;
pub use engine::sharpen::unsharp_mask;
pub use engine::stylize::{grayscale, meshify, pixelate};
pub use error::{ErrorKind, ImageToolError};
pub use ops::{
    FlipMode, MeshifyOptions, Operation, Paddings, ResizeOptions, Units, UnsharpMaskOptions,
    WatermarkOptions, WatermarkPosition,
};
