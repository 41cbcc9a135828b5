//! Turn a captured drawing into a fixed-size binary matrix.
//!
//! The pipeline is:
//! 1. crop the capture to the (padded) drawing region,
//! 2. reduce it to a black/white palette,
//! 3. Catmull-Rom resample to the target size,
//! 4. threshold (anything not pure white is ink),
//! 5. orient into matrix row/column order and read the ink cells.
//!
//! ```
//! use draw2matrix_core::Region;
//! use image::{Rgba, RgbaImage};
//!
//! let capture = RgbaImage::from_pixel(300, 300, Rgba([255, 255, 255, 255]));
//! let region = Region::new(150.0, 150.0, 20.0, 20.0);
//! let m = draw2matrix_raster::convert(&capture, &region, 9, 9).unwrap();
//! assert_eq!(m.shape(), (8, 8));
//! assert_eq!(m.ink_count(), 0);
//! ```

pub mod binarize;
mod convert;
mod crop;
mod params;
pub mod preview;

pub use binarize::INK_THRESHOLD;
pub use convert::{convert, MatrixConverter};
pub use crop::{crop_rect, crop_to_region, CropRect};
pub use params::{ConverterParams, CropPadding};

/// Errors produced by the conversion pipeline.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    #[error("target size {rows}x{cols} is invalid: both sides must be >= 2")]
    InvalidDimension { rows: usize, cols: usize },

    #[error(
        "crop rectangle ({x}, {y}, {width}x{height}) lies outside the {image_width}x{image_height} capture"
    )]
    OutOfBounds {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        image_width: u32,
        image_height: u32,
    },

    #[error("a {rows}x{cols} matrix at scale {scale} exceeds the {max}px preview side limit")]
    PreviewTooLarge {
        rows: usize,
        cols: usize,
        scale: u32,
        max: u32,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
