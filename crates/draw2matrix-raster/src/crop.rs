//! Region-of-interest cropping.

use draw2matrix_core::Region;
use image::RgbaImage;

use crate::params::CropPadding;
use crate::RasterError;

/// Integer crop rectangle in capture pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Rectangle requested for `region` before clipping: `(x, y, width, height)`.
///
/// Float coordinates are truncated toward zero.
pub(crate) fn requested_rect(region: &Region, padding: &CropPadding) -> (i64, i64, i64, i64) {
    (
        (region.x + padding.left) as i64,
        (region.y + padding.top) as i64,
        (region.width + padding.extra_width) as i64,
        (region.height + padding.extra_height) as i64,
    )
}

/// Clip the padded region to the image bounds.
///
/// Partial overlap is clipped; a rectangle with no overlap at all is
/// `OutOfBounds`.
pub fn crop_rect(
    image_width: u32,
    image_height: u32,
    region: &Region,
    padding: &CropPadding,
) -> Result<CropRect, RasterError> {
    let (x, y, w, h) = requested_rect(region, padding);
    let left = x.max(0);
    let top = y.max(0);
    let right = x.saturating_add(w).min(i64::from(image_width));
    let bottom = y.saturating_add(h).min(i64::from(image_height));

    if right <= left || bottom <= top {
        return Err(RasterError::OutOfBounds {
            x,
            y,
            width: w,
            height: h,
            image_width,
            image_height,
        });
    }

    let rect = CropRect {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    };
    if i64::from(rect.width) != w || i64::from(rect.height) != h {
        log::warn!(
            "capture region ({x}, {y}, {w}x{h}) clipped to ({}, {}, {}x{}) of {image_width}x{image_height} image",
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
    }
    Ok(rect)
}

/// Crop `image` to the padded `region`.
pub fn crop_to_region(
    image: &RgbaImage,
    region: &Region,
    padding: &CropPadding,
) -> Result<RgbaImage, RasterError> {
    let rect = crop_rect(image.width(), image.height(), region, padding)?;
    Ok(image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
}
