//! Two-tone reduction, resampling and orientation of captured drawings.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};

/// Pixel value of ink after reduction.
pub const INK: u8 = 0;
/// Pixel value of background after reduction.
pub const BACKGROUND: u8 = 255;

/// Resampled pixels strictly below this luminance count as ink.
///
/// Any pixel that is not pure white is treated as drawn.
pub const INK_THRESHOLD: u8 = 255;

/// Nearest entry of the `{white, black}` palette for one pixel.
///
/// The pixel is composited over white first, so transparent areas of a
/// capture read as background. Ties resolve to white.
#[inline]
pub(crate) fn nearest_palette_entry(px: Rgba<u8>) -> u8 {
    let [r, g, b, a] = px.0;
    let over_white = |c: u8| -> i32 {
        let (c, a) = (i32::from(c), i32::from(a));
        (c * a + 255 * (255 - a) + 127) / 255
    };
    let (r, g, b) = (over_white(r), over_white(g), over_white(b));

    let to_black = r * r + g * g + b * b;
    let to_white = (255 - r).pow(2) + (255 - g).pow(2) + (255 - b).pow(2);
    if to_black < to_white {
        INK
    } else {
        BACKGROUND
    }
}

/// Reduce a color capture to a black/white image.
pub fn reduce_to_palette(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([nearest_palette_entry(*image.get_pixel(x, y))])
    })
}

/// Catmull-Rom resample to `width × height`.
pub fn resample(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    imageops::resize(image, width, height, FilterType::CatmullRom)
}

/// Snap every pixel to [`INK`] or [`BACKGROUND`] using [`INK_THRESHOLD`].
pub fn threshold_in_place(image: &mut GrayImage) {
    for px in image.pixels_mut() {
        px.0[0] = if px.0[0] < INK_THRESHOLD {
            INK
        } else {
            BACKGROUND
        };
    }
}

/// Rotate 90° clockwise, then mirror horizontally.
///
/// The pair amounts to a transpose: pixel `(x, y)` moves to `(y, x)` and the
/// output is `height × width`.
pub fn orient(image: &GrayImage) -> GrayImage {
    let rotated = imageops::rotate90(image);
    imageops::flip_horizontal(&rotated)
}
