//! Render matrices back into images for inspection.

use std::path::Path;

use draw2matrix_core::BinaryMatrix;
use image::{GrayImage, Luma};

use crate::binarize::{BACKGROUND, INK};
use crate::RasterError;

/// Longest preview side in pixels.
pub const MAX_PREVIEW_SIDE: u32 = 16_384;

fn scaled_side(cells: usize, scale: u32) -> Option<u32> {
    u32::try_from(cells)
        .ok()?
        .checked_mul(scale)
        .filter(|&side| side <= MAX_PREVIEW_SIDE)
}

/// Render `matrix` with each cell as a `scale × scale` block, ink black on
/// white. A zero `scale` is treated as 1.
///
/// Fails with `PreviewTooLarge` when a side would exceed [`MAX_PREVIEW_SIDE`].
pub fn matrix_to_gray_image(matrix: &BinaryMatrix, scale: u32) -> Result<GrayImage, RasterError> {
    let scale = scale.max(1);
    let too_large = || RasterError::PreviewTooLarge {
        rows: matrix.rows(),
        cols: matrix.cols(),
        scale,
        max: MAX_PREVIEW_SIDE,
    };
    let width = scaled_side(matrix.cols(), scale).ok_or_else(too_large)?;
    let height = scaled_side(matrix.rows(), scale).ok_or_else(too_large)?;
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let cell = matrix.get((y / scale) as usize, (x / scale) as usize);
        Luma([if cell == Some(1) { INK } else { BACKGROUND }])
    }))
}

/// Write a PNG preview of `matrix` (format picked from the extension).
pub fn save_preview(
    matrix: &BinaryMatrix,
    scale: u32,
    path: impl AsRef<Path>,
) -> Result<(), RasterError> {
    let path = path.as_ref();
    matrix_to_gray_image(matrix, scale)?.save(path)?;
    log::info!("wrote matrix preview to {}", path.display());
    Ok(())
}
