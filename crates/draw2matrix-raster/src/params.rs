use draw2matrix_core::Region;
use serde::{Deserialize, Serialize};

/// Padding added around the drawing region before cropping.
///
/// The capture includes window chrome around the drawing surface; the
/// defaults match the layout of the reference drawing window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropPadding {
    /// Added to `region.x`.
    pub left: f32,
    /// Added to `region.y`.
    pub top: f32,
    /// Added to `region.width`.
    pub extra_width: f32,
    /// Added to `region.height`.
    pub extra_height: f32,
}

impl Default for CropPadding {
    fn default() -> Self {
        Self {
            left: 10.0,
            top: 10.0,
            extra_width: 100.0,
            extra_height: 65.0,
        }
    }
}

impl CropPadding {
    /// No padding: crop exactly the region.
    pub fn none() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            extra_width: 0.0,
            extra_height: 0.0,
        }
    }

    /// Region whose padded crop is exactly a `width × height` capture.
    ///
    /// Useful when the capture already contains only the drawing surface.
    pub fn region_covering(&self, width: u32, height: u32) -> Region {
        Region::new(
            width as f32 - self.extra_width,
            height as f32 - self.extra_height,
            -self.left,
            -self.top,
        )
    }
}

/// Configuration for [`MatrixConverter`](crate::MatrixConverter).
///
/// `target_rows`/`target_cols` are resample dimensions; the emitted matrix is
/// one smaller on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConverterParams {
    pub target_rows: usize,
    pub target_cols: usize,
    #[serde(default)]
    pub padding: CropPadding,
}

impl ConverterParams {
    pub fn new(target_rows: usize, target_cols: usize) -> Self {
        Self {
            target_rows,
            target_cols,
            padding: CropPadding::default(),
        }
    }

    /// Params producing an `out_rows × out_cols` matrix.
    pub fn for_output(out_rows: usize, out_cols: usize) -> Self {
        Self::new(out_rows + 1, out_cols + 1)
    }

    /// Shape of the emitted matrix.
    pub fn output_shape(&self) -> (usize, usize) {
        (
            self.target_rows.saturating_sub(1),
            self.target_cols.saturating_sub(1),
        )
    }
}
