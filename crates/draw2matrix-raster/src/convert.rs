use draw2matrix_core::{BinaryMatrix, Region};
use image::{DynamicImage, GrayImage, RgbaImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::binarize::{orient, reduce_to_palette, resample, threshold_in_place, INK};
use crate::crop::crop_to_region;
use crate::params::{ConverterParams, CropPadding};
use crate::RasterError;

/// Converts captured drawings into fixed-size binary matrices.
#[derive(Clone, Debug)]
pub struct MatrixConverter {
    params: ConverterParams,
}

impl MatrixConverter {
    /// Validate params and create a converter.
    pub fn new(params: ConverterParams) -> Result<Self, RasterError> {
        let ConverterParams {
            target_rows,
            target_cols,
            ..
        } = params;
        if target_rows < 2 || target_cols < 2 {
            return Err(RasterError::InvalidDimension {
                rows: target_rows,
                cols: target_cols,
            });
        }
        if u32::try_from(target_rows).is_err() || u32::try_from(target_cols).is_err() {
            return Err(RasterError::InvalidDimension {
                rows: target_rows,
                cols: target_cols,
            });
        }
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &ConverterParams {
        &self.params
    }

    /// Shape of every matrix this converter emits.
    #[inline]
    pub fn output_shape(&self) -> (usize, usize) {
        self.params.output_shape()
    }

    /// Crop, reduce, resample, threshold and orient `image`, then read the
    /// ink cells.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, image),
            fields(
                width = image.width(),
                height = image.height(),
                rows = self.params.target_rows,
                cols = self.params.target_cols
            )
        )
    )]
    pub fn convert(&self, image: &RgbaImage, region: &Region) -> Result<BinaryMatrix, RasterError> {
        let oriented = self.oriented_image(image, region)?;
        let (rows, cols) = self.output_shape();
        let matrix = BinaryMatrix::from_fn(rows, cols, |i, j| {
            oriented.get_pixel(i as u32, j as u32).0[0] == INK
        });
        log::debug!(
            "converted {}x{} capture into {rows}x{cols} matrix with {} ink cells",
            image.width(),
            image.height(),
            matrix.ink_count()
        );
        Ok(matrix)
    }

    /// Same as [`convert`](Self::convert) for any decoded image.
    pub fn convert_dynamic(
        &self,
        image: &DynamicImage,
        region: &Region,
    ) -> Result<BinaryMatrix, RasterError> {
        self.convert(&image.to_rgba8(), region)
    }

    /// Final two-tone buffer the matrix is read from.
    ///
    /// It is `target_rows` wide and `target_cols` high: the matrix cell
    /// `(i, j)` is the pixel at `x = i, y = j`.
    pub fn oriented_image(
        &self,
        image: &RgbaImage,
        region: &Region,
    ) -> Result<GrayImage, RasterError> {
        let cropped = crop_to_region(image, region, &self.params.padding)?;
        let palette = reduce_to_palette(&cropped);

        // Resample in capture orientation: columns across, rows down.
        let mut scaled = resample(
            &palette,
            self.params.target_cols as u32,
            self.params.target_rows as u32,
        );
        threshold_in_place(&mut scaled);
        Ok(orient(&scaled))
    }
}

/// Convert a capture with default crop padding.
///
/// The matrix is `(target_rows - 1) × (target_cols - 1)`; ask for `N + 1` to
/// get an `N`-sized axis.
pub fn convert(
    image: &RgbaImage,
    region: &Region,
    target_rows: usize,
    target_cols: usize,
) -> Result<BinaryMatrix, RasterError> {
    let params = ConverterParams {
        target_rows,
        target_cols,
        padding: CropPadding::default(),
    };
    MatrixConverter::new(params)?.convert(image, region)
}
