use draw2matrix_core::{BinaryMatrix, Region};
use draw2matrix_dataset::{
    AccumulatorState, DatasetAccumulator, DatasetConfig, DatasetError, ExportTarget, OutputPaths,
    SessionSnapshot,
};
use draw2matrix_raster::{ConverterParams, CropPadding, MatrixConverter};
use image::RgbaImage;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::Draw2MatrixError;

/// A drawing session: one converter plus one dataset, locked together.
///
/// Locking freezes the dataset settings and builds a converter whose output
/// shape matches the dataset's sample shape, so every accepted capture fits.
#[derive(Clone, Debug, Default)]
pub struct Draw2Matrix {
    padding: CropPadding,
    converter: Option<MatrixConverter>,
    dataset: DatasetAccumulator,
}

impl Draw2Matrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose crops use `padding` instead of the default window chrome.
    pub fn with_padding(padding: CropPadding) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    #[inline]
    pub fn padding(&self) -> &CropPadding {
        &self.padding
    }

    pub fn state(&self) -> AccumulatorState {
        self.dataset.state()
    }

    pub fn config(&self) -> Option<&DatasetConfig> {
        self.dataset.config()
    }

    /// Underlying dataset, for vocabulary or staging inspection.
    pub fn dataset(&self) -> &DatasetAccumulator {
        &self.dataset
    }

    fn converter_for(&self, config: &DatasetConfig) -> Result<MatrixConverter, Draw2MatrixError> {
        let params = ConverterParams {
            target_rows: config.matrix_rows,
            target_cols: config.matrix_cols,
            padding: self.padding,
        };
        Ok(MatrixConverter::new(params)?)
    }

    /// Freeze `config` and start an empty dataset.
    pub fn lock(&mut self, config: DatasetConfig) -> Result<(), Draw2MatrixError> {
        if self.dataset.is_locked() {
            return Err(DatasetError::AlreadyLocked.into());
        }
        let converter = self.converter_for(&config)?;
        self.dataset.lock(config)?;
        self.converter = Some(converter);
        Ok(())
    }

    /// Convert a capture with the locked target size without recording it.
    pub fn convert(
        &self,
        image: &RgbaImage,
        region: &Region,
    ) -> Result<BinaryMatrix, Draw2MatrixError> {
        let converter = self.converter.as_ref().ok_or(DatasetError::NotLocked)?;
        Ok(converter.convert(image, region)?)
    }

    /// Convert a capture and add it to the dataset under `label`.
    ///
    /// Nothing is recorded if conversion or validation fails.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image, region),
            fields(width = image.width(), height = image.height())
        )
    )]
    pub fn add_capture(
        &mut self,
        image: &RgbaImage,
        region: &Region,
        label: &str,
    ) -> Result<BinaryMatrix, Draw2MatrixError> {
        if label.is_empty() {
            return Err(DatasetError::EmptyLabel.into());
        }
        let matrix = self.convert(image, region)?;
        self.dataset.add_sample(&matrix, label)?;
        Ok(matrix)
    }

    /// Add an already converted matrix.
    pub fn add_sample(&mut self, matrix: &BinaryMatrix, label: &str) -> Result<(), Draw2MatrixError> {
        Ok(self.dataset.add_sample(matrix, label)?)
    }

    pub fn sample_count(&self) -> usize {
        self.dataset.sample_count()
    }

    pub fn is_saved(&self) -> bool {
        self.dataset.is_saved()
    }

    /// Files a save into `target` would write.
    pub fn output_paths(&self, target: &ExportTarget) -> Result<OutputPaths, Draw2MatrixError> {
        Ok(self.dataset.output_paths(target)?)
    }

    pub fn save(&mut self, target: &ExportTarget) -> Result<OutputPaths, Draw2MatrixError> {
        Ok(self.dataset.save(target)?)
    }

    /// Discard the dataset and unlock the settings.
    pub fn reset(&mut self) -> Result<(), Draw2MatrixError> {
        self.dataset.reset()?;
        self.converter = None;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, Draw2MatrixError> {
        Ok(self.dataset.snapshot()?)
    }

    /// Resume a saved session in an unlocked `Draw2Matrix`.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<(), Draw2MatrixError> {
        if self.dataset.is_locked() {
            return Err(DatasetError::AlreadyLocked.into());
        }
        let converter = self.converter_for(&snapshot.config)?;
        self.dataset.restore(snapshot)?;
        self.converter = Some(converter);
        Ok(())
    }
}
