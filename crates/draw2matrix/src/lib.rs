//! Facade crate for the `draw2matrix-*` workspace.
//!
//! This crate provides:
//! - re-exports of the matrix, raster and dataset crates
//! - [`Draw2Matrix`], a drawing session that converts captures and feeds
//!   them into one locked dataset
//! - [`BuildDatasetJob`], a JSON-described batch run over captured images
//!
//! ## Quickstart
//!
//! ```no_run
//! use draw2matrix::{Draw2Matrix, DatasetConfig, ExportTarget, Region};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let capture = image::open("capture.png")?.to_rgba8();
//! let region = Region::new(400.0, 300.0, 20.0, 40.0);
//!
//! let mut session = Draw2Matrix::new();
//! session.lock(DatasetConfig::default())?;
//! session.add_capture(&capture, &region, "A")?;
//! session.save(&ExportTarget::new("out"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `draw2matrix::core`: binary matrices, flattening, logging.
//! - `draw2matrix::raster`: capture → binary matrix conversion.
//! - `draw2matrix::dataset`: accumulation plus CSV/MATLAB export.

pub use draw2matrix_core as core;
pub use draw2matrix_dataset as dataset;
pub use draw2matrix_raster as raster;

pub use draw2matrix_core::{BinaryMatrix, FlattenOrder, Region};
pub use draw2matrix_dataset::{
    AccumulatorState, DatasetConfig, DatasetError, ExportTarget, OutputPaths, SessionSnapshot,
};
pub use draw2matrix_raster::{ConverterParams, CropPadding, RasterError};

mod job;
mod session;

pub use job::{BuildDatasetJob, JobReport, JobSample};
pub use session::Draw2Matrix;

use std::path::PathBuf;

/// Errors produced by the facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum Draw2MatrixError {
    #[error("failed to load capture {path}: {source}")]
    LoadImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("sample {index} ({path}): {source}")]
    Sample {
        index: usize,
        path: PathBuf,
        #[source]
        source: Box<Draw2MatrixError>,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Install a `tracing` subscriber and route `log` records through it.
///
/// Later calls are no-ops.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let _ = tracing_log::LogTracer::init();
    draw2matrix_core::init_tracing(json);
}
