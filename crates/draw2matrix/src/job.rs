//! Batch dataset builds described by a JSON job file.

use std::fs;
use std::path::{Path, PathBuf};

use draw2matrix_core::Region;
use draw2matrix_dataset::{validate_label, DatasetConfig, ExportTarget};
use draw2matrix_raster::{preview::save_preview, CropPadding};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Draw2Matrix, Draw2MatrixError};

fn default_preview_scale() -> u32 {
    8
}

/// One captured drawing and its label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSample {
    pub image_path: PathBuf,
    pub label: String,
    /// Drawing region in the capture; the whole capture when omitted.
    #[serde(default)]
    pub region: Option<Region>,
}

/// Convert a list of captures and write them out as one dataset.
///
/// Relative paths are resolved against the directory of the job file when
/// the job is loaded with [`BuildDatasetJob::load_json`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildDatasetJob {
    #[serde(default)]
    pub config: DatasetConfig,
    #[serde(default)]
    pub padding: CropPadding,
    pub output: ExportTarget,
    /// Also write the session snapshot here after saving.
    #[serde(default)]
    pub session_path: Option<PathBuf>,
    /// Write a PNG preview of every matrix into this directory.
    #[serde(default)]
    pub preview_dir: Option<PathBuf>,
    #[serde(default = "default_preview_scale")]
    pub preview_scale: u32,
    pub samples: Vec<JobSample>,
}

/// Summary of a finished job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub samples: usize,
    pub data_path: PathBuf,
    pub target_path: Option<PathBuf>,
    /// Files that existed before the save and were overwritten.
    pub overwritten: Vec<PathBuf>,
    pub previews: Vec<PathBuf>,
}

impl BuildDatasetJob {
    /// Load a job from JSON, resolving relative paths against its directory.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, Draw2MatrixError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let mut job: Self = serde_json::from_str(&raw)?;
        if let Some(base) = path.parent() {
            job.resolve_paths(base);
        }
        Ok(job)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), Draw2MatrixError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.output.dir);
        if let Some(p) = self.session_path.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.preview_dir.as_mut() {
            resolve(p);
        }
        for sample in &mut self.samples {
            resolve(&mut sample.image_path);
        }
    }

    /// Convert every sample, save the dataset and write the optional extras.
    ///
    /// The first failing sample aborts the job before anything is saved.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(samples = self.samples.len()))
    )]
    pub fn run(&self) -> Result<JobReport, Draw2MatrixError> {
        let mut session = Draw2Matrix::with_padding(self.padding);
        session.lock(self.config)?;

        let mut previews = Vec::new();
        if let Some(dir) = &self.preview_dir {
            fs::create_dir_all(dir)?;
        }

        for (index, sample) in self.samples.iter().enumerate() {
            let wrap = |source: Draw2MatrixError| Draw2MatrixError::Sample {
                index,
                path: sample.image_path.clone(),
                source: Box::new(source),
            };
            validate_label(&sample.label).map_err(|e| wrap(e.into()))?;
            let capture = image::open(&sample.image_path)
                .map_err(|source| {
                    wrap(Draw2MatrixError::LoadImage {
                        path: sample.image_path.clone(),
                        source,
                    })
                })?
                .to_rgba8();
            let region = sample.region.unwrap_or_else(|| {
                self.padding
                    .region_covering(capture.width(), capture.height())
            });
            let matrix = session
                .add_capture(&capture, &region, &sample.label)
                .map_err(wrap)?;
            log::debug!("sample {index} ({}):\n{matrix}", sample.label);

            if let Some(dir) = &self.preview_dir {
                let path = dir.join(format!("sample_{index:04}.png"));
                save_preview(&matrix, self.preview_scale, &path).map_err(|e| wrap(e.into()))?;
                previews.push(path);
            }
        }

        let planned = session.output_paths(&self.output)?;
        let overwritten: Vec<PathBuf> = planned
            .existing()
            .into_iter()
            .map(Path::to_path_buf)
            .collect();
        for path in &overwritten {
            log::warn!("overwriting {}", path.display());
        }

        let written = session.save(&self.output)?;
        if let Some(path) = &self.session_path {
            session.snapshot()?.write_json(path)?;
            log::info!("wrote session snapshot to {}", path.display());
        }

        Ok(JobReport {
            samples: session.sample_count(),
            data_path: written.data,
            target_path: written.target,
            overwritten,
            previews,
        })
    }
}
