//! Export writer: renders a locked dataset and writes it to disk.

use std::fs;
use std::path::Path;

use draw2matrix_core::{format_list, transpose};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::accumulator::{Dataset, DatasetAccumulator, SampleStore};
use crate::config::{ExportTarget, OutputPaths};
use crate::matlab::{assign_variable, render_matrix};
use crate::{csv, DatasetError};

/// File contents produced by a save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedExport {
    pub data: Vec<u8>,
    /// MATLAB target file; `None` for CSV.
    pub target: Option<Vec<u8>>,
}

impl Dataset {
    fn render(&self, target: &ExportTarget) -> Result<RenderedExport, DatasetError> {
        match &self.store {
            SampleStore::Csv { staging, .. } => {
                let mut data = Vec::with_capacity(csv::HEADER.len() + 2 + staging.len());
                data.extend_from_slice(csv::HEADER.as_bytes());
                data.extend_from_slice(csv::RECORD_END.as_bytes());
                data.extend_from_slice(staging);
                Ok(RenderedExport { data, target: None })
            }
            SampleStore::Matlab {
                named_variable,
                one_hot,
                inputs,
                labels,
            } => {
                let mut data = render_matrix(&transpose(inputs)?);
                let mut targets = if *one_hot {
                    let encoded: Vec<Vec<u8>> = match &self.vocabulary {
                        Some(vocab) => labels.iter().map(|l| vocab.encode(l)).collect(),
                        None => Vec::new(),
                    };
                    render_matrix(&transpose(&encoded)?)
                } else {
                    format_list(labels)
                };
                if *named_variable {
                    data = assign_variable(&target.data_file_name, &data);
                    targets = assign_variable(&target.target_file_name, &targets);
                }
                Ok(RenderedExport {
                    data: data.into_bytes(),
                    target: Some(targets.into_bytes()),
                })
            }
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), DatasetError> {
    fs::write(path, contents).map_err(|err| {
        log::error!("failed to write {}: {err}", path.display());
        DatasetError::Io(err)
    })
}

impl DatasetAccumulator {
    /// Files a save to `target` would write.
    pub fn output_paths(&self, target: &ExportTarget) -> Result<OutputPaths, DatasetError> {
        OutputPaths::resolve(target, self.dataset()?.format())
    }

    /// Render the export without touching the filesystem.
    pub fn render(&self, target: &ExportTarget) -> Result<RenderedExport, DatasetError> {
        self.dataset()?.render(target)
    }

    /// Write the dataset to `target`, overwriting existing files.
    ///
    /// On failure the samples and the saved flag are left as they were, so
    /// the call can simply be retried.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, target), fields(dir = %target.dir.display()))
    )]
    pub fn save(&mut self, target: &ExportTarget) -> Result<OutputPaths, DatasetError> {
        let dataset = self.dataset()?;
        if dataset.sample_count == 0 {
            return Err(DatasetError::NoSamples);
        }
        let paths = OutputPaths::resolve(target, dataset.format())?;
        let rendered = dataset.render(target)?;

        write_file(&paths.data, &rendered.data)?;
        if let (Some(path), Some(contents)) = (&paths.target, &rendered.target) {
            write_file(path, contents)?;
        }

        let count = dataset.sample_count;
        if let Some(dataset) = self.dataset.as_mut() {
            dataset.saved = true;
        }
        log::info!("saved {count} samples to {}", paths.data.display());
        Ok(paths)
    }
}
