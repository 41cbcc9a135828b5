//! Dataset settings, frozen for the lifetime of one locked dataset.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DatasetError;

fn default_target_dim() -> usize {
    20
}

fn default_true() -> bool {
    true
}

/// Settings a dataset is locked with.
///
/// `matrix_rows`/`matrix_cols` are resample target dimensions; every sample
/// matrix is `(matrix_rows - 1) × (matrix_cols - 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_target_dim")]
    pub matrix_rows: usize,
    #[serde(default = "default_target_dim")]
    pub matrix_cols: usize,
    /// CSV only: write the input as one flat vector instead of nested rows.
    #[serde(default = "default_true")]
    pub flatten: bool,
    /// Export a MATLAB data/target file pair instead of CSV.
    #[serde(default = "default_true")]
    pub matlab_format: bool,
    /// Write `.m` files that assign `<name>_variable = ...;`.
    #[serde(default)]
    pub matlab_use_named_variable: bool,
    /// Export MATLAB targets as a one-hot matrix.
    #[serde(default)]
    pub one_hot_encode: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            matrix_rows: default_target_dim(),
            matrix_cols: default_target_dim(),
            flatten: true,
            matlab_format: true,
            matlab_use_named_variable: false,
            one_hot_encode: false,
        }
    }
}

impl DatasetConfig {
    /// Config for `out_rows × out_cols` sample matrices.
    pub fn for_matrix_size(out_rows: usize, out_cols: usize) -> Self {
        Self {
            matrix_rows: out_rows + 1,
            matrix_cols: out_cols + 1,
            ..Self::default()
        }
    }

    /// Shape every sample must have.
    #[inline]
    pub fn sample_shape(&self) -> (usize, usize) {
        (
            self.matrix_rows.saturating_sub(1),
            self.matrix_cols.saturating_sub(1),
        )
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.matrix_rows < 2 || self.matrix_cols < 2 {
            return Err(DatasetError::InvalidDimension {
                rows: self.matrix_rows,
                cols: self.matrix_cols,
            });
        }
        Ok(())
    }

    /// Export format implied by the flags.
    pub fn export_format(&self) -> ExportFormat {
        if self.matlab_format {
            ExportFormat::Matlab {
                named_variable: self.matlab_use_named_variable,
                one_hot: self.one_hot_encode,
            }
        } else {
            ExportFormat::Csv {
                flatten: self.flatten,
            }
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// How a locked dataset is written out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv { flatten: bool },
    Matlab { named_variable: bool, one_hot: bool },
}

impl ExportFormat {
    /// Extension of the MATLAB files, `None` for CSV.
    pub fn matlab_extension(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Csv { .. } => None,
            ExportFormat::Matlab {
                named_variable: true,
                ..
            } => Some("m"),
            ExportFormat::Matlab { .. } => Some("txt"),
        }
    }
}

fn default_data_file_name() -> String {
    "data".to_string()
}

fn default_target_file_name() -> String {
    "target".to_string()
}

/// Where a save writes: a directory plus base file names (no extension).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTarget {
    pub dir: PathBuf,
    #[serde(default = "default_data_file_name")]
    pub data_file_name: String,
    /// Only used by the MATLAB format.
    #[serde(default = "default_target_file_name")]
    pub target_file_name: String,
}

impl ExportTarget {
    /// Target in `dir` using the default `data`/`target` names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            data_file_name: default_data_file_name(),
            target_file_name: default_target_file_name(),
        }
    }

    pub fn with_names(
        dir: impl Into<PathBuf>,
        data_file_name: impl Into<String>,
        target_file_name: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            data_file_name: data_file_name.into(),
            target_file_name: target_file_name.into(),
        }
    }
}

/// Concrete files a save produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub data: PathBuf,
    /// MATLAB target file; `None` for CSV.
    pub target: Option<PathBuf>,
}

impl OutputPaths {
    pub fn resolve(target: &ExportTarget, format: ExportFormat) -> Result<Self, DatasetError> {
        if target.data_file_name.is_empty() {
            return Err(DatasetError::EmptyFileName { which: "data" });
        }
        match format.matlab_extension() {
            None => Ok(Self {
                data: target.dir.join(format!("{}.csv", target.data_file_name)),
                target: None,
            }),
            Some(ext) => {
                if target.target_file_name.is_empty() {
                    return Err(DatasetError::EmptyFileName { which: "target" });
                }
                Ok(Self {
                    data: target
                        .dir
                        .join(format!("{}.{ext}", target.data_file_name)),
                    target: Some(
                        target
                            .dir
                            .join(format!("{}.{ext}", target.target_file_name)),
                    ),
                })
            }
        }
    }

    /// Paths that already exist on disk and would be overwritten.
    pub fn existing(&self) -> Vec<&Path> {
        std::iter::once(self.data.as_path())
            .chain(self.target.as_deref())
            .filter(|p| p.exists())
            .collect()
    }
}
