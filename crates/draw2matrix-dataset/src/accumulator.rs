//! Locked-settings sample store.

use draw2matrix_core::{flatten, BinaryMatrix, FlattenOrder};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::{DatasetConfig, ExportFormat};
use crate::csv;
use crate::vocabulary::OneHotVocabulary;
use crate::DatasetError;

/// Samples staged for export, in the shape the export format needs.
///
/// Each variant carries its export options, so the store and the format
/// cannot disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SampleStore {
    /// Serialized CSV records, appended once per sample.
    Csv {
        flatten: bool,
        staging: Vec<u8>,
        /// End offset of every record in `staging`.
        record_ends: Vec<usize>,
    },
    /// Row-major flattened inputs and raw labels, pivoted at save time.
    Matlab {
        named_variable: bool,
        one_hot: bool,
        inputs: Vec<Vec<u8>>,
        labels: Vec<String>,
    },
}

impl SampleStore {
    fn empty(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Csv { flatten } => SampleStore::Csv {
                flatten,
                staging: Vec::new(),
                record_ends: Vec::new(),
            },
            ExportFormat::Matlab {
                named_variable,
                one_hot,
            } => SampleStore::Matlab {
                named_variable,
                one_hot,
                inputs: Vec::new(),
                labels: Vec::new(),
            },
        }
    }

    pub(crate) fn format(&self) -> ExportFormat {
        match self {
            SampleStore::Csv { flatten, .. } => ExportFormat::Csv { flatten: *flatten },
            SampleStore::Matlab {
                named_variable,
                one_hot,
                ..
            } => ExportFormat::Matlab {
                named_variable: *named_variable,
                one_hot: *one_hot,
            },
        }
    }

    /// Staged CSV records, one per sample.
    pub(crate) fn csv_records(&self) -> Vec<&[u8]> {
        let SampleStore::Csv {
            staging,
            record_ends,
            ..
        } = self
        else {
            return Vec::new();
        };
        let mut start = 0;
        record_ends
            .iter()
            .map(|&end| {
                let record = staging.get(start..end).unwrap_or_default();
                start = end;
                record
            })
            .collect()
    }
}

/// Everything owned by one locked dataset.
#[derive(Clone, Debug)]
pub(crate) struct Dataset {
    pub(crate) config: DatasetConfig,
    pub(crate) store: SampleStore,
    pub(crate) vocabulary: Option<OneHotVocabulary>,
    pub(crate) sample_count: usize,
    pub(crate) saved: bool,
}

impl Dataset {
    pub(crate) fn empty(config: DatasetConfig) -> Self {
        Self {
            config,
            store: SampleStore::empty(config.export_format()),
            vocabulary: config.one_hot_encode.then(OneHotVocabulary::new),
            sample_count: 0,
            saved: false,
        }
    }

    #[inline]
    pub(crate) fn format(&self) -> ExportFormat {
        self.store.format()
    }
}

/// Lifecycle of a [`DatasetAccumulator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccumulatorState {
    /// No settings locked; samples are rejected.
    Unlocked,
    /// Settings locked; samples may be added.
    Locked,
    /// Locked, and nothing was added since the last successful save.
    Saved,
}

/// Accumulates labelled matrices under a frozen [`DatasetConfig`].
///
/// ```
/// use draw2matrix_core::BinaryMatrix;
/// use draw2matrix_dataset::{DatasetAccumulator, DatasetConfig};
///
/// let mut acc = DatasetAccumulator::new();
/// acc.lock(DatasetConfig::for_matrix_size(3, 3)).unwrap();
/// acc.add_sample(&BinaryMatrix::zeros(3, 3), "A").unwrap();
/// assert_eq!(acc.sample_count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DatasetAccumulator {
    pub(crate) dataset: Option<Dataset>,
}

impl DatasetAccumulator {
    /// Unlocked accumulator.
    pub fn new() -> Self {
        Self { dataset: None }
    }

    pub fn state(&self) -> AccumulatorState {
        match &self.dataset {
            None => AccumulatorState::Unlocked,
            Some(d) if d.saved => AccumulatorState::Saved,
            Some(_) => AccumulatorState::Locked,
        }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.dataset.is_some()
    }

    /// Freeze `config` and start an empty dataset.
    pub fn lock(&mut self, config: DatasetConfig) -> Result<(), DatasetError> {
        if self.dataset.is_some() {
            return Err(DatasetError::AlreadyLocked);
        }
        config.validate()?;
        if config.one_hot_encode && !config.matlab_format {
            log::warn!("one-hot encoding only affects MATLAB export; CSV targets stay raw");
        }
        log::info!(
            "locked dataset settings: {}x{} samples, {:?}",
            config.matrix_rows - 1,
            config.matrix_cols - 1,
            config.export_format()
        );
        self.dataset = Some(Dataset::empty(config));
        Ok(())
    }

    /// Locked configuration, if any.
    pub fn config(&self) -> Option<&DatasetConfig> {
        self.dataset.as_ref().map(|d| &d.config)
    }

    /// Export format chosen at lock time, if any.
    pub fn export_format(&self) -> Option<ExportFormat> {
        self.dataset.as_ref().map(Dataset::format)
    }

    pub(crate) fn dataset(&self) -> Result<&Dataset, DatasetError> {
        self.dataset.as_ref().ok_or(DatasetError::NotLocked)
    }

    /// Append one labelled sample.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, matrix), fields(rows = matrix.rows(), cols = matrix.cols()))
    )]
    pub fn add_sample(&mut self, matrix: &BinaryMatrix, label: &str) -> Result<(), DatasetError> {
        let dataset = self.dataset.as_mut().ok_or(DatasetError::NotLocked)?;
        if label.is_empty() {
            return Err(DatasetError::EmptyLabel);
        }
        let (rows, cols) = dataset.config.sample_shape();
        if matrix.shape() != (rows, cols) {
            return Err(DatasetError::ShapeMismatch {
                rows,
                cols,
                got_rows: matrix.rows(),
                got_cols: matrix.cols(),
            });
        }

        match &mut dataset.store {
            SampleStore::Csv {
                flatten,
                staging,
                record_ends,
            } => {
                let input = csv::render_input(matrix, *flatten);
                csv::write_record(staging, &[&input, label]);
                record_ends.push(staging.len());
            }
            SampleStore::Matlab { inputs, labels, .. } => {
                let values = flatten(matrix, FlattenOrder::RowMajor)
                    .into_values()
                    .unwrap_or_default();
                inputs.push(values);
                labels.push(label.to_string());
            }
        }

        if let Some(vocab) = dataset.vocabulary.as_mut() {
            vocab.insert(label);
        }
        dataset.sample_count += 1;
        dataset.saved = false;
        log::debug!(
            "added sample #{} labelled {label:?} ({} ink cells)",
            dataset.sample_count,
            matrix.ink_count()
        );
        Ok(())
    }

    /// Discard all samples and unlock the settings.
    ///
    /// Returns `NotLocked` without touching anything when nothing is locked.
    pub fn reset(&mut self) -> Result<(), DatasetError> {
        let Some(dataset) = self.dataset.take() else {
            return Err(DatasetError::NotLocked);
        };
        if !dataset.saved && dataset.sample_count > 0 {
            log::warn!("reset discards {} unsaved samples", dataset.sample_count);
        }
        log::info!("dataset reset");
        Ok(())
    }

    /// Samples added since the last lock; 0 when unlocked.
    pub fn sample_count(&self) -> usize {
        self.dataset.as_ref().map_or(0, |d| d.sample_count)
    }

    /// Whether the current samples were all written by the last save.
    pub fn is_saved(&self) -> bool {
        self.dataset.as_ref().is_some_and(|d| d.saved)
    }

    /// Vocabulary of distinct labels (one-hot datasets only).
    pub fn vocabulary(&self) -> Option<&OneHotVocabulary> {
        self.dataset.as_ref().and_then(|d| d.vocabulary.as_ref())
    }

    /// One-hot vector for `label` against the current vocabulary.
    ///
    /// Empty when one-hot encoding is off; all zeros for unknown labels.
    pub fn encode_one_hot(&self, label: &str) -> Result<Vec<u8>, DatasetError> {
        let dataset = self.dataset()?;
        Ok(dataset
            .vocabulary
            .as_ref()
            .map(|v| v.encode(label))
            .unwrap_or_default())
    }

    /// Labels in insertion order (MATLAB datasets only).
    pub fn labels(&self) -> Option<&[String]> {
        match &self.dataset.as_ref()?.store {
            SampleStore::Matlab { labels, .. } => Some(labels.as_slice()),
            SampleStore::Csv { .. } => None,
        }
    }

    /// Staged CSV records (CSV datasets only).
    pub fn staging(&self) -> Option<&[u8]> {
        match &self.dataset.as_ref()?.store {
            SampleStore::Csv { staging, .. } => Some(staging.as_slice()),
            SampleStore::Matlab { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_config() -> DatasetConfig {
        DatasetConfig {
            matlab_format: false,
            ..DatasetConfig::for_matrix_size(2, 2)
        }
    }

    #[test]
    fn add_before_lock_is_rejected() {
        let mut acc = DatasetAccumulator::new();
        let err = acc.add_sample(&BinaryMatrix::zeros(2, 2), "a").unwrap_err();
        assert!(matches!(err, DatasetError::NotLocked));
        assert_eq!(acc.state(), AccumulatorState::Unlocked);
    }

    #[test]
    fn double_lock_is_rejected_until_reset() {
        let mut acc = DatasetAccumulator::new();
        acc.lock(csv_config()).expect("lock");
        assert!(matches!(
            acc.lock(csv_config()),
            Err(DatasetError::AlreadyLocked)
        ));
        acc.add_sample(&BinaryMatrix::zeros(2, 2), "a").expect("add");
        acc.reset().expect("reset");
        assert_eq!(acc.sample_count(), 0);
        assert!(acc.lock(DatasetConfig::default()).is_ok());
    }

    #[test]
    fn reset_without_lock_is_a_harmless_error() {
        let mut acc = DatasetAccumulator::new();
        assert!(matches!(acc.reset(), Err(DatasetError::NotLocked)));
        assert!(acc.lock(csv_config()).is_ok());
    }

    #[test]
    fn invalid_dimensions_do_not_lock() {
        let mut acc = DatasetAccumulator::new();
        let cfg = DatasetConfig {
            matrix_rows: 1,
            ..DatasetConfig::default()
        };
        assert!(matches!(
            acc.lock(cfg),
            Err(DatasetError::InvalidDimension { .. })
        ));
        assert!(!acc.is_locked());
    }

    #[test]
    fn wrong_shape_and_empty_label_are_rejected() {
        let mut acc = DatasetAccumulator::new();
        acc.lock(csv_config()).expect("lock");
        assert!(matches!(
            acc.add_sample(&BinaryMatrix::zeros(3, 2), "a"),
            Err(DatasetError::ShapeMismatch {
                rows: 2,
                cols: 2,
                got_rows: 3,
                got_cols: 2
            })
        ));
        assert!(matches!(
            acc.add_sample(&BinaryMatrix::zeros(2, 2), ""),
            Err(DatasetError::EmptyLabel)
        ));
        assert_eq!(acc.sample_count(), 0);
    }

    #[test]
    fn csv_samples_are_staged_immediately() {
        let mut acc = DatasetAccumulator::new();
        acc.lock(csv_config()).expect("lock");
        let m = BinaryMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]).expect("m");
        acc.add_sample(&m, "x").expect("add");
        acc.add_sample(&m, "y,z").expect("add");
        let staged = std::str::from_utf8(acc.staging().expect("csv")).expect("utf8");
        assert_eq!(staged, "[1 0 0 1],x\r\n[1 0 0 1],\"y,z\"\r\n");
        assert!(acc.labels().is_none());
        let records = acc.dataset().expect("dataset").store.csv_records();
        assert_eq!(
            records,
            vec![&b"[1 0 0 1],x\r\n"[..], &b"[1 0 0 1],\"y,z\"\r\n"[..]]
        );
    }

    #[test]
    fn matlab_samples_keep_labels_and_vocabulary() {
        let mut acc = DatasetAccumulator::new();
        acc.lock(DatasetConfig {
            one_hot_encode: true,
            ..DatasetConfig::for_matrix_size(2, 2)
        })
        .expect("lock");
        for label in ["cat", "dog", "cat"] {
            acc.add_sample(&BinaryMatrix::zeros(2, 2), label).expect("add");
        }
        assert_eq!(acc.labels().expect("labels"), &["cat", "dog", "cat"]);
        assert_eq!(acc.vocabulary().expect("vocab").labels(), &["cat", "dog"]);
        assert_eq!(acc.encode_one_hot("dog").expect("encode"), vec![0, 1]);
        assert_eq!(acc.encode_one_hot("owl").expect("encode"), vec![0, 0]);
    }

    #[test]
    fn store_carries_the_locked_export_options() {
        let configs = [
            csv_config(),
            DatasetConfig {
                flatten: false,
                ..csv_config()
            },
            DatasetConfig::for_matrix_size(2, 2),
            DatasetConfig {
                matlab_use_named_variable: true,
                one_hot_encode: true,
                ..DatasetConfig::for_matrix_size(2, 2)
            },
        ];
        for config in configs {
            let mut acc = DatasetAccumulator::new();
            acc.lock(config).expect("lock");
            assert_eq!(acc.export_format(), Some(config.export_format()));
            let dataset = acc.dataset().expect("dataset");
            assert_eq!(dataset.store.format(), config.export_format());
            assert!(dataset.store.csv_records().is_empty());
        }
    }

    #[test]
    fn encode_without_one_hot_is_empty() {
        let mut acc = DatasetAccumulator::new();
        assert!(matches!(
            acc.encode_one_hot("a"),
            Err(DatasetError::NotLocked)
        ));
        acc.lock(DatasetConfig::default()).expect("lock");
        assert!(acc.vocabulary().is_none());
        assert!(acc.encode_one_hot("a").expect("encode").is_empty());
    }
}
