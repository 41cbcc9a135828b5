//! Save and restore a whole locked dataset (a "project file").

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accumulator::{Dataset, DatasetAccumulator, SampleStore};
use crate::config::DatasetConfig;
use crate::vocabulary::OneHotVocabulary;
use crate::DatasetError;

/// Serializable state of a locked [`DatasetAccumulator`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub config: DatasetConfig,
    pub sample_count: usize,
    #[serde(default)]
    pub saved: bool,
    /// Staged CSV records, one CRLF-terminated record per sample (CSV
    /// datasets).
    #[serde(default)]
    pub records: Vec<String>,
    /// Flattened inputs (MATLAB datasets).
    #[serde(default)]
    pub inputs: Vec<Vec<u8>>,
    /// Raw labels (MATLAB datasets).
    #[serde(default)]
    pub labels: Vec<String>,
    /// One-hot vocabulary in first-seen order.
    #[serde(default)]
    pub vocabulary: Vec<String>,
}

impl SessionSnapshot {
    /// Load a snapshot from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this snapshot to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn invalid(reason: impl Into<String>) -> DatasetError {
        DatasetError::InvalidSnapshot {
            reason: reason.into(),
        }
    }

    /// Rebuild the dataset, checking that the parts agree with each other.
    fn into_dataset(self) -> Result<Dataset, DatasetError> {
        self.config.validate()?;
        let mut dataset = Dataset::empty(self.config);

        match &mut dataset.store {
            SampleStore::Csv {
                staging,
                record_ends,
                ..
            } => {
                if !self.inputs.is_empty() || !self.labels.is_empty() {
                    return Err(Self::invalid("CSV dataset carries MATLAB samples"));
                }
                if self.records.len() != self.sample_count {
                    return Err(Self::invalid(format!(
                        "{} samples recorded, {} CSV records stored",
                        self.sample_count,
                        self.records.len()
                    )));
                }
                if let Some(bad) = self
                    .records
                    .iter()
                    .position(|r| !r.ends_with(crate::csv::RECORD_END))
                {
                    return Err(Self::invalid(format!(
                        "CSV record {bad} is not CRLF-terminated"
                    )));
                }
                for record in &self.records {
                    staging.extend_from_slice(record.as_bytes());
                    record_ends.push(staging.len());
                }
            }
            SampleStore::Matlab { inputs, labels, .. } => {
                if !self.records.is_empty() {
                    return Err(Self::invalid("MATLAB dataset carries CSV records"));
                }
                if self.inputs.len() != self.sample_count || self.labels.len() != self.sample_count
                {
                    return Err(Self::invalid(format!(
                        "{} samples recorded, {} inputs and {} labels stored",
                        self.sample_count,
                        self.inputs.len(),
                        self.labels.len()
                    )));
                }
                let (rows, cols) = self.config.sample_shape();
                if let Some(bad) = self.inputs.iter().position(|v| v.len() != rows * cols) {
                    return Err(Self::invalid(format!(
                        "input {bad} does not have {} cells",
                        rows * cols
                    )));
                }
                if self.inputs.iter().flatten().any(|&v| v > 1) {
                    return Err(Self::invalid("inputs contain values other than 0 and 1"));
                }
                *inputs = self.inputs;
                *labels = self.labels;
            }
        }

        if let Some(vocab) = dataset.vocabulary.as_mut() {
            *vocab = OneHotVocabulary::from_labels(&self.vocabulary);
            if vocab.len() != self.vocabulary.len() {
                return Err(Self::invalid("vocabulary has duplicate labels"));
            }
            if let SampleStore::Matlab { labels, .. } = &dataset.store {
                if let Some(missing) = labels.iter().find(|l| vocab.index_of(l).is_none()) {
                    return Err(Self::invalid(format!(
                        "label {missing:?} is missing from the vocabulary"
                    )));
                }
            }
        }

        dataset.sample_count = self.sample_count;
        dataset.saved = self.saved;
        Ok(dataset)
    }
}

impl DatasetAccumulator {
    /// Capture the locked dataset so it can be persisted.
    pub fn snapshot(&self) -> Result<SessionSnapshot, DatasetError> {
        let dataset = self.dataset()?;
        let (records, inputs, labels) = match &dataset.store {
            SampleStore::Csv { .. } => (
                dataset
                    .store
                    .csv_records()
                    .into_iter()
                    .map(|r| String::from_utf8_lossy(r).into_owned())
                    .collect::<Vec<_>>(),
                Vec::new(),
                Vec::new(),
            ),
            SampleStore::Matlab { inputs, labels, .. } => {
                (Vec::new(), inputs.clone(), labels.clone())
            }
        };
        Ok(SessionSnapshot {
            config: dataset.config,
            sample_count: dataset.sample_count,
            saved: dataset.saved,
            records,
            inputs,
            labels,
            vocabulary: dataset
                .vocabulary
                .as_ref()
                .map(|v| v.labels().to_vec())
                .unwrap_or_default(),
        })
    }

    /// Restore a snapshot into an unlocked accumulator.
    ///
    /// Fails with `AlreadyLocked` when a dataset is active; reset first.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<(), DatasetError> {
        if self.dataset.is_some() {
            return Err(DatasetError::AlreadyLocked);
        }
        let dataset = snapshot.into_dataset()?;
        log::info!(
            "restored dataset session with {} samples",
            dataset.sample_count
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    /// Accumulator locked with the state in `snapshot`.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, DatasetError> {
        let mut acc = Self::new();
        acc.restore(snapshot)?;
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draw2matrix_core::BinaryMatrix;

    fn matlab_acc() -> DatasetAccumulator {
        let mut acc = DatasetAccumulator::new();
        acc.lock(DatasetConfig {
            one_hot_encode: true,
            ..DatasetConfig::for_matrix_size(2, 2)
        })
        .expect("lock");
        let m = BinaryMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]).expect("m");
        acc.add_sample(&m, "x").expect("add");
        acc.add_sample(&BinaryMatrix::zeros(2, 2), "y").expect("add");
        acc
    }

    #[test]
    fn snapshot_requires_lock() {
        assert!(matches!(
            DatasetAccumulator::new().snapshot(),
            Err(DatasetError::NotLocked)
        ));
    }

    #[test]
    fn matlab_session_round_trips() {
        let acc = matlab_acc();
        let snap = acc.snapshot().expect("snapshot");
        assert_eq!(snap.inputs, vec![vec![1, 0, 0, 1], vec![0, 0, 0, 0]]);
        assert_eq!(snap.vocabulary, vec!["x", "y"]);

        let restored = DatasetAccumulator::from_snapshot(snap.clone()).expect("restore");
        assert_eq!(restored.sample_count(), 2);
        assert_eq!(restored.snapshot().expect("snapshot"), snap);
        assert_eq!(restored.encode_one_hot("y").expect("encode"), vec![0, 1]);
    }

    #[test]
    fn csv_session_round_trips() {
        let mut acc = DatasetAccumulator::new();
        acc.lock(DatasetConfig {
            matlab_format: false,
            ..DatasetConfig::for_matrix_size(1, 3)
        })
        .expect("lock");
        acc.add_sample(&BinaryMatrix::zeros(1, 3), "a").expect("add");
        acc.add_sample(&BinaryMatrix::zeros(1, 3), "two\nlines")
            .expect("add");
        let snap = acc.snapshot().expect("snapshot");
        assert_eq!(
            snap.records,
            vec!["[0 0 0],a\r\n", "[0 0 0],\"two\r\nlines\"\r\n"]
        );

        let restored = DatasetAccumulator::from_snapshot(snap.clone()).expect("restore");
        assert_eq!(restored.staging(), acc.staging());
        assert_eq!(restored.snapshot().expect("snapshot"), snap);
    }

    #[test]
    fn csv_record_count_must_match_exactly() {
        let mut acc = DatasetAccumulator::new();
        acc.lock(DatasetConfig {
            matlab_format: false,
            ..DatasetConfig::for_matrix_size(1, 2)
        })
        .expect("lock");
        acc.add_sample(&BinaryMatrix::zeros(1, 2), "a").expect("add");
        acc.add_sample(&BinaryMatrix::zeros(1, 2), "b").expect("add");
        let snap = acc.snapshot().expect("snapshot");

        for count in [0, 1, 3] {
            let mut bad = snap.clone();
            bad.sample_count = count;
            assert!(
                matches!(
                    DatasetAccumulator::from_snapshot(bad),
                    Err(DatasetError::InvalidSnapshot { .. })
                ),
                "sample_count {count} should be rejected"
            );
        }

        let mut unterminated = snap.clone();
        unterminated.records[1] = "[0 0],b".to_string();
        assert!(matches!(
            DatasetAccumulator::from_snapshot(unterminated),
            Err(DatasetError::InvalidSnapshot { .. })
        ));

        let mut restored = DatasetAccumulator::from_snapshot(snap).expect("restore");
        assert_eq!(restored.sample_count(), 2);
        let rendered = restored
            .render(&crate::ExportTarget::new("unused"))
            .expect("render");
        assert_eq!(
            String::from_utf8(rendered.data).expect("utf8"),
            "Input,Target\r\n[0 0],a\r\n[0 0],b\r\n"
        );
        restored
            .add_sample(&BinaryMatrix::zeros(1, 2), "c")
            .expect("add after restore");
        assert_eq!(restored.snapshot().expect("snapshot").records.len(), 3);
    }

    #[test]
    fn restore_into_locked_accumulator_fails() {
        let mut acc = matlab_acc();
        let snap = acc.snapshot().expect("snapshot");
        assert!(matches!(acc.restore(snap), Err(DatasetError::AlreadyLocked)));
    }

    #[test]
    fn inconsistent_snapshots_are_rejected() {
        let snap = matlab_acc().snapshot().expect("snapshot");

        let mut short = snap.clone();
        short.labels.pop();
        assert!(matches!(
            DatasetAccumulator::from_snapshot(short),
            Err(DatasetError::InvalidSnapshot { .. })
        ));

        let mut missing = snap.clone();
        missing.vocabulary = vec!["x".to_string()];
        assert!(matches!(
            DatasetAccumulator::from_snapshot(missing),
            Err(DatasetError::InvalidSnapshot { .. })
        ));

        let mut wide = snap;
        wide.inputs[0].push(1);
        assert!(matches!(
            DatasetAccumulator::from_snapshot(wide),
            Err(DatasetError::InvalidSnapshot { .. })
        ));
    }

    #[test]
    fn snapshot_json_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        let snap = matlab_acc().snapshot().expect("snapshot");
        snap.write_json(&path).expect("write");
        assert_eq!(SessionSnapshot::load_json(&path).expect("load"), snap);
    }
}
