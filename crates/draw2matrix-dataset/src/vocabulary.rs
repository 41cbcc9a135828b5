use std::collections::HashMap;

/// Distinct labels in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OneHotVocabulary {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl OneHotVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from labels, keeping the first occurrence of each.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::new();
        for label in labels {
            vocab.insert(label.as_ref());
        }
        vocab
    }

    /// Add `label` if unseen; returns its index either way.
    pub fn insert(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// One-hot vector for `label`: a single 1 at its index.
    ///
    /// Unknown labels encode as all zeros.
    pub fn encode(&self, label: &str) -> Vec<u8> {
        let mut out = vec![0u8; self.labels.len()];
        match self.index_of(label) {
            Some(idx) => out[idx] = 1,
            None => log::warn!("label {label:?} is not in the one-hot vocabulary"),
        }
        out
    }
}
