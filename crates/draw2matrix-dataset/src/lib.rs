//! Labelled binary-matrix dataset accumulation and export.
//!
//! A [`DatasetAccumulator`] is locked with a [`DatasetConfig`], collects
//! `(matrix, label)` samples and writes them either as a CSV file or as a
//! MATLAB data/target file pair, optionally with one-hot encoded targets.
//!
//! CSV samples are serialized into an append-only staging buffer as they
//! arrive, so saving is a single copy-out. MATLAB samples are kept flattened
//! and pivoted into one row per feature at save time.

mod accumulator;
mod config;
mod csv;
mod error;
mod export;
mod label;
pub mod matlab;
mod session;
mod vocabulary;

pub use accumulator::{AccumulatorState, DatasetAccumulator};
pub use config::{DatasetConfig, ExportFormat, ExportTarget, OutputPaths};
pub use error::DatasetError;
pub use export::RenderedExport;
pub use label::{validate_label, MAX_LABEL_CHARS};
pub use session::SessionSnapshot;
pub use vocabulary::OneHotVocabulary;
