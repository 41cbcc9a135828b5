/// Errors returned by the dataset accumulator and its export writer.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("matrix target size {rows}x{cols} is invalid: both sides must be >= 2")]
    InvalidDimension { rows: usize, cols: usize },
    #[error("dataset settings are not locked")]
    NotLocked,
    #[error("dataset settings are already locked; reset first")]
    AlreadyLocked,
    #[error("label is empty")]
    EmptyLabel,
    #[error("label has {len} characters, at most {max} allowed")]
    LabelTooLong { len: usize, max: usize },
    #[error("sample is {got_rows}x{got_cols}, dataset expects {rows}x{cols}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
    #[error("no samples to save")]
    NoSamples,
    #[error("{which} file name is empty")]
    EmptyFileName { which: &'static str },
    #[error("session snapshot is inconsistent: {reason}")]
    InvalidSnapshot { reason: String },
    #[error(transparent)]
    Matrix(#[from] draw2matrix_core::MatrixError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
