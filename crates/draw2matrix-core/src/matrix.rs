//! Binary matrices and the flatten/transpose helpers used by dataset export.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors produced when building or reshaping matrices.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix has no rows")]
    Empty,
    #[error("row {row} has {got} values, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("value {value} at ({row}, {col}) is not 0 or 1")]
    InvalidValue { row: usize, col: usize, value: u8 },
}

/// Rectangular grid of 0/1 cells, stored row-major.
///
/// A `1` marks an ink cell, a `0` background.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct BinaryMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl BinaryMatrix {
    /// All-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build a matrix by evaluating `ink(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut ink: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(u8::from(ink(i, j)));
            }
        }
        Self { rows, cols, data }
    }

    /// Validate nested rows and build a matrix from them.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, MatrixError> {
        let Some(first) = rows.first() else {
            return Err(MatrixError::Empty);
        };
        let cols = first.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::Ragged {
                    row: i,
                    expected: cols,
                    got: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if value > 1 {
                    return Err(MatrixError::InvalidValue {
                        row: i,
                        col: j,
                        value,
                    });
                }
                data.push(value);
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Cell value, or `None` outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Mark or clear a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, ink: bool) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = u8::from(ink);
        }
    }

    /// Row-major cell values.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Every row in order; a zero-column matrix yields `rows` empty slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let cols = self.cols;
        (0..self.rows).map(move |i| &self.data[i * cols..(i + 1) * cols])
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.iter_rows().map(<[u8]>::to_vec).collect()
    }

    /// Number of ink cells.
    pub fn ink_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Render as nested bracketed lists: `[[0 1] [1 0]]`.
    pub fn render_rows(&self) -> String {
        let rows: Vec<String> = self.iter_rows().map(format_list).collect();
        format!("[{}]", rows.join(" "))
    }
}

impl TryFrom<Vec<Vec<u8>>> for BinaryMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<BinaryMatrix> for Vec<Vec<u8>> {
    fn from(m: BinaryMatrix) -> Self {
        m.to_rows()
    }
}

/// One bracketed row per line.
impl fmt::Display for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&format_list(row))?;
        }
        Ok(())
    }
}

/// Render a sequence as a space separated bracketed list: `[a b c]`.
pub fn format_list<T: fmt::Display>(values: &[T]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(" "))
}

/// Linearization order for [`flatten`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlattenOrder {
    RowMajor,
    ColumnMajor,
}

/// Result of [`flatten`].
///
/// The two orders intentionally produce different shapes: `RowMajor` is a
/// numeric vector for dataset rows, `ColumnMajor` is ready-to-print text with
/// one cell per line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flattened {
    Values(Vec<u8>),
    Text(String),
}

impl Flattened {
    pub fn into_values(self) -> Option<Vec<u8>> {
        match self {
            Flattened::Values(v) => Some(v),
            Flattened::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Flattened::Text(t) => Some(t),
            Flattened::Values(_) => None,
        }
    }
}

/// Flatten a matrix.
///
/// `ColumnMajor` emits the cells in reading order, one per line, i.e. the
/// matrix laid out as a single text column.
pub fn flatten(matrix: &BinaryMatrix, order: FlattenOrder) -> Flattened {
    match order {
        FlattenOrder::RowMajor => Flattened::Values(matrix.as_slice().to_vec()),
        FlattenOrder::ColumnMajor => {
            let lines: Vec<String> = matrix.as_slice().iter().map(u8::to_string).collect();
            Flattened::Text(lines.join("\n"))
        }
    }
}

/// Pivot a stack of equal-length vectors: `out[j][i] = rows[i][j]`.
///
/// Empty input gives empty output.
pub fn transpose<T: Copy>(rows: &[Vec<T>]) -> Result<Vec<Vec<T>>, MatrixError> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let width = first.len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(MatrixError::Ragged {
            row: i,
            expected: width,
            got: row.len(),
        });
    }

    let mut out: Vec<Vec<T>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        for (j, &v) in row.iter().enumerate() {
            out[j].push(v);
        }
    }
    Ok(out)
}
