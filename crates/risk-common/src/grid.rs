//! Dense raster grids.

use crate::{RiskError, RiskResult};

/// Reserved risk value meaning "no data / ambiguous".
pub const NO_DATA: f64 = 99.0;

/// Lower bound of the conceptual risk scale.
pub const RISK_MIN: f64 = 0.0;

/// Upper bound of the conceptual risk scale.
pub const RISK_MAX: f64 = 10.0;

/// Whether a risk cell is the no-data sentinel. NaN counts as no-data.
#[inline]
pub fn is_no_data(value: f64) -> bool {
    value.is_nan() || value == NO_DATA
}

/// A grid whose cells are either computed risk in `[RISK_MIN, RISK_MAX]`
/// or the `NO_DATA` sentinel.
pub type RiskGrid = Grid;

/// A rectangular grid of values stored in row-major order.
///
/// Grids are never mutated after construction; cropping and mapping
/// produce new grids.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Create a grid from row-major data.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> RiskResult<Self> {
        if data.len() != rows * cols {
            return Err(RiskError::DimensionMismatch(format!(
                "{} values cannot fill a {}x{} grid",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> RiskResult<Self> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * expected);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(RiskError::RaggedGrid {
                    row: i,
                    expected,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols: expected,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Cell value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// All cells in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Top-left aligned crop. Requested sizes larger than the grid are
    /// clamped to the grid's own size.
    pub fn crop(&self, rows: usize, cols: usize) -> Grid {
        let rows = rows.min(self.rows);
        let cols = cols.min(self.cols);

        if rows == self.rows && cols == self.cols {
            return self.clone();
        }

        let mut data = Vec::with_capacity(rows * cols);
        for row in self.iter_rows().take(rows) {
            data.extend_from_slice(&row[..cols]);
        }

        Grid { rows, cols, data }
    }

    /// Apply `f` to every cell, producing a new grid of the same shape.
    pub fn map<F>(&self, f: F) -> Grid
    where
        F: Fn(f64) -> f64,
    {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Minimum and maximum over finite cells, or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Dimensions formatted as `{rows}x{cols}`.
    pub fn dimensions_label(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }
}
