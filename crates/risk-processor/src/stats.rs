//! Summary statistics over grids.
//!
//! All reductions walk the cells in row-major order so results are
//! reproducible across runs.

use risk_common::{Grid, NO_DATA};
use serde::Serialize;

/// Observability statistics for a computed risk grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskStats {
    pub cells: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Cells equal to the no-data sentinel
    pub sentinel_count: usize,
    /// Cells exactly equal to zero
    pub zero_count: usize,
}

impl RiskStats {
    /// Compute statistics over every cell, sentinel included.
    /// Returns `None` for an empty grid.
    pub fn compute(grid: &Grid) -> Option<Self> {
        let values = grid.values();
        let first = *values.first()?;

        let mut min = first;
        let mut max = first;
        let mut sum = 0.0;
        let mut sentinel_count = 0;
        let mut zero_count = 0;

        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            if v == NO_DATA {
                sentinel_count += 1;
            } else if v == 0.0 {
                zero_count += 1;
            }
        }

        Some(Self {
            cells: values.len(),
            min,
            max,
            mean: sum / values.len() as f64,
            sentinel_count,
            zero_count,
        })
    }
}

/// Descriptive statistics for a single data layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl GridStatistics {
    /// Compute statistics over `values`. Returns `None` when empty.
    ///
    /// Variance is the population variance. Quartiles are read from the
    /// sorted values at indices `floor(n * 0.25)` and `floor(n * 0.75)`.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len();
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        let std = variance.sqrt();

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let min = sorted[0];
        let max = sorted[n - 1];
        let q1 = sorted[n / 4];
        let q3 = sorted[(n * 3) / 4];

        Some(Self {
            count: n,
            mean,
            median,
            std,
            variance,
            min,
            max,
            range: max - min,
            q1,
            q3,
            iqr: q3 - q1,
        })
    }
}
