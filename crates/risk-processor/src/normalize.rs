//! Value normalization.

use std::fmt;
use std::str::FromStr;

use risk_common::{Grid, RiskError, RiskResult};

use crate::stats::GridStatistics;

/// Linearly rescale a grid into `[lo, hi]` using its global min and max.
///
/// A constant grid maps every cell to the midpoint `(lo + hi) / 2`.
/// Non-finite cells are ignored when finding the range and become NaN.
pub fn normalize(grid: &Grid, lo: f64, hi: f64) -> RiskResult<Grid> {
    if grid.is_empty() {
        return Err(RiskError::EmptyGrid("cannot normalize an empty grid".into()));
    }

    let (min, max) = grid
        .finite_range()
        .ok_or_else(|| RiskError::EmptyGrid("grid has no numeric cells".into()))?;

    if max == min {
        let mid = (lo + hi) / 2.0;
        return Ok(grid.map(|v| if v.is_finite() { mid } else { f64::NAN }));
    }

    let span = max - min;
    Ok(grid.map(|v| {
        if v.is_finite() {
            lo + (v - min) / span * (hi - lo)
        } else {
            f64::NAN
        }
    }))
}

/// Normalization strategies offered for single-layer data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMethod {
    /// Rescale to `[0, 1]`.
    MinMax,
    /// Mean 0, population standard deviation 1.
    ZScore,
    /// Center on the median, scale by the interquartile range.
    Robust,
}

impl NormalizationMethod {
    pub fn id(&self) -> &'static str {
        match self {
            NormalizationMethod::MinMax => "minmax",
            NormalizationMethod::ZScore => "zscore",
            NormalizationMethod::Robust => "robust",
        }
    }

    pub fn algorithm(&self) -> &'static str {
        match self {
            NormalizationMethod::MinMax => "Min-Max Scaling (0-1 range)",
            NormalizationMethod::ZScore => "Z-Score Normalization (mean=0, std=1)",
            NormalizationMethod::Robust => "Robust Scaling (median and IQR)",
        }
    }

    pub fn formula(&self) -> &'static str {
        match self {
            NormalizationMethod::MinMax => "(x - min) / (max - min)",
            NormalizationMethod::ZScore => "(x - mean) / std",
            NormalizationMethod::Robust => "(x - median) / IQR",
        }
    }

    /// Apply the method to every cell of `grid`.
    ///
    /// Degenerate spreads (zero std or zero IQR) map every cell to 0.
    pub fn apply(&self, grid: &Grid) -> RiskResult<Grid> {
        if grid.values().iter().any(|v| !v.is_finite()) {
            return Err(RiskError::InvalidParameter {
                param: "data".into(),
                message: "all values must be valid numbers".into(),
            });
        }

        match self {
            NormalizationMethod::MinMax => normalize(grid, 0.0, 1.0),
            NormalizationMethod::ZScore => {
                let stats = statistics_of(grid)?;
                if stats.std == 0.0 {
                    return Ok(grid.map(|_| 0.0));
                }
                Ok(grid.map(|v| (v - stats.mean) / stats.std))
            }
            NormalizationMethod::Robust => {
                let stats = statistics_of(grid)?;
                if stats.iqr == 0.0 {
                    return Ok(grid.map(|_| 0.0));
                }
                Ok(grid.map(|v| (v - stats.median) / stats.iqr))
            }
        }
    }
}

fn statistics_of(grid: &Grid) -> RiskResult<GridStatistics> {
    GridStatistics::compute(grid.values())
        .ok_or_else(|| RiskError::EmptyGrid("cannot normalize an empty grid".into()))
}

impl fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for NormalizationMethod {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minmax" => Ok(NormalizationMethod::MinMax),
            "zscore" => Ok(NormalizationMethod::ZScore),
            "robust" => Ok(NormalizationMethod::Robust),
            _ => Err(RiskError::UnknownNormalization(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[f64]) -> Grid {
        Grid::new(1, values.len(), values.to_vec()).unwrap()
    }

    #[test]
    fn test_normalize_hits_both_bounds() {
        let grid = Grid::from_rows(vec![vec![3.0, 7.0], vec![5.0, 11.0]]).unwrap();
        let out = normalize(&grid, 1.0, 10.0).unwrap();
        assert_eq!(out.finite_range(), Some((1.0, 10.0)));
        assert_eq!(out.get(0, 1), Some(5.5));
    }

    #[test]
    fn test_normalize_constant_grid_is_midpoint() {
        let out = normalize(&Grid::filled(3, 2, 42.0), 1.0, 10.0).unwrap();
        assert!(out.values().iter().all(|&v| v == 5.5));
    }

    #[test]
    fn test_normalize_uses_global_range() {
        // Each row alone would normalize differently
        let grid = Grid::from_rows(vec![vec![0.0, 1.0], vec![9.0, 10.0]]).unwrap();
        let out = normalize(&grid, 0.0, 1.0).unwrap();
        assert_eq!(out.values(), &[0.0, 0.1, 0.9, 1.0]);
    }

    #[test]
    fn test_normalize_empty_grid_fails() {
        let err = normalize(&Grid::filled(0, 0, 0.0), 0.0, 1.0).unwrap_err();
        assert!(matches!(err, RiskError::EmptyGrid(_)));
    }

    #[test]
    fn test_normalize_keeps_nan() {
        let out = normalize(&row(&[0.0, f64::NAN, 4.0]), 0.0, 1.0).unwrap();
        assert_eq!(out.get(0, 0), Some(0.0));
        assert!(out.get(0, 1).unwrap().is_nan());
        assert_eq!(out.get(0, 2), Some(1.0));
    }

    #[test]
    fn test_normalize_infinite_cells_become_nan() {
        let grid = row(&[f64::INFINITY, 2.0, 6.0, f64::NEG_INFINITY]);
        let out = normalize(&grid, 1.0, 10.0).unwrap();
        assert!(out.get(0, 0).unwrap().is_nan());
        assert_eq!(out.get(0, 1), Some(1.0));
        assert_eq!(out.get(0, 2), Some(10.0));
        assert!(out.get(0, 3).unwrap().is_nan());
    }

    #[test]
    fn test_zscore() {
        let out = NormalizationMethod::ZScore
            .apply(&row(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]))
            .unwrap();
        // mean 5, population std 2
        assert_eq!(out.get(0, 0), Some(-1.5));
        assert_eq!(out.get(0, 7), Some(2.0));
    }

    #[test]
    fn test_zscore_constant_is_zero() {
        let out = NormalizationMethod::ZScore.apply(&row(&[3.0, 3.0])).unwrap();
        assert_eq!(out.values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_robust() {
        // sorted: 1 2 3 4 5 6 7 8, q1 = sorted[2] = 3, q3 = sorted[6] = 7, median 4.5
        let out = NormalizationMethod::Robust
            .apply(&row(&[8.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]))
            .unwrap();
        assert_eq!(out.get(0, 0), Some((8.0 - 4.5) / 4.0));
        assert_eq!(out.get(0, 4), Some((4.0 - 4.5) / 4.0));
    }

    #[test]
    fn test_minmax_method() {
        let out = NormalizationMethod::MinMax.apply(&row(&[2.0, 4.0, 6.0])).unwrap();
        assert_eq!(out.values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_method_rejects_nan() {
        assert!(NormalizationMethod::Robust.apply(&row(&[1.0, f64::NAN])).is_err());
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("MinMax".parse::<NormalizationMethod>().unwrap(), NormalizationMethod::MinMax);
        assert_eq!("zscore".parse::<NormalizationMethod>().unwrap(), NormalizationMethod::ZScore);
        let err = "log".parse::<NormalizationMethod>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown normalization type: log. Supported: minmax, zscore, robust"
        );
    }
}
