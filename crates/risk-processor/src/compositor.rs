//! Risk composition from hazard and exposure layers.

use risk_common::{Grid, RiskError, RiskGrid, RiskResult, NO_DATA, RISK_MAX, RISK_MIN};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::normalize::normalize;
use crate::stats::RiskStats;

/// Range the raw landslide layer is rescaled to before combination.
pub const LANDSLIDE_RANGE: (f64, f64) = (1.0, 10.0);

/// Human-readable form of the combination formula.
pub const RISK_FORMULA: &str =
    "(flood + landslide) × 0.5 × water × (1-urban) × area_protegida";

/// How inputs with different shapes are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionPolicy {
    /// Crop every grid to the smallest shared rows and columns.
    #[default]
    Crop,
    /// Reject inputs whose shapes differ.
    Strict,
}

/// The five layers combined into a risk grid.
#[derive(Debug, Clone)]
pub struct RiskInputs {
    /// Flood susceptibility, already on `[0, 10]`
    pub flood: Grid,
    /// Raw landslide susceptibility; rescaled to `[1, 10]` here
    pub landslide: Grid,
    /// Water presence on `[0, 1]`
    pub water: Grid,
    /// Urban fraction on `[0, 1]`
    pub urban: Grid,
    /// Protected-area mask, `0` or `1`
    pub protected: Grid,
}

impl RiskInputs {
    fn named(&self) -> [(&'static str, &Grid); 5] {
        [
            ("flood", &self.flood),
            ("landslide", &self.landslide),
            ("water", &self.water),
            ("urban", &self.urban),
            ("area_protegida", &self.protected),
        ]
    }
}

/// Combines hazard layers into a risk grid.
#[derive(Debug, Clone, Default)]
pub struct RiskCompositor {
    policy: DimensionPolicy,
}

impl RiskCompositor {
    pub fn new(policy: DimensionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DimensionPolicy {
        self.policy
    }

    /// Compute the risk grid.
    ///
    /// Cells whose exposure `water * (1 - urban) * protected` is non-zero
    /// while `flood == 0` are set to `NO_DATA`, as are cells whose result
    /// is NaN. Out-of-range flood or landslide values only produce a warning.
    pub fn compute(&self, inputs: &RiskInputs) -> RiskResult<RiskGrid> {
        for (name, grid) in inputs.named() {
            if grid.is_empty() {
                return Err(RiskError::EmptyGrid(format!("{} layer has no cells", name)));
            }
            debug!(layer = name, rows = grid.rows(), cols = grid.cols(), "Input layer");
        }

        // Landslide is rescaled over its full extent, before any cropping
        let landslide = normalize(&inputs.landslide, LANDSLIDE_RANGE.0, LANDSLIDE_RANGE.1)?;
        if let (Some((raw_lo, raw_hi)), Some((lo, hi))) =
            (inputs.landslide.finite_range(), landslide.finite_range())
        {
            info!(raw_min = raw_lo, raw_max = raw_hi, min = lo, max = hi, "Normalized landslide");
        }

        let (rows, cols) = self.target_shape(inputs)?;
        info!(rows, cols, "Target dimensions");

        let crop = |name: &str, grid: &Grid| {
            if grid.shape() != (rows, cols) {
                warn!(
                    layer = name,
                    from = %grid.dimensions_label(),
                    to = %format!("{}x{}", rows, cols),
                    "Cropping layer to shared dimensions"
                );
            }
            grid.crop(rows, cols)
        };

        let flood = crop("flood", &inputs.flood);
        let landslide = crop("landslide", &landslide);
        let water = crop("water", &inputs.water);
        let urban = crop("urban", &inputs.urban);
        let protected = crop("area_protegida", &inputs.protected);

        check_range("flood", &flood, RISK_MIN, RISK_MAX);
        check_range("landslide", &landslide, LANDSLIDE_RANGE.0, LANDSLIDE_RANGE.1);

        let data: Vec<f64> = flood
            .values()
            .iter()
            .zip(landslide.values())
            .zip(water.values())
            .zip(urban.values())
            .zip(protected.values())
            .map(|((((&f, &l), &w), &u), &p)| risk_cell(f, l, w, u, p))
            .collect();

        let risk = Grid::new(rows, cols, data)?;

        if let Some(stats) = RiskStats::compute(&risk) {
            info!(
                min = stats.min,
                max = stats.max,
                mean = stats.mean,
                no_data = stats.sentinel_count,
                zeros = stats.zero_count,
                "Computed risk grid"
            );
        }

        Ok(risk)
    }

    fn target_shape(&self, inputs: &RiskInputs) -> RiskResult<(usize, usize)> {
        let named = inputs.named();
        let rows = named.iter().map(|(_, g)| g.rows()).min().unwrap_or(0);
        let cols = named.iter().map(|(_, g)| g.cols()).min().unwrap_or(0);

        if self.policy == DimensionPolicy::Strict {
            // Flood is the reference layer
            let expected = inputs.flood.shape();
            let mismatched: Vec<String> = named
                .iter()
                .filter(|(_, g)| g.shape() != expected)
                .map(|(name, g)| format!("{} is {}", name, g.dimensions_label()))
                .collect();
            if !mismatched.is_empty() {
                return Err(RiskError::DimensionMismatch(format!(
                    "expected every layer to be {}; {}",
                    inputs.flood.dimensions_label(),
                    mismatched.join(", ")
                )));
            }
        }

        Ok((rows, cols))
    }
}

/// Risk for a single cell.
#[inline]
pub fn risk_cell(flood: f64, landslide: f64, water: f64, urban: f64, protected: f64) -> f64 {
    let exposure = water * (1.0 - urban) * protected;
    if exposure != 0.0 && flood == 0.0 {
        return NO_DATA;
    }
    let risk = (flood + landslide) * 0.5 * exposure;
    if risk.is_nan() {
        NO_DATA
    } else {
        risk
    }
}

/// Compute risk with the default crop-to-minimum dimension policy.
pub fn compute_risk(
    flood: &Grid,
    landslide: &Grid,
    water: &Grid,
    urban: &Grid,
    protected: &Grid,
) -> RiskResult<RiskGrid> {
    let inputs = RiskInputs {
        flood: flood.clone(),
        landslide: landslide.clone(),
        water: water.clone(),
        urban: urban.clone(),
        protected: protected.clone(),
    };
    RiskCompositor::default().compute(&inputs)
}

fn check_range(name: &str, grid: &Grid, lo: f64, hi: f64) {
    let in_range = grid.values().iter().all(|&v| v >= lo && v <= hi);
    if !in_range {
        let (min, max) = grid.finite_range().unwrap_or((f64::NAN, f64::NAN));
        warn!(
            layer = name,
            min,
            max,
            expected_min = lo,
            expected_max = hi,
            "Layer has values outside the valid range"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_cell_formula() {
        assert_eq!(risk_cell(4.0, 5.5, 1.0, 0.0, 1.0), 4.75);
        assert_eq!(risk_cell(4.0, 6.0, 0.5, 0.5, 1.0), 1.25);
    }

    #[test]
    fn test_risk_cell_no_data_override() {
        assert_eq!(risk_cell(0.0, 5.5, 1.0, 0.0, 1.0), NO_DATA);
    }

    #[test]
    fn test_risk_cell_zero_exposure_stays_zero() {
        // Urban or unprotected cells are true zeros even when flood is zero
        assert_eq!(risk_cell(0.0, 5.5, 1.0, 1.0, 1.0), 0.0);
        assert_eq!(risk_cell(7.0, 5.5, 1.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_risk_cell_nan_becomes_no_data() {
        assert_eq!(risk_cell(f64::NAN, 5.5, 1.0, 0.0, 1.0), NO_DATA);
        assert_eq!(risk_cell(3.0, 5.5, f64::NAN, 0.0, 1.0), NO_DATA);
    }

    #[test]
    fn test_dimension_policy_default_is_crop() {
        assert_eq!(DimensionPolicy::default(), DimensionPolicy::Crop);
        assert_eq!(RiskCompositor::default().policy(), DimensionPolicy::Crop);
    }
}
