//! Single-layer normalization command.

use std::path::Path;

use risk_common::{RiskError, RiskResult};
use risk_processor::csv::{read_grid, write_grid};
use risk_processor::{CsvLayout, GridStatistics, NormalizationMethod};
use serde::Serialize;
use tracing::info;

/// What the normalize command reports after writing its output.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationReport {
    pub normalization_type: String,
    pub algorithm: String,
    pub formula: String,
    pub dimensions: String,
    /// Statistics of the input values
    pub statistics: GridStatistics,
}

/// Normalize the grid at `input` and write it to `output`.
pub fn normalize_file(
    input: &Path,
    output: &Path,
    layout: CsvLayout,
    method: NormalizationMethod,
) -> RiskResult<NormalizationReport> {
    let grid = read_grid(input, layout)?;
    let normalized = method.apply(&grid)?;
    write_grid(output, &normalized)?;

    let statistics = GridStatistics::compute(grid.values())
        .ok_or_else(|| RiskError::EmptyGrid(input.display().to_string()))?;

    info!(
        method = method.id(),
        input = %input.display(),
        output = %output.display(),
        "Normalized layer"
    );

    Ok(NormalizationReport {
        normalization_type: method.id().to_string(),
        algorithm: method.algorithm().to_string(),
        formula: method.formula().to_string(),
        dimensions: grid.dimensions_label(),
        statistics,
    })
}
