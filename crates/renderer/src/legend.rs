//! Color-scale metadata written next to rendered rasters.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use risk_common::{is_no_data, Grid, LayerScheme, RiskError, RiskResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gradient::{Gradient, GRADIENT_LEVELS};
use crate::style::RiskPalette;

/// Key used for the zero level in mappings.
pub const ZERO_KEY: &str = "0";
/// Key used for the no-data sentinel in mappings.
pub const NO_DATA_KEY: &str = "99";

const RISK_DATA_TYPE: &str = "riesgo";
const RISK_TITLE: &str = "Mapa de Riesgo de Desastres";
const CONCEPTUAL_RANGE: &str = "0-10 (escala completa del riesgo)";
const GRADIENT_DESCRIPTION: &str =
    "Neon Yellow (0) → Claro → Base → Oscuro (1-10, valores bajos a altos)";

/// Metadata describing how a risk raster was colored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScaleDocument {
    pub data_type: String,
    pub title: String,
    pub description: String,
    pub color_scheme: ColorScheme,
    /// `"{rows}x{cols}"`
    pub dimensions: String,
    pub files: ArtifactFiles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub base_color: String,
    pub color_name: String,
    pub gradient: String,
    /// Level ("0".."10", "99") to hex color
    pub color_mapping: BTreeMap<String, String>,
    /// Sentinel or zero to explanation
    pub special_values: BTreeMap<String, String>,
    pub value_range: ValueRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub conceptual: String,
    pub actual_data: DataRange,
}

/// Observed range; both are `None` when every cell is no-data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFiles {
    pub jpeg: String,
    pub csv: String,
}

/// One rendered input layer in `conversion_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub jpeg_path: String,
    pub dimensions: String,
    pub data_type: String,
    /// Title of the color scheme used
    pub color_scheme: String,
}

impl LayerSummary {
    pub fn new(jpeg_path: impl Into<String>, grid: &Grid, scheme: &LayerScheme) -> Self {
        Self {
            jpeg_path: jpeg_path.into(),
            dimensions: grid.dimensions_label(),
            data_type: scheme.data_type().to_string(),
            color_scheme: scheme.title(),
        }
    }
}

/// Discrete color table: levels 1..=10 from the gradient, 0 and 99 fixed.
///
/// Fixed colors are emitted as configured; gradient colors are lower-case.
pub fn color_mapping(gradient: &Gradient, palette: &RiskPalette) -> BTreeMap<String, String> {
    let mut mapping: BTreeMap<String, String> = gradient
        .level_colors()
        .into_iter()
        .map(|(level, color)| (level.to_string(), color.to_hex()))
        .collect();
    mapping.insert(ZERO_KEY.to_string(), palette.zero_color.clone());
    mapping.insert(NO_DATA_KEY.to_string(), palette.no_data_color.clone());
    debug_assert_eq!(mapping.len(), GRADIENT_LEVELS as usize + 2);
    mapping
}

/// Min and max over cells that are neither 99 nor NaN.
pub fn value_range(grid: &Grid) -> DataRange {
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    for &v in grid.values().iter().filter(|&&v| v.is_finite() && !is_no_data(v)) {
        min = Some(min.map_or(v, |m| m.min(v)));
        max = Some(max.map_or(v, |m| m.max(v)));
    }
    DataRange { min, max }
}

/// Build the legend document for a risk grid.
pub fn export_legend(
    gradient: &Gradient,
    palette: &RiskPalette,
    risk: &Grid,
    formula: &str,
    files: ArtifactFiles,
) -> ColorScaleDocument {
    let mut special_values = BTreeMap::new();
    special_values.insert(
        ZERO_KEY.to_string(),
        format!("Riesgo mínimo (mostrado como {})", palette.zero_color),
    );
    special_values.insert(
        NO_DATA_KEY.to_string(),
        format!("Sin dato (mostrado como {})", palette.no_data_color),
    );

    let actual_data = value_range(risk);
    debug!(min = ?actual_data.min, max = ?actual_data.max, "Legend value range");

    ColorScaleDocument {
        data_type: RISK_DATA_TYPE.to_string(),
        title: RISK_TITLE.to_string(),
        description: format!("Riesgo calculado: {}", formula),
        color_scheme: ColorScheme {
            base_color: palette.base_color.clone(),
            color_name: palette.color_name.clone(),
            gradient: GRADIENT_DESCRIPTION.to_string(),
            color_mapping: color_mapping(gradient, palette),
            special_values,
            value_range: ValueRange {
                conceptual: CONCEPTUAL_RANGE.to_string(),
                actual_data,
            },
        },
        dimensions: risk.dimensions_label(),
        files,
    }
}

impl ColorScaleDocument {
    pub fn to_json_pretty(&self) -> RiskResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> RiskResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write pretty JSON to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> RiskResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?).map_err(|e| RiskError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Write layer summaries keyed by source file name.
pub fn write_layer_summaries(
    summaries: &BTreeMap<String, LayerSummary>,
    path: impl AsRef<Path>,
) -> RiskResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(summaries)?;
    fs::write(path, json).map_err(|e| RiskError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
