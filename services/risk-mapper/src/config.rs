//! Risk mapper configuration loading and types.

use anyhow::{bail, Context, Result};
use renderer::{RiskPalette, DEFAULT_JPEG_QUALITY};
use risk_processor::DimensionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a risk computation run, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Directory holding the five input layers.
    pub input_dir: PathBuf,

    /// File names of the input layers inside `input_dir`.
    pub inputs: InputFiles,

    /// Directory the artifacts are written to.
    pub output_dir: PathBuf,

    /// Artifact file names inside `output_dir`.
    pub outputs: OutputFiles,

    /// Colors for the risk raster and legend.
    pub palette: RiskPalette,

    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,

    /// How layers with different shapes are reconciled.
    pub dimension_policy: DimensionPolicy,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            inputs: InputFiles::default(),
            output_dir: PathBuf::from("."),
            outputs: OutputFiles::default(),
            palette: RiskPalette::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            dimension_policy: DimensionPolicy::default(),
        }
    }
}

/// Input layer file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub flood: String,
    pub landslide: String,
    pub water: String,
    pub urban: String,
    pub protected: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            flood: "flood.csv".to_string(),
            landslide: "landslide.csv".to_string(),
            water: "water.csv".to_string(),
            urban: "urban.csv".to_string(),
            protected: "pixeles_areas_protegidas.csv".to_string(),
        }
    }
}

/// Artifact file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub csv: String,
    pub jpeg: String,
    pub legend: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            csv: "riesgo.csv".to_string(),
            jpeg: "riesgo.jpeg".to_string(),
            legend: "riesgo_scale.json".to_string(),
        }
    }
}

impl RiskConfig {
    /// Load configuration from a YAML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        validate_quality(self.jpeg_quality)?;
        self.palette.validate().context("Invalid palette")?;
        Ok(())
    }

    pub fn input_path(&self, file: &str) -> PathBuf {
        self.input_dir.join(file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.outputs.csv)
    }

    pub fn jpeg_path(&self) -> PathBuf {
        self.output_dir.join(&self.outputs.jpeg)
    }

    pub fn legend_path(&self) -> PathBuf {
        self.output_dir.join(&self.outputs.legend)
    }
}

/// JPEG quality must be in `1..=100`.
pub fn validate_quality(quality: u8) -> Result<()> {
    if !(1..=100).contains(&quality) {
        bail!("jpeg_quality must be in 1..=100, got {}", quality);
    }
    Ok(())
}
