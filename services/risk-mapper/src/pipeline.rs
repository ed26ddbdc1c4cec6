//! Batch risk pipeline: load, compute, persist, render, legend.
//!
//! The risk grid is persisted before anything is rendered, so a render or
//! legend failure never loses the computed result. Those failures come back
//! inside [`PipelineOutcome::render`] instead of failing the whole run.

use std::fmt;
use std::path::PathBuf;

use renderer::{export_legend, make_gradient, render_risk, save_jpeg, ArtifactFiles, ColorScaleDocument};
use risk_common::{RiskError, RiskGrid};
use risk_processor::csv::{read_grid, write_grid};
use risk_processor::{CsvLayout, RiskCompositor, RiskInputs, RiskStats, RISK_FORMULA};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RiskConfig;

/// Pipeline stage, reported with failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Load,
    Compute,
    Persist,
    Render,
    Legend,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Load => "load",
            PipelineStage::Compute => "compute",
            PipelineStage::Persist => "persist",
            PipelineStage::Render => "render",
            PipelineStage::Legend => "legend",
        };
        f.write_str(name)
    }
}

/// A failure tagged with the stage it happened in.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: RiskError,
}

impl PipelineError {
    fn at(stage: PipelineStage) -> impl FnOnce(RiskError) -> PipelineError {
        move |source| PipelineError { stage, source }
    }
}

/// Image and legend written for a risk grid.
#[derive(Debug, Clone)]
pub struct RenderedArtifacts {
    pub jpeg_path: PathBuf,
    pub jpeg_bytes: u64,
    pub legend_path: PathBuf,
    pub legend: ColorScaleDocument,
}

/// Result of a pipeline run that got as far as persisting the risk grid.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub risk: RiskGrid,
    pub stats: Option<RiskStats>,
    pub csv_path: PathBuf,
    pub render: Result<RenderedArtifacts, PipelineError>,
}

/// Runs the risk pipeline for one configuration.
pub struct RiskPipeline {
    config: RiskConfig,
}

impl RiskPipeline {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Read the five input layers.
    pub fn load_inputs(&self) -> Result<RiskInputs, PipelineError> {
        let files = &self.config.inputs;
        let load = |file: &str| {
            read_grid(self.config.input_path(file), CsvLayout::bare())
                .map_err(PipelineError::at(PipelineStage::Load))
        };

        Ok(RiskInputs {
            flood: load(&files.flood)?,
            landslide: load(&files.landslide)?,
            water: load(&files.water)?,
            urban: load(&files.urban)?,
            protected: load(&files.protected)?,
        })
    }

    /// Run every stage.
    ///
    /// Errors before the risk grid is persisted fail the run; later ones are
    /// reported in the outcome.
    pub fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        info!(input_dir = %self.config.input_dir.display(), "Loading input layers");
        let inputs = self.load_inputs()?;

        let risk = RiskCompositor::new(self.config.dimension_policy)
            .compute(&inputs)
            .map_err(PipelineError::at(PipelineStage::Compute))?;
        let stats = RiskStats::compute(&risk);

        let csv_path = self.persist(&risk)?;

        let render = self.render(&risk);
        if let Err(e) = &render {
            warn!(stage = %e.stage, error = %e.source, "Risk grid saved but artifacts are incomplete");
        }

        Ok(PipelineOutcome {
            risk,
            stats,
            csv_path,
            render,
        })
    }

    fn persist(&self, risk: &RiskGrid) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| RiskError::WriteError {
                path: self.config.output_dir.display().to_string(),
                message: e.to_string(),
            })
            .map_err(PipelineError::at(PipelineStage::Persist))?;

        let path = self.config.csv_path();
        write_grid(&path, risk).map_err(PipelineError::at(PipelineStage::Persist))?;
        info!(path = %path.display(), dimensions = %risk.dimensions_label(), "Saved risk grid");
        Ok(path)
    }

    fn render(&self, risk: &RiskGrid) -> Result<RenderedArtifacts, PipelineError> {
        let palette = &self.config.palette;
        let gradient = make_gradient(&palette.base_color, palette.factors)
            .map_err(PipelineError::at(PipelineStage::Render))?;

        let image =
            render_risk(risk, &gradient, palette).map_err(PipelineError::at(PipelineStage::Render))?;
        let jpeg_path = self.config.jpeg_path();
        let jpeg_bytes = save_jpeg(&image, &jpeg_path, self.config.jpeg_quality)
            .map_err(PipelineError::at(PipelineStage::Render))?;
        info!(path = %jpeg_path.display(), bytes = jpeg_bytes, "Saved risk image");

        let files = ArtifactFiles {
            jpeg: self.config.outputs.jpeg.clone(),
            csv: self.config.outputs.csv.clone(),
        };
        let legend = export_legend(&gradient, palette, risk, RISK_FORMULA, files);
        let legend_path = self.config.legend_path();
        legend
            .write(&legend_path)
            .map_err(PipelineError::at(PipelineStage::Legend))?;
        info!(path = %legend_path.display(), "Saved color scale");

        Ok(RenderedArtifacts {
            jpeg_path,
            jpeg_bytes,
            legend_path,
            legend,
        })
    }
}
