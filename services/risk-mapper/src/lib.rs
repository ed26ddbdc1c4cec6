//! Risk mapper service library.
//!
//! Wires the risk compositor, renderer and legend exporter into batch
//! commands driven by [`config::RiskConfig`].

pub mod config;
pub mod layers;
pub mod normalization;
pub mod pipeline;

pub use config::RiskConfig;
pub use pipeline::{PipelineError, PipelineOutcome, PipelineStage, RiskPipeline};
