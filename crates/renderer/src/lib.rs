//! Image rendering for hazard risk maps.
//!
//! Implements:
//! - Three-stop color gradients derived from a base color
//! - Layered raster compositing and JPEG encoding
//! - Color-scale legend documents

pub mod gradient;
pub mod legend;
pub mod raster;
pub mod style;

pub use gradient::{make_gradient, Gradient, GRADIENT_LEVELS};
pub use legend::{export_legend, ArtifactFiles, ColorScaleDocument, LayerSummary};
pub use raster::{encode_jpeg, render_layer, render_risk, save_jpeg, DEFAULT_JPEG_QUALITY};
pub use style::{GradientFactors, RiskPalette, Rgb};
