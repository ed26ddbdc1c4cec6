//! Common types shared by the hazard risk crates.

pub mod error;
pub mod grid;
pub mod layer;

pub use error::{RiskError, RiskResult};
pub use grid::{is_no_data, Grid, RiskGrid, NO_DATA, RISK_MAX, RISK_MIN};
pub use layer::{LayerKind, LayerScheme, FALLBACK_BASE_COLOR};
