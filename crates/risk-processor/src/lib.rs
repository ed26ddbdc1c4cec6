//! Numeric core of the hazard risk pipeline.
//!
//! ```text
//! flood, landslide, water, urban, protected
//!      │
//!      ├─► normalize(landslide, 1, 10)
//!      │
//!      ├─► crop every grid to the smallest shared rows x cols
//!      │
//!      ├─► risk = (flood + landslide) * 0.5 * water * (1 - urban) * protected
//!      │
//!      └─► exposure != 0 && flood == 0  ─►  99 (no data)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use risk_processor::{csv, RiskCompositor, RiskInputs, DimensionPolicy};
//!
//! let inputs = RiskInputs { flood, landslide, water, urban, protected };
//! let risk = RiskCompositor::new(DimensionPolicy::Crop).compute(&inputs)?;
//! csv::write_grid("riesgo.csv", &risk)?;
//! ```

pub mod compositor;
pub mod csv;
pub mod normalize;
pub mod stats;

pub use compositor::{compute_risk, DimensionPolicy, RiskCompositor, RiskInputs, RISK_FORMULA};
pub use csv::CsvLayout;
pub use normalize::{normalize, NormalizationMethod};
pub use stats::{GridStatistics, RiskStats};
