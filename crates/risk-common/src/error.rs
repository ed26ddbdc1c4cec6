//! Error types for the hazard risk pipeline.

use thiserror::Error;

/// Result type alias using RiskError.
pub type RiskResult<T> = Result<T, RiskError>;

/// Primary error type for grid loading, composition and rendering.
#[derive(Debug, Error)]
pub enum RiskError {
    // === Input Errors ===
    #[error("Failed to read '{path}': {message}")]
    ReadError { path: String, message: String },

    #[error("Invalid value '{token}' in {source_name} at line {line}, column {column}")]
    ParseError {
        source_name: String,
        line: usize,
        column: usize,
        token: String,
    },

    #[error("Grid is empty: {0}")]
    EmptyGrid(String),

    #[error("Ragged grid: row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Grid shape mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    #[error("Unknown normalization type: {0}. Supported: minmax, zscore, robust")]
    UnknownNormalization(String),

    // === Output Errors ===
    #[error("Failed to write '{path}': {message}")]
    WriteError { path: String, message: String },

    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Serialization failed: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RiskError {
    /// Coarse classification used when reporting a failed invocation.
    pub fn category(&self) -> &'static str {
        match self {
            RiskError::ReadError { .. }
            | RiskError::ParseError { .. }
            | RiskError::EmptyGrid(_)
            | RiskError::RaggedGrid { .. }
            | RiskError::DimensionMismatch(_) => "input",

            RiskError::InvalidParameter { .. }
            | RiskError::InvalidColor(_)
            | RiskError::UnknownNormalization(_) => "configuration",

            RiskError::WriteError { .. } | RiskError::SerializationError(_) => "output",
            RiskError::RenderError(_) => "render",
            RiskError::InternalError(_) => "internal",
        }
    }

    /// True for failures caused by the supplied grids rather than the environment.
    pub fn is_input_error(&self) -> bool {
        self.category() == "input"
    }
}

impl From<std::io::Error> for RiskError {
    fn from(err: std::io::Error) -> Self {
        RiskError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(err: serde_json::Error) -> Self {
        RiskError::SerializationError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(RiskError::EmptyGrid("flood".into()).category(), "input");
        assert_eq!(RiskError::InvalidColor("#zz".into()).category(), "configuration");
        assert_eq!(RiskError::RenderError("boom".into()).category(), "render");
        assert!(RiskError::DimensionMismatch("3x3 vs 2x2".into()).is_input_error());
        assert!(!RiskError::RenderError("boom".into()).is_input_error());
    }

    #[test]
    fn test_parse_error_message() {
        let err = RiskError::ParseError {
            source_name: "flood.csv".into(),
            line: 3,
            column: 2,
            token: "abc".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' in flood.csv at line 3, column 2"
        );
    }
}
