//! Error types for station-heatmap.

use thiserror::Error;

/// Result type alias using ClimateError.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Primary error type for the heatmap pipeline.
///
/// Only structural problems end up here. Data-quality issues (missing
/// values, out-of-range day indices, gaps the repairer cannot reach) are
/// carried through the pipeline as missing cells instead.
#[derive(Debug, Error)]
pub enum ClimateError {
    // === Input Errors ===
    #[error("No observations in input")]
    EmptyInput,

    #[error("Failed to parse input: {0}")]
    Parse(String),

    #[error("Matrix row {row} has {found} cells, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    // === Palette Errors ===
    #[error("Palette not found: {0}")]
    PaletteNotFound(String),

    #[error("Palette '{palette}' has no variant with {bins} or fewer colors")]
    BinsNotAvailable { palette: String, bins: usize },

    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    // === Configuration Errors ===
    #[error("Invalid value for option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(String),
}

impl ClimateError {
    /// Create an InvalidOption error.
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Whether the error stems from caller-supplied configuration rather
    /// than from the data or the environment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ClimateError::PaletteNotFound(_)
                | ClimateError::BinsNotAvailable { .. }
                | ClimateError::InvalidPalette(_)
                | ClimateError::InvalidColor(_)
                | ClimateError::InvalidOption { .. }
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for ClimateError {
    fn from(err: std::io::Error) -> Self {
        ClimateError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClimateError {
    fn from(err: serde_json::Error) -> Self {
        ClimateError::Parse(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ClimateError {
    fn from(err: serde_yaml::Error) -> Self {
        ClimateError::Parse(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        assert!(ClimateError::PaletteNotFound("Nope".into()).is_configuration());
        assert!(ClimateError::invalid_option("continuity", "out of range").is_configuration());
        assert!(!ClimateError::EmptyInput.is_configuration());
        assert!(!ClimateError::Render("boom".into()).is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ClimateError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ClimateError::Io(msg) if msg.contains("gone")));
    }
}
