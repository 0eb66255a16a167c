//! Error types for design-property extraction and merging.

use thiserror::Error;

/// Result type for design operations
pub type Result<T> = std::result::Result<T, DesignError>;

/// Errors that can occur while loading analysis files or merging design properties
#[derive(Error, Debug)]
pub enum DesignError {
    /// Analysis input file absent
    #[error("Analysis file not found: {path}")]
    MissingInput { path: String },

    /// Analysis input file exists but is not valid JSON
    #[error("Malformed analysis file {path} (line {line}, column {column}): {message}")]
    Malformed {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// A color value could not be parsed as hex RGB
    #[error("Invalid color value: {value}")]
    InvalidColor { value: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error (writing outputs)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl DesignError {
    /// Create a missing input error
    pub fn missing_input(path: impl Into<String>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Create a malformed-file error from a serde_json parse failure
    pub fn malformed(path: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }

    /// Create an invalid color error
    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "DSN001",
            Self::Malformed { .. } => "DSN002",
            Self::InvalidColor { .. } => "DSN003",
            Self::IoError(_) => "DSN004",
            Self::JsonError(_) => "DSN005",
        }
    }
}
