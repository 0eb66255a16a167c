//! Error types for content mapping and validation.

use thiserror::Error;

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors that can occur loading mappings or content records
#[derive(Error, Debug)]
pub enum ContentError {
    /// Content record file absent
    #[error("Content file not found: {path}")]
    MissingInput { path: String },

    /// Content record exists but is not valid JSON
    #[error("Malformed content file {path} (line {line}, column {column}): {message}")]
    Malformed {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// Mapping configuration error
    #[error("Mapping error: {reason}")]
    InvalidMapping { reason: String },

    /// TOML parsing error (mapping files)
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ContentError {
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

    /// Create an invalid mapping error
    pub fn invalid_mapping(reason: impl Into<String>) -> Self {
        Self::InvalidMapping {
            reason: reason.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "CNT001",
            Self::Malformed { .. } => "CNT002",
            Self::InvalidMapping { .. } => "CNT003",
            Self::TomlError(_) => "CNT004",
            Self::IoError(_) => "CNT005",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ContentError::missing_input("content.json");
        assert_eq!(err.code(), "CNT001");
        assert!(err.to_string().contains("content.json"));

        let err = ContentError::invalid_mapping("duplicate slide key");
        assert_eq!(err.code(), "CNT003");
    }
}
