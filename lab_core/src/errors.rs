//! # Error Types
//!
//! Structured error types for lab_core. Data-quality problems in a completed
//! calculation are never errors: they travel as entries of a
//! [`ValidationReport`](crate::validation::ValidationReport). The variants
//! below cover the completeness gate, settings files, and the export paths.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::calculations::RockSampleInput;
//! use lab_core::errors::LabError;
//!
//! let input = RockSampleInput {
//!     initial_mass_g: 285.12,
//!     saturated_surface_dry_mass_g: 287.11,
//!     submerged_mass_g: 0.0,
//!     dry_mass_g: 280.50,
//!     water_temperature_c: 26.0,
//! };
//!
//! let err = input.validate().unwrap_err();
//! assert_eq!(err.error_code(), "INCOMPLETE_INPUT");
//! match err {
//!     LabError::IncompleteInput { fields, .. } => assert_eq!(fields, vec!["masaSumergida".to_string()]),
//!     other => panic!("unexpected error: {}", other),
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lab_core operations
pub type LabResult<T> = Result<T, LabError>;

/// Structured error type for gate, settings and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LabError {
    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// One or more measurements are zero or negative, so no calculation runs
    #[error("Incomplete {sample} input: {} must be positive", .fields.join(", "))]
    IncompleteInput { sample: String, fields: Vec<String> },

    /// Settings file could not be read or parsed
    #[error("Config error: '{path}' - {reason}")]
    ConfigError { path: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// CSV or PDF generation failed
    #[error("Export failed: {format} - {reason}")]
    ExportError { format: String, reason: String },
}

impl LabError {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        LabError::MissingField {
            field: field.into(),
        }
    }

    /// Create an IncompleteInput error
    pub fn incomplete_input<S: Into<String>>(sample: impl Into<String>, fields: impl IntoIterator<Item = S>) -> Self {
        LabError::IncompleteInput {
            sample: sample.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an ExportError
    pub fn export_error(format: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::ExportError {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// True when the error only means "not enough data yet"
    pub fn is_incomplete(&self) -> bool {
        matches!(self, LabError::IncompleteInput { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LabError::MissingField { .. } => "MISSING_FIELD",
            LabError::IncompleteInput { .. } => "INCOMPLETE_INPUT",
            LabError::ConfigError { .. } => "CONFIG_ERROR",
            LabError::FileError { .. } => "FILE_ERROR",
            LabError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LabError::ExportError { .. } => "EXPORT_ERROR",
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(err: serde_json::Error) -> Self {
        LabError::SerializationError {
            reason: err.to_string(),
        }
    }
}
