//! Error types for the analysis engine.
//!
//! The engine degrades silently on dirty data; the variants here cover the
//! few conditions that cannot be expressed as an empty result (malformed
//! dataset shape, unknown model names, bad parameters) plus the wrappers
//! used by the ingestion adapters.
//!
//! Errors are serializable so they can be handed to a UI process as
//! `{ code, message }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the analysis engine.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The dataset is not tabular (its first record has no fields).
    #[error("Invalid dataset shape: {0}")]
    InvalidDatasetShape(String),

    /// A forecast model name was not recognised.
    #[error("Unknown forecast model '{0}' (expected linear, exponential or seasonal)")]
    UnknownModel(String),

    /// A call parameter is out of its valid range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Polars error wrapper (DataFrame ingestion).
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for [`AnalysisError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDatasetShape(_) => "INVALID_DATASET_SHAPE",
            Self::UnknownModel(_) => "UNKNOWN_MODEL",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
