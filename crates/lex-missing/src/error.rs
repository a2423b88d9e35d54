//! Error types for missing-value analysis.
//!
//! Every failure is detected before any analyzer touches row data, so an
//! error never leaves partial results behind. Errors are serializable as
//! `{code, message}` pairs so a frontend can branch on the code.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for missing-value analysis.
#[derive(Error, Debug)]
pub enum MissingError {
    /// A column's classified type is neither numeric nor categorical.
    #[error("Column '{column}' has unsupported type {dtype}: expected numeric or categorical")]
    UnsupportedColumnType { column: String, dtype: String },

    /// The column type gate could not classify a column.
    #[error("Column '{column}' with dtype {dtype} cannot be classified")]
    UnclassifiableColumn { column: String, dtype: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The combination of arguments does not select an analysis.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Invalid rendering configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A rendering routine failed to produce a figure.
    #[error("Failed to render figure: {0}")]
    RenderFailed(String),

    /// Polars error wrapper.
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
        source: Box<MissingError>,
    },
}

impl MissingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MissingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedColumnType { .. } => "UNSUPPORTED_COLUMN_TYPE",
            Self::UnclassifiableColumn { .. } => "UNCLASSIFIABLE_COLUMN",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidArguments(_) => "INVALID_ARGUMENTS",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::RenderFailed(_) => "RENDER_FAILED",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the caller's arguments rather than the data.
    pub fn is_argument_error(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::InvalidArguments(_) | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_argument_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for MissingError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        MissingError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for MissingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("MissingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for missing-value analysis.
pub type Result<T> = std::result::Result<T, MissingError>;

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
        self.map_err(|e| MissingError::Polars(e).with_context(context))
    }
}
