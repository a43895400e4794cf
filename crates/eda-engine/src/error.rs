//! Custom error types for the analysis engine.
//!
//! Every error carries the offending column (when there is one) and the
//! failing condition. Errors are serializable so a rendering host can show
//! them next to a partial report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A column could not be assigned a semantic type.
    #[error("Failed to classify column '{column}': {reason}")]
    Classification { column: String, reason: String },

    /// A health flag, recommendation or correlation entry names a column
    /// that has no profile.
    #[error("{source_kind} references unknown column '{column}'")]
    Aggregation { column: String, source_kind: String },

    /// A configuration value is outside its valid range.
    #[error("Invalid configuration for '{field}': {value} ({reason})")]
    Configuration {
        field: String,
        value: f64,
        reason: String,
    },

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    pub fn classification(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Classification {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn aggregation(column: impl Into<String>, source_kind: impl Into<String>) -> Self {
        Self::Aggregation {
            column: column.into(),
            source_kind: source_kind.into(),
        }
    }

    pub fn configuration(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for host handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Classification { .. } => "CLASSIFICATION_ERROR",
            Self::Aggregation { .. } => "AGGREGATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Name of the column the error is about, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Classification { column, .. } | Self::Aggregation { column, .. } => {
                Some(column)
            }
            Self::WithContext { source, .. } => source.column(),
            _ => None,
        }
    }
}

/// Errors are serialized as a struct with `code`, `message` and `column`
/// fields.
impl Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EngineError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("column", &self.column())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

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
        self.map_err(|e| EngineError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EngineError::classification("age", "column has no rows").error_code(),
            "CLASSIFICATION_ERROR"
        );
        assert_eq!(
            EngineError::aggregation("ghost", "health flag").error_code(),
            "AGGREGATION_ERROR"
        );
        assert_eq!(
            EngineError::configuration("iqr_multiplier", -1.0, "must be positive").error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_error_carries_column() {
        let error = EngineError::classification("age", "column has no rows");
        assert_eq!(error.column(), Some("age"));
        assert!(error.to_string().contains("age"));
        assert!(error.to_string().contains("no rows"));

        let error = EngineError::configuration("nullity_threshold", 1.5, "must be within [0, 1]");
        assert_eq!(error.column(), None);
        assert!(error.to_string().contains("nullity_threshold"));
    }

    #[test]
    fn test_error_serialization() {
        let error = EngineError::aggregation("City", "recommendation");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("AGGREGATION_ERROR"));
        assert!(json.contains("City"));
        assert!(json.contains("recommendation"));
    }

    #[test]
    fn test_with_context() {
        let error = EngineError::classification("age", "column has no rows")
            .with_context("During classification");
        assert!(error.to_string().contains("During classification"));
        assert_eq!(error.error_code(), "CLASSIFICATION_ERROR");
        assert_eq!(error.column(), Some("age"));
    }
}
