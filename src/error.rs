//! Error types for the secom-impute toolkit

use thiserror::Error;

/// Result type alias for secom-impute operations
pub type Result<T> = std::result::Result<T, SecomError>;

/// Main error type for the toolkit
#[derive(Error, Debug)]
pub enum SecomError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Imputation error: {0}")]
    ImputationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Imputer not fitted")]
    NotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<polars::error::PolarsError> for SecomError {
    fn from(err: polars::error::PolarsError) -> Self {
        SecomError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for SecomError {
    fn from(err: serde_json::Error) -> Self {
        SecomError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SecomError {
    fn from(err: ndarray::ShapeError) -> Self {
        SecomError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
