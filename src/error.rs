//! Error types for the stock_forecast crate

use thiserror::Error;

/// Custom error types for the stock_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Data source produced zero rows
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Too few observations for the requested window size
    #[error("Insufficient history: need at least {required} closes, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Training partition has zero variance, min-max scaling is undefined
    #[error("Degenerate scale: training partition has no variance (min == max == {0})")]
    DegenerateScale(f64),

    /// Window length disagrees with the one the model was trained with
    #[error("Shape mismatch: model expects windows of {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from serializing or deserializing an artifact
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<polars::prelude::PolarsError> for ForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
