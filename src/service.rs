//! Prediction serving boundary, transport-agnostic

use crate::error::{ForecastError, Result};
use crate::models::linear::TrainedLinearRegressor;
use crate::models::TrainedSequenceModel;
use crate::scaling::MinMaxScaler;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A prediction request: recent closing prices, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Recent closing prices in price units
    pub closes: Vec<f64>,
}

/// A prediction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Predicted next closing price in price units
    pub next_close: f64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
}

/// Immutable serving context built once at process start.
///
/// Holds the fitted scaler and trained model loaded from their persisted
/// artifacts. Everything here is read-only after construction, so one
/// instance may be shared across concurrent requests without locking.
#[derive(Debug)]
pub struct PredictionService {
    scaler: MinMaxScaler,
    model: Box<dyn TrainedSequenceModel + Send + Sync>,
    window_size: usize,
}

impl PredictionService {
    /// Build a service from a fitted scaler and trained model.
    ///
    /// The configured window size must agree with the one the model was
    /// trained with; a disagreement here would silently produce
    /// nonsensical predictions later, so it is rejected up front.
    pub fn new(
        scaler: MinMaxScaler,
        model: Box<dyn TrainedSequenceModel + Send + Sync>,
        window_size: usize,
    ) -> Result<Self> {
        if model.window_size() != window_size {
            return Err(ForecastError::ShapeMismatch {
                expected: model.window_size(),
                actual: window_size,
            });
        }

        Ok(Self {
            scaler,
            model,
            window_size,
        })
    }

    /// Load both persisted artifacts and build the serving context
    pub fn from_artifacts<P: AsRef<Path>>(
        model_path: P,
        scaler_path: P,
        window_size: usize,
    ) -> Result<Self> {
        let model = TrainedLinearRegressor::load(model_path)?;
        let scaler = MinMaxScaler::load(scaler_path)?;

        Self::new(scaler, Box::new(model), window_size)
    }

    /// The window size served by this context
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Predict the next closing price from a list of recent closes.
    ///
    /// Requires at least `window_size` closes; only the most recent
    /// `window_size` are used. Rejection happens before the model is
    /// touched.
    pub fn predict_next(&self, closes: &[f64]) -> Result<f64> {
        if closes.len() < self.window_size {
            return Err(ForecastError::InsufficientHistory {
                required: self.window_size,
                actual: closes.len(),
            });
        }

        let recent = &closes[closes.len() - self.window_size..];
        let window = self.scaler.transform(recent);

        let predicted_scaled = self.model.predict_one(&window)?;

        Ok(self.scaler.inverse_transform(predicted_scaled))
    }

    /// Handle a prediction request
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let next_close = self.predict_next(&request.closes)?;
        Ok(PredictionResponse { next_close })
    }

    /// Health check, a static ok status
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
        }
    }
}
