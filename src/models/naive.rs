//! Last-value persistence baseline

use crate::error::{ForecastError, Result};
use crate::models::{SequenceModel, TrainOptions, TrainedSequenceModel, TrainingHistory};
use crate::preprocessing::SequencePair;
use serde::{Deserialize, Serialize};

/// Baseline that predicts the next close as the last close of the window.
///
/// Useful as a floor for evaluating trained models: anything that cannot
/// beat persistence is not forecasting.
#[derive(Debug, Clone)]
pub struct NaiveLast {
    name: String,
    window_size: usize,
}

/// "Trained" persistence baseline; training only records the window size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedNaiveLast {
    name: String,
    window_size: usize,
}

impl NaiveLast {
    /// Create a persistence baseline for the given window size
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 1 {
            return Err(ForecastError::InvalidParameter(
                "window_size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Naive Last Value (window={})", window_size),
            window_size,
        })
    }
}

impl SequenceModel for NaiveLast {
    type Trained = TrainedNaiveLast;

    fn train(
        &self,
        pair: &SequencePair,
        _opts: &TrainOptions,
    ) -> Result<(Self::Trained, TrainingHistory)> {
        for window in &pair.inputs {
            if window.len() != self.window_size {
                return Err(ForecastError::ShapeMismatch {
                    expected: self.window_size,
                    actual: window.len(),
                });
            }
        }

        let trained = TrainedNaiveLast {
            name: self.name.clone(),
            window_size: self.window_size,
        };

        Ok((trained, TrainingHistory::default()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSequenceModel for TrainedNaiveLast {
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        inputs.iter().map(|window| self.predict_one(window)).collect()
    }

    fn predict_one(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.window_size {
            return Err(ForecastError::ShapeMismatch {
                expected: self.window_size,
                actual: window.len(),
            });
        }

        Ok(window[window.len() - 1])
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn name(&self) -> &str {
        &self.name
    }
}
