//! Sequence-to-one forecasting models

use crate::error::{ForecastError, Result};
use crate::preprocessing::SequencePair;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Options controlling a training run.
///
/// Defaults mirror the usual recurrent-network training setup: a trailing
/// validation split, early stopping on a validation-loss plateau, and
/// learning-rate decay with a floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOptions {
    /// Trailing fraction of the training pairs held out for validation
    pub validation_split: f64,
    /// Hard cap on training epochs
    pub max_epochs: usize,
    /// Epochs without validation improvement before training stops
    pub patience: usize,
    /// Initial learning rate
    pub learning_rate: f64,
    /// Multiplier applied to the learning rate on a plateau
    pub lr_decay_factor: f64,
    /// Epochs without improvement before the learning rate decays
    pub lr_decay_patience: usize,
    /// Lower bound for the decayed learning rate
    pub min_learning_rate: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            validation_split: 0.1,
            max_epochs: 50,
            patience: 5,
            learning_rate: 0.1,
            lr_decay_factor: 0.5,
            lr_decay_patience: 3,
            min_learning_rate: 1e-6,
        }
    }
}

impl TrainOptions {
    /// Validate the option values
    pub fn validate(&self) -> Result<()> {
        if self.validation_split < 0.0 || self.validation_split >= 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "validation_split must be in [0, 1), got {}",
                self.validation_split
            )));
        }

        if self.max_epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_epochs must be at least 1".to_string(),
            ));
        }

        if self.learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "learning_rate must be positive".to_string(),
            ));
        }

        if self.lr_decay_factor <= 0.0 || self.lr_decay_factor >= 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "lr_decay_factor must be in (0, 1), got {}",
                self.lr_decay_factor
            )));
        }

        Ok(())
    }
}

/// Record of a completed training run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Epochs actually run before stopping
    pub epochs_run: usize,
    /// Epoch whose weights were retained
    pub best_epoch: usize,
    /// Validation loss at the retained epoch
    pub best_val_loss: f64,
    /// Training loss per epoch
    pub train_loss: Vec<f64>,
    /// Validation loss per epoch
    pub val_loss: Vec<f64>,
}

/// A trained model mapping a window of scaled closes to the next scaled
/// value.
///
/// Implementations are immutable after training and may be shared freely
/// across concurrent prediction requests.
pub trait TrainedSequenceModel: Debug {
    /// Predict the next scaled value for each input window
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Predict the next scaled value for a single window
    fn predict_one(&self, window: &[f64]) -> Result<f64>;

    /// The window size the model was trained with
    fn window_size(&self) -> usize;

    /// Name of the model
    fn name(&self) -> &str;
}

/// A model that can be fitted to windowed sequence pairs
pub trait SequenceModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedSequenceModel;

    /// Fit the model, returning the trained form and the training record
    fn train(&self, pair: &SequencePair, opts: &TrainOptions)
        -> Result<(Self::Trained, TrainingHistory)>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Mean squared error between predictions and targets over index `range`
pub(crate) fn mse_over(
    predictions: &[f64],
    targets: &[f64],
    range: std::ops::Range<usize>,
) -> f64 {
    let n = range.len().max(1) as f64;
    range
        .map(|i| (predictions[i] - targets[i]).powi(2))
        .sum::<f64>()
        / n
}

pub mod linear;
pub mod naive;
