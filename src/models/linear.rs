//! Windowed linear autoregressor trained by gradient descent

use crate::error::{ForecastError, Result};
use crate::models::{
    mse_over, SequenceModel, TrainOptions, TrainedSequenceModel, TrainingHistory,
};
use crate::preprocessing::SequencePair;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Linear model predicting the next scaled close as a weighted sum of the
/// last `window_size` scaled closes.
///
/// Trained by full-batch gradient descent on squared error with a trailing
/// validation split, early stopping on a validation-loss plateau,
/// learning-rate decay on a shorter plateau, and retention of the
/// best-validation-loss weights.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    name: String,
    window_size: usize,
    seed: Option<u64>,
}

/// Trained windowed linear autoregressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedLinearRegressor {
    name: String,
    window_size: usize,
    weights: Vec<f64>,
    bias: f64,
    history: TrainingHistory,
}

impl LinearRegressor {
    /// Create a new untrained model for the given window size
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 1 {
            return Err(ForecastError::InvalidParameter(
                "window_size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Linear Autoregressor (window={})", window_size),
            window_size,
            seed: None,
        })
    }

    /// Create a model with a fixed initialization seed, for reproducibility
    pub fn with_seed(window_size: usize, seed: u64) -> Result<Self> {
        let mut model = Self::new(window_size)?;
        model.seed = Some(seed);
        Ok(model)
    }

    fn initial_weights(&self) -> Vec<f64> {
        let limit = (1.0 / self.window_size as f64).sqrt();
        let dist = Uniform::new(-limit, limit);

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        (0..self.window_size).map(|_| dist.sample(&mut rng)).collect()
    }
}

fn forward(weights: &[f64], bias: f64, window: &[f64]) -> f64 {
    weights
        .iter()
        .zip(window.iter())
        .map(|(w, x)| w * x)
        .sum::<f64>()
        + bias
}

impl SequenceModel for LinearRegressor {
    type Trained = TrainedLinearRegressor;

    fn train(
        &self,
        pair: &SequencePair,
        opts: &TrainOptions,
    ) -> Result<(Self::Trained, TrainingHistory)> {
        opts.validate()?;

        if pair.is_empty() {
            return Err(ForecastError::EmptyData(
                "No training pairs; the series is too short for the window".to_string(),
            ));
        }

        for window in &pair.inputs {
            if window.len() != self.window_size {
                return Err(ForecastError::ShapeMismatch {
                    expected: self.window_size,
                    actual: window.len(),
                });
            }
        }

        let n = pair.len();
        let val_len = (n as f64 * opts.validation_split).floor() as usize;

        // Validation is the chronological tail, never a random subset.
        // With too few pairs for a holdout, the plateau is monitored on
        // the training loss itself.
        let fit_range = 0..n - val_len;
        let val_range = if val_len == 0 { 0..n } else { n - val_len..n };

        let mut weights = self.initial_weights();
        let mut bias = 0.0;
        let mut lr = opts.learning_rate;

        let mut history = TrainingHistory::default();
        let mut best_weights = weights.clone();
        let mut best_bias = bias;
        let mut best_val_loss = f64::INFINITY;
        let mut epochs_since_best = 0;
        let mut epochs_since_decay = 0;

        for epoch in 0..opts.max_epochs {
            // Full-batch gradient step over the fit portion
            let fit_n = fit_range.len() as f64;
            let mut grad_w = vec![0.0; self.window_size];
            let mut grad_b = 0.0;

            for i in fit_range.clone() {
                let err = forward(&weights, bias, &pair.inputs[i]) - pair.targets[i];
                for (g, x) in grad_w.iter_mut().zip(pair.inputs[i].iter()) {
                    *g += 2.0 * err * x / fit_n;
                }
                grad_b += 2.0 * err / fit_n;
            }

            for (w, g) in weights.iter_mut().zip(grad_w.iter()) {
                *w -= lr * g;
            }
            bias -= lr * grad_b;

            let predictions: Vec<f64> = pair
                .inputs
                .iter()
                .map(|window| forward(&weights, bias, window))
                .collect();

            let train_loss = mse_over(&predictions, &pair.targets, fit_range.clone());
            let val_loss = mse_over(&predictions, &pair.targets, val_range.clone());

            history.train_loss.push(train_loss);
            history.val_loss.push(val_loss);
            history.epochs_run = epoch + 1;

            if val_loss < best_val_loss {
                best_val_loss = val_loss;
                best_weights = weights.clone();
                best_bias = bias;
                history.best_epoch = epoch;
                epochs_since_best = 0;
                epochs_since_decay = 0;
            } else {
                epochs_since_best += 1;
                epochs_since_decay += 1;
            }

            if epochs_since_best >= opts.patience {
                break;
            }

            if epochs_since_decay >= opts.lr_decay_patience {
                lr = (lr * opts.lr_decay_factor).max(opts.min_learning_rate);
                epochs_since_decay = 0;
            }
        }

        // Checkpoint semantics: only the best-validation-loss weights survive
        history.best_val_loss = best_val_loss;

        let trained = TrainedLinearRegressor {
            name: self.name.clone(),
            window_size: self.window_size,
            weights: best_weights,
            bias: best_bias,
            history: history.clone(),
        };

        Ok((trained, history))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearRegressor {
    /// Training record captured when the model was fitted
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Persist the trained model as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load a trained model from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&contents)?;

        if model.window_size < 1
            || model.weights.len() != model.window_size
            || !model.bias.is_finite()
            || model.weights.iter().any(|w| !w.is_finite())
        {
            return Err(ForecastError::DataError(
                "Loaded model artifact is corrupted".to_string(),
            ));
        }

        Ok(model)
    }
}

impl TrainedSequenceModel for TrainedLinearRegressor {
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

        Ok(forward(&self.weights, self.bias, window))
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn name(&self) -> &str {
        &self.name
    }
}
