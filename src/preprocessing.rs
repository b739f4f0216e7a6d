//! Time-respecting train/test splitting and sliding-window sequence
//! construction.
//!
//! The split here is positional, never random: shuffling a price series
//! before splitting would leak future information into training and break
//! the forecasting setup. Scaling parameters are fitted on the training
//! partition only, for the same reason.

use crate::error::{ForecastError, Result};
use crate::scaling::MinMaxScaler;

/// Supervised-learning pairs produced by a sliding window.
///
/// `inputs[i]` covers source positions `[i, i + window_size)` and
/// `targets[i]` is the source value at `i + window_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePair {
    /// Overlapping input windows, each `window_size` long
    pub inputs: Vec<Vec<f64>>,
    /// Next-value target aligned with each window
    pub targets: Vec<f64>,
}

impl SequencePair {
    /// Number of window/target pairs
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if no pairs were produced
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Everything the training step needs, produced in one pass over a series
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Windowed training pairs, in scaled units
    pub train: SequencePair,
    /// Windowed test pairs, in scaled units
    pub test: SequencePair,
    /// Scaler fitted on the training partition only
    pub scaler: MinMaxScaler,
}

/// Split a series chronologically into a training prefix and a test suffix
/// that carries `window_size` points of context from the training tail.
///
/// `train = series[0..train_size]` with `train_size = floor(N * (1 - R))`;
/// `test = series[train_size - window_size..]`, so the first test window
/// has full context without any test value ever appearing as a training
/// target. The two partitions overlap by exactly `window_size` points.
pub fn chronological_split(
    series: &[f64],
    window_size: usize,
    test_ratio: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = series.len();

    if window_size < 1 {
        return Err(ForecastError::InvalidParameter(
            "window_size must be at least 1".to_string(),
        ));
    }

    if n == 0 {
        return Err(ForecastError::EmptyData(
            "Cannot split an empty series".to_string(),
        ));
    }

    if window_size >= n {
        return Err(ForecastError::InsufficientHistory {
            required: window_size + 1,
            actual: n,
        });
    }

    if test_ratio <= 0.0 || test_ratio >= 1.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "test_ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let train_size = (n as f64 * (1.0 - test_ratio)).floor() as usize;

    if train_size < window_size {
        return Err(ForecastError::InsufficientHistory {
            required: window_size,
            actual: train_size,
        });
    }

    let train = series[..train_size].to_vec();
    let test = series[train_size - window_size..].to_vec();

    Ok((train, test))
}

/// Turn a scaled series into overlapping window/target pairs.
///
/// Produces `len - window_size` pairs in ascending time order. A series no
/// longer than the window yields an empty pair set rather than an error;
/// callers that need pairs should check for emptiness.
pub fn make_sequences(scaled: &[f64], window_size: usize) -> SequencePair {
    let m = scaled.len();

    if m <= window_size {
        return SequencePair {
            inputs: Vec::new(),
            targets: Vec::new(),
        };
    }

    let mut inputs = Vec::with_capacity(m - window_size);
    let mut targets = Vec::with_capacity(m - window_size);

    for i in window_size..m {
        inputs.push(scaled[i - window_size..i].to_vec());
        targets.push(scaled[i]);
    }

    SequencePair { inputs, targets }
}

/// Split, scale and window a raw price series in one step.
///
/// The scaler is fitted on the training prefix before the test partition
/// is touched, then applied to both.
pub fn prepare_training_data(
    series: &[f64],
    window_size: usize,
    test_ratio: f64,
) -> Result<PreparedData> {
    let (train_prices, test_prices) = chronological_split(series, window_size, test_ratio)?;

    let scaler = MinMaxScaler::fit(&train_prices)?;
    let train_scaled = scaler.transform(&train_prices);
    let test_scaled = scaler.transform(&test_prices);

    let train = make_sequences(&train_scaled, window_size);
    let test = make_sequences(&test_scaled, window_size);

    Ok(PreparedData {
        train,
        test,
        scaler,
    })
}
