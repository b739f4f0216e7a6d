//! End-to-end training workflow: fetch, prepare, train, evaluate, persist

use crate::config::ForecastConfig;
use crate::data::PriceDataSource;
use crate::error::Result;
use crate::metrics::{evaluate_forecast, ForecastMetrics};
use crate::models::{SequenceModel, TrainOptions, TrainedSequenceModel, TrainingHistory};
use crate::preprocessing::prepare_training_data;
use serde::Serialize;

/// Summary of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Test-set accuracy, in price units
    pub metrics: ForecastMetrics,
    /// Epoch-by-epoch training record
    pub history: TrainingHistory,
    /// Number of training window/target pairs
    pub train_pairs: usize,
    /// Number of test window/target pairs
    pub test_pairs: usize,
}

/// Run the full training workflow and persist both artifacts.
///
/// Fetches the configured date range from `source`, splits and scales it
/// (scaler fitted on the training prefix only), trains `model` on the
/// windowed training pairs, evaluates on the test pairs in price units,
/// and writes the trained model and fitted scaler to the configured paths.
///
/// Errors from any step propagate unmodified; none of them are transient.
pub fn run_training<S, M>(
    source: &S,
    model: &M,
    config: &ForecastConfig,
    opts: &TrainOptions,
) -> Result<(M::Trained, TrainingReport)>
where
    S: PriceDataSource,
    M: SequenceModel,
    M::Trained: Serialize,
{
    config.validate()?;

    let series = source.fetch(&config.symbol, config.start_date, config.end_date)?;
    let closes = series.closes()?;

    let prepared = prepare_training_data(&closes, config.window_size, config.test_ratio)?;

    let (trained, history) = model.train(&prepared.train, opts)?;

    // Evaluate on the held-out windows, mapped back into price units
    let predicted_scaled = trained.predict(&prepared.test.inputs)?;
    let predicted: Vec<f64> = predicted_scaled
        .iter()
        .map(|&p| prepared.scaler.inverse_transform(p))
        .collect();
    let actual: Vec<f64> = prepared
        .test
        .targets
        .iter()
        .map(|&t| prepared.scaler.inverse_transform(t))
        .collect();

    let metrics = evaluate_forecast(&predicted, &actual)?;

    if let Some(parent) = config.model_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = config.scaler_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&config.model_path, serde_json::to_string_pretty(&trained)?)?;
    prepared.scaler.save(&config.scaler_path)?;

    let report = TrainingReport {
        metrics,
        history,
        train_pairs: prepared.train.len(),
        test_pairs: prepared.test.len(),
    };

    Ok((trained, report))
}
