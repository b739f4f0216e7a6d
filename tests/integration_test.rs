use chrono::NaiveDate;
use stock_forecast::config::ForecastConfig;
use stock_forecast::data::{InMemoryDataSource, PriceSeries};
use stock_forecast::error::ForecastError;
use stock_forecast::models::linear::LinearRegressor;
use stock_forecast::models::TrainOptions;
use stock_forecast::pipeline::run_training;
use stock_forecast::service::PredictionService;

fn synthetic_source(symbol: &str, days: usize) -> InMemoryDataSource {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let dates: Vec<NaiveDate> = (0..days)
        .map(|i| start + chrono::Days::new(i as u64))
        .collect();
    let closes: Vec<f64> = (0..days)
        .map(|i| 20.0 + 0.02 * i as f64 + (i as f64 * 0.3).sin())
        .collect();

    let mut source = InMemoryDataSource::new();
    source.insert(symbol, PriceSeries::new(dates, closes).unwrap());
    source
}

fn test_config(dir: &std::path::Path) -> ForecastConfig {
    ForecastConfig {
        symbol: "TEST".to_string(),
        start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        window_size: 5,
        test_ratio: 0.2,
        model_path: dir.join("model.json"),
        scaler_path: dir.join("scaler.json"),
    }
}

#[test]
fn test_train_then_serve_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let source = synthetic_source("TEST", 250);
    let model = LinearRegressor::with_seed(config.window_size, 42).unwrap();

    let (_trained, report) =
        run_training(&source, &model, &config, &TrainOptions::default()).unwrap();

    // N=250, train_size=200: 195 training pairs, 55 test points -> 50 pairs
    assert_eq!(report.train_pairs, 195);
    assert_eq!(report.test_pairs, 50);
    assert!(report.history.epochs_run >= 1);
    assert!(report.metrics.mae.is_finite());
    assert!(report.metrics.rmse >= report.metrics.mae);

    // Both artifacts were persisted
    assert!(config.model_path.exists());
    assert!(config.scaler_path.exists());

    // Serve from the persisted artifacts
    let service =
        PredictionService::from_artifacts(&config.model_path, &config.scaler_path, 5).unwrap();

    let recent = [24.1, 24.3, 24.0, 24.4, 24.6];
    let next = service.predict_next(&recent).unwrap();
    assert!(next.is_finite());
    assert!(next > 10.0 && next < 40.0, "implausible forecast: {}", next);

    // Short input still rejected at the serving boundary
    assert!(matches!(
        service.predict_next(&[24.0, 24.2]),
        Err(ForecastError::InsufficientHistory { .. })
    ));
}

#[test]
fn test_empty_fetch_aborts_training() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.start_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    config.end_date = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();

    let source = synthetic_source("TEST", 250);
    let model = LinearRegressor::new(5).unwrap();

    let result = run_training(&source, &model, &config, &TrainOptions::default());
    assert!(matches!(result, Err(ForecastError::EmptyData(_))));
    assert!(!config.model_path.exists());
}

#[test]
fn test_short_history_aborts_training() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // 6 days: train_size = floor(6 * 0.8) = 4 < window_size = 5
    let source = synthetic_source("TEST", 6);
    let model = LinearRegressor::new(5).unwrap();

    let result = run_training(&source, &model, &config, &TrainOptions::default());
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory { .. })
    ));
}

#[test]
fn test_invalid_config_aborts_before_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.test_ratio = 0.0;

    // An empty source would also fail, but the config check comes first
    let source = InMemoryDataSource::new();
    let model = LinearRegressor::new(5).unwrap();

    let result = run_training(&source, &model, &config, &TrainOptions::default());
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}
