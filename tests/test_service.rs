use assert_approx_eq::assert_approx_eq;
use stock_forecast::error::{ForecastError, Result};
use stock_forecast::models::linear::LinearRegressor;
use stock_forecast::models::naive::NaiveLast;
use stock_forecast::models::{SequenceModel, TrainOptions, TrainedSequenceModel};
use stock_forecast::preprocessing::make_sequences;
use stock_forecast::scaling::MinMaxScaler;
use stock_forecast::service::{PredictionRequest, PredictionService};

fn naive_service(window_size: usize) -> PredictionService {
    let train: Vec<f64> = (1..=8).map(|v| v as f64).collect();
    let scaler = MinMaxScaler::fit(&train).unwrap();
    let pair = make_sequences(&scaler.transform(&train), window_size);

    let model = NaiveLast::new(window_size).unwrap();
    let (trained, _) = model.train(&pair, &TrainOptions::default()).unwrap();

    PredictionService::new(scaler, Box::new(trained), window_size).unwrap()
}

#[test]
fn test_predict_round_trips_through_the_scaler() {
    // The persistence baseline echoes the last close, so the response must
    // equal the last input price after scale and inverse-scale.
    let service = naive_service(2);

    let next = service.predict_next(&[5.0, 6.0, 7.0, 8.0]).unwrap();
    assert_approx_eq!(next, 8.0, 1e-9);
}

#[test]
fn test_predict_uses_only_the_last_window() {
    let service = naive_service(3);

    // Values before the final window must not affect the result
    let a = service.predict_next(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let b = service.predict_next(&[100.0, -7.0, 3.0, 4.0, 5.0]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_insufficient_history_is_rejected() {
    let service = naive_service(5);

    let result = service.predict_next(&[22.0, 23.0]);
    match result {
        Err(ForecastError::InsufficientHistory { required, actual }) => {
            assert_eq!(required, 5);
            assert_eq!(actual, 2);
        }
        other => panic!("Expected InsufficientHistory, got {:?}", other),
    }

    // The message states the minimum required count
    let message = service.predict_next(&[22.0]).unwrap_err().to_string();
    assert!(message.contains("5"), "message was: {}", message);
}

#[derive(Debug)]
struct PanicOnPredict;

impl TrainedSequenceModel for PanicOnPredict {
    fn predict(&self, _inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        panic!("model must not be called");
    }

    fn predict_one(&self, _window: &[f64]) -> Result<f64> {
        panic!("model must not be called");
    }

    fn window_size(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "panic on predict"
    }
}

#[test]
fn test_rejection_never_reaches_the_model() {
    let scaler = MinMaxScaler::fit(&[1.0, 2.0]).unwrap();
    let service = PredictionService::new(scaler, Box::new(PanicOnPredict), 4).unwrap();

    // Short input must error before any model call; a panic here fails
    // the test.
    assert!(service.predict_next(&[1.0, 2.0, 3.0]).is_err());
}

#[test]
fn test_window_size_mismatch_rejected_at_construction() {
    let train: Vec<f64> = (1..=8).map(|v| v as f64).collect();
    let scaler = MinMaxScaler::fit(&train).unwrap();
    let pair = make_sequences(&scaler.transform(&train), 2);
    let model = NaiveLast::new(2).unwrap();
    let (trained, _) = model.train(&pair, &TrainOptions::default()).unwrap();

    let result = PredictionService::new(scaler, Box::new(trained), 3);
    assert!(matches!(
        result,
        Err(ForecastError::ShapeMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn test_out_of_range_closes_are_served() {
    // Live prices above the training maximum must scale out of [0, 1]
    // and still produce a sane inverse-scaled answer.
    let service = naive_service(2);

    let next = service.predict_next(&[90.0, 120.0]).unwrap();
    assert_approx_eq!(next, 120.0, 1e-9);
}

#[test]
fn test_request_response_shape() {
    let service = naive_service(2);

    let request = PredictionRequest {
        closes: vec![5.0, 6.0, 7.0],
    };
    let response = service.predict(&request).unwrap();
    assert_approx_eq!(response.next_close, 7.0, 1e-9);

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("next_close"));
}

#[test]
fn test_health_is_static_ok() {
    let service = naive_service(2);
    assert_eq!(service.health().status, "ok");
}

#[test]
fn test_service_from_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let scaler_path = dir.path().join("scaler.json");

    let train: Vec<f64> = (0..40).map(|v| 10.0 + v as f64 * 0.5).collect();
    let scaler = MinMaxScaler::fit(&train).unwrap();
    let pair = make_sequences(&scaler.transform(&train), 5);

    let model = LinearRegressor::with_seed(5, 3).unwrap();
    let (trained, _) = model.train(&pair, &TrainOptions::default()).unwrap();

    trained.save(&model_path).unwrap();
    scaler.save(&scaler_path).unwrap();

    let service = PredictionService::from_artifacts(&model_path, &scaler_path, 5).unwrap();
    let next = service
        .predict_next(&[27.0, 27.5, 28.0, 28.5, 29.0])
        .unwrap();
    assert!(next.is_finite());

    // Loading with the wrong configured window size must fail
    assert!(matches!(
        PredictionService::from_artifacts(&model_path, &scaler_path, 6),
        Err(ForecastError::ShapeMismatch { .. })
    ));
}
