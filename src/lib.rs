//! # Stock Forecast
//!
//! A Rust library for forecasting the next closing price of a financial
//! instrument from a sliding window of historical closes.
//!
//! ## Features
//!
//! - Chronological train/test splitting that never shuffles and never leaks
//!   test values into anything fitted on the training partition
//! - Min-max scaling fitted on the training partition only, with an exact
//!   inverse for mapping model output back into price units
//! - Sliding-window sequence construction for sequence-to-one regression
//! - Trainable models with early stopping, learning-rate decay and
//!   best-weights retention
//! - A transport-agnostic prediction service over persisted artifacts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stock_forecast::config::ForecastConfig;
//! use stock_forecast::data::CsvDataSource;
//! use stock_forecast::models::linear::LinearRegressor;
//! use stock_forecast::models::TrainOptions;
//! use stock_forecast::pipeline::run_training;
//! use stock_forecast::service::PredictionService;
//!
//! # fn main() -> stock_forecast::error::Result<()> {
//! let config = ForecastConfig::default();
//! let source = CsvDataSource::new("data");
//! let model = LinearRegressor::new(config.window_size)?;
//!
//! // Train and persist both artifacts
//! let (_trained, report) = run_training(&source, &model, &config, &TrainOptions::default())?;
//! println!("{}", report.metrics);
//!
//! // Serve from the persisted artifacts
//! let service = PredictionService::from_artifacts(
//!     &config.model_path,
//!     &config.scaler_path,
//!     config.window_size,
//! )?;
//! let next = service.predict_next(&[22.1, 22.4, 22.0, 22.7, 23.1])?;
//! println!("next close: {next:.4}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod scaling;
pub mod service;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, PriceDataSource, PriceSeries};
pub use crate::error::ForecastError;
pub use crate::models::{SequenceModel, TrainOptions, TrainedSequenceModel};
pub use crate::preprocessing::{chronological_split, make_sequences, SequencePair};
pub use crate::scaling::MinMaxScaler;
pub use crate::service::PredictionService;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
