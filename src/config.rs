//! Run configuration for training and serving

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of past closes used to predict the next one
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Default fraction of the series reserved for the trailing test partition
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Configuration shared by the training and serving paths.
///
/// `window_size` is fixed for the lifetime of a trained model: a model
/// trained with one window size must be served with the same one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Instrument identifier, e.g. "PETR4.SA"
    pub symbol: String,
    /// Inclusive start of the historical fetch range
    pub start_date: NaiveDate,
    /// Exclusive end of the historical fetch range
    pub end_date: NaiveDate,
    /// Number of consecutive past closes per model input window
    pub window_size: usize,
    /// Fraction in (0, 1) of the series held out for testing
    pub test_ratio: f64,
    /// Where the trained model artifact is written
    pub model_path: PathBuf,
    /// Where the fitted scaler artifact is written
    pub scaler_path: PathBuf,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            symbol: "PETR4.SA".to_string(),
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 9).unwrap(),
            window_size: DEFAULT_WINDOW_SIZE,
            test_ratio: DEFAULT_TEST_RATIO,
            model_path: PathBuf::from("artifacts/model.json"),
            scaler_path: PathBuf::from("artifacts/scaler.json"),
        }
    }
}

impl ForecastConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 1 {
            return Err(ForecastError::InvalidParameter(
                "window_size must be at least 1".to_string(),
            ));
        }

        if self.test_ratio <= 0.0 || self.test_ratio >= 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }

        if self.start_date >= self.end_date {
            return Err(ForecastError::InvalidParameter(format!(
                "start_date {} must precede end_date {}",
                self.start_date, self.end_date
            )));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
