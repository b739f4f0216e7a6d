//! Min-max scaling fitted on the training partition only

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An affine map `scaled = (x - min) / (max - min)` with bounds captured
/// from the training partition.
///
/// The bounds are frozen at fit time: applying the scaler to the test
/// partition or to live serving input never updates them. Values outside
/// the fit range scale outside `[0, 1]` and are tolerated, since real
/// prices drift beyond historical extremes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fit a scaler to the training partition.
    ///
    /// Only the minimum and maximum are retained; the scaler holds no
    /// reference to the data itself.
    pub fn fit(train: &[f64]) -> Result<Self> {
        if train.is_empty() {
            return Err(ForecastError::EmptyData(
                "Cannot fit a scaler on an empty series".to_string(),
            ));
        }

        let min = train.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = train.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            return Err(ForecastError::DegenerateScale(min));
        }

        Ok(Self { min, max })
    }

    /// Scale a single value
    pub fn transform_value(&self, x: f64) -> f64 {
        (x - self.min) / (self.max - self.min)
    }

    /// Scale a series elementwise
    pub fn transform(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&x| self.transform_value(x)).collect()
    }

    /// Map a scaled value back into price units.
    ///
    /// Exact algebraic inverse of `transform_value`.
    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * (self.max - self.min) + self.min
    }

    /// Minimum of the fit domain
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum of the fit domain
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Persist the fitted scaler as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load a fitted scaler from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let scaler: Self = serde_json::from_str(&contents)?;

        if !scaler.min.is_finite() || !scaler.max.is_finite() || scaler.max == scaler.min {
            return Err(ForecastError::DataError(
                "Loaded scaler artifact has invalid bounds".to_string(),
            ));
        }

        Ok(scaler)
    }
}
