//! Price series data handling and data sources

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// An ordered series of daily closing prices for one instrument.
///
/// Dates ascend strictly; missing trading days are simply absent, never
/// interpolated. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    /// Data frame holding the date and close columns
    df: DataFrame,
    /// Name of the date column
    date_column: String,
    /// Name of the close column
    close_column: String,
}

/// Data loader for price series
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a price series from a CSV file with date and close columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        PriceSeries::from_dataframe(df)
    }
}

impl PriceSeries {
    /// Create a price series from parallel date and close vectors
    pub fn new(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(ForecastError::DataError(format!(
                "Dates ({}) and closes ({}) have different lengths",
                dates.len(),
                closes.len()
            )));
        }

        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ForecastError::DataError(
                "Dates must be strictly ascending".to_string(),
            ));
        }

        let date_series = Series::new(
            "date",
            dates
                .iter()
                .map(|d| d.and_hms_opt(0, 0, 0).map(|dt| dt.timestamp_millis()))
                .collect::<Option<Vec<i64>>>()
                .ok_or_else(|| ForecastError::DataError("Date out of range".to_string()))?,
        );
        let close_series = Series::new("close", closes);

        let df = DataFrame::new(vec![date_series, close_series])?;

        Ok(Self {
            df,
            date_column: "date".to_string(),
            close_column: "close".to_string(),
        })
    }

    /// Create a price series from an existing DataFrame, detecting columns
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let date_column = Self::detect_date_column(&df)?;
        let close_column = Self::detect_close_column(&df)?;

        Ok(Self {
            df,
            date_column,
            close_column,
        })
    }

    /// Detect the date column in a DataFrame
    fn detect_date_column(df: &DataFrame) -> Result<String> {
        for name in df.get_column_names() {
            let lower_name = name.to_lowercase();
            if lower_name.contains("date") || lower_name.contains("time") {
                return Ok(name.to_string());
            }
        }

        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() {
                return Ok(first_col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "No date column found in data".to_string(),
        ))
    }

    /// Detect the close column in a DataFrame
    fn detect_close_column(df: &DataFrame) -> Result<String> {
        for name in df.get_column_names() {
            let lower_name = name.to_lowercase();
            if lower_name.contains("close") || lower_name.contains("price") {
                return Ok(name.to_string());
            }
        }

        Err(ForecastError::DataError(
            "No close column found in data".to_string(),
        ))
    }

    /// Get the closing prices as a vector
    pub fn closes(&self) -> Result<Vec<f64>> {
        let col = self.df.column(&self.close_column)?;

        match col.dtype() {
            DataType::Float64 => Ok(col.f64()?.into_iter().flatten().collect()),
            DataType::Float32 => Ok(col.f32()?.into_iter().flatten().map(|v| v as f64).collect()),
            DataType::Int64 => Ok(col.i64()?.into_iter().flatten().map(|v| v as f64).collect()),
            DataType::Int32 => Ok(col.i32()?.into_iter().flatten().map(|v| v as f64).collect()),
            _ => Err(ForecastError::DataError(format!(
                "Column '{}' cannot be converted to f64",
                self.close_column
            ))),
        }
    }

    /// Get the dates as a vector
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        let col = self.df.column(&self.date_column)?;

        match col.dtype() {
            DataType::Int64 => Ok(col
                .i64()?
                .into_iter()
                .flatten()
                .filter_map(|ms| chrono::DateTime::from_timestamp_millis(ms))
                .map(|dt| dt.date_naive())
                .collect()),
            DataType::Date => Ok(col
                .date()?
                .into_iter()
                .flatten()
                .filter_map(|days| {
                    NaiveDate::from_ymd_opt(1970, 1, 1)
                        .and_then(|epoch| epoch.checked_add_days(chrono::Days::new(days as u64)))
                })
                .collect()),
            // CSV readers commonly leave ISO dates as strings
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .flatten()
                .map(|s| {
                    s.parse::<NaiveDate>().map_err(|_| {
                        ForecastError::DataError(format!("Unparseable date: {}", s))
                    })
                })
                .collect(),
            _ => Err(ForecastError::DataError(format!(
                "Column '{}' cannot be converted to dates",
                self.date_column
            ))),
        }
    }

    /// Number of observations in the series
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get a slice of the series from start to end index
    pub fn slice(&self, start: usize, end: Option<usize>) -> Self {
        let end = end.unwrap_or(self.df.height());
        let sliced_df = self.df.slice(start as i64, end.saturating_sub(start));

        Self {
            df: sliced_df,
            date_column: self.date_column.clone(),
            close_column: self.close_column.clone(),
        }
    }

    /// Restrict the series to dates in `[start, end)`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let dates = self.dates()?;
        let closes = self.closes()?;

        let (kept_dates, kept_closes): (Vec<NaiveDate>, Vec<f64>) = dates
            .into_iter()
            .zip(closes)
            .filter(|(d, _)| *d >= start && *d < end)
            .unzip();

        PriceSeries::new(kept_dates, kept_closes)
    }
}

/// A provider of historical closing prices.
///
/// Abstracts over the market-data vendor so that nothing downstream depends
/// on any particular response shape.
pub trait PriceDataSource {
    /// Fetch daily closes for `symbol` over `[start, end)`
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// Data source backed by a directory of per-symbol CSV files
#[derive(Debug)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    /// Create a data source reading `<dir>/<symbol>.csv` files
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl PriceDataSource for CsvDataSource {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let path = self.dir.join(format!("{}.csv", symbol));
        let series = DataLoader::from_csv(path)?.between(start, end)?;

        if series.is_empty() {
            return Err(ForecastError::EmptyData(format!(
                "No rows for {} between {} and {}",
                symbol, start, end
            )));
        }

        Ok(series)
    }
}

/// In-memory data source, used in tests in place of a real vendor
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    series: HashMap<String, PriceSeries>,
}

impl InMemoryDataSource {
    /// Create an empty in-memory data source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a price series under a symbol
    pub fn insert(&mut self, symbol: &str, series: PriceSeries) {
        self.series.insert(symbol.to_string(), series);
    }
}

impl PriceDataSource for InMemoryDataSource {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| ForecastError::EmptyData(format!("Unknown symbol: {}", symbol)))?
            .between(start, end)?;

        if series.is_empty() {
            return Err(ForecastError::EmptyData(format!(
                "No rows for {} between {} and {}",
                symbol, start, end
            )));
        }

        Ok(series)
    }
}
