//! History provider trait and structured error types.
//!
//! The `HistoryProvider` trait abstracts over where daily bars come from so
//! the dashboard can be driven by files, fixtures or mocks.

use crate::domain::PriceSeries;
use crate::error::ForecastError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("bad value in row {row}: {message}")]
    BadRow { row: usize, message: String },

    #[error("unknown ticker: {ticker}")]
    UnknownTicker { ticker: String },

    #[error(transparent)]
    Series(#[from] ForecastError),
}

/// Source of daily price history for a ticker.
pub trait HistoryProvider: Send + Sync {
    /// Load and sort the full daily history for `ticker`.
    fn history(&self, ticker: &str) -> Result<PriceSeries, DataError>;
}
