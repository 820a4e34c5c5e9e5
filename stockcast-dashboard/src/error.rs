//! Errors from the dashboard layer.

use stockcast_core::data::DataError;
use stockcast_core::ForecastError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("'{ticker}': need at least {required} bars, have {available}")]
    NotEnoughBars {
        ticker: String,
        required: usize,
        available: usize,
    },

    #[error("'{ticker}': {source}")]
    Forecast {
        ticker: String,
        #[source]
        source: ForecastError,
    },

    #[error("'{ticker}': {source}")]
    Data {
        ticker: String,
        #[source]
        source: DataError,
    },

    #[error("invalid portfolio: {0}")]
    InvalidPortfolio(String),
}

impl DashboardError {
    pub fn forecast(ticker: &str, source: ForecastError) -> Self {
        Self::Forecast {
            ticker: ticker.to_string(),
            source,
        }
    }

    /// Ticker the error belongs to, if any.
    pub fn ticker(&self) -> Option<&str> {
        match self {
            Self::NotEnoughBars { ticker, .. }
            | Self::Forecast { ticker, .. }
            | Self::Data { ticker, .. } => Some(ticker),
            Self::InvalidPortfolio(_) => None,
        }
    }
}
