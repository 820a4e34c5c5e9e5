//! Watchlist rows: latest session, day-over-day change and model forecast.

use crate::error::DashboardError;
use crate::market::{DailyChange, PriceForecast};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use stockcast_core::data::{DataError, Exchange, HistoryProvider, HistoryStore, TickerInfo};
use stockcast_core::domain::{Bar, PriceSeries};
use stockcast_core::ForecastError;

/// A ticker's overview entry together with its loaded history.
#[derive(Debug, Clone)]
pub struct TickerHistory {
    pub info: TickerInfo,
    pub series: PriceSeries,
}

impl TickerHistory {
    pub fn new(info: TickerInfo, series: PriceSeries) -> Self {
        Self { info, series }
    }

    pub fn ticker(&self) -> &str {
        &self.info.ticker
    }

    /// Resolve `ticker` in the store's overview and read its history file.
    pub fn load(store: &HistoryStore, ticker: &str) -> Result<Self, DashboardError> {
        let data_err = |source: DataError| DashboardError::Data {
            ticker: ticker.trim().to_string(),
            source,
        };
        let info = store.info(ticker).map_err(data_err)?.clone();
        let series = store.history(&info.ticker).map_err(data_err)?;
        Ok(Self { info, series })
    }

    /// Load several tickers in parallel; results keep the input order.
    pub fn load_all(store: &HistoryStore, tickers: &[String]) -> Vec<Result<Self, DashboardError>> {
        tickers
            .par_iter()
            .map(|ticker| Self::load(store, ticker))
            .collect()
    }
}

/// Whether the remote forecast made it into a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForecastStatus {
    Available(PriceForecast),
    /// The prediction service failed; the rest of the row is still valid.
    Unavailable(String),
    /// No model input could be built (short history, flat window).
    Failed(String),
}

impl ForecastStatus {
    pub fn forecast(&self) -> Option<&PriceForecast> {
        match self {
            ForecastStatus::Available(f) => Some(f),
            ForecastStatus::Unavailable(_) | ForecastStatus::Failed(_) => None,
        }
    }

    /// `PredictionUnavailable` maps to `Unavailable`, every other error to
    /// `Failed`.
    pub fn from_result(result: Result<PriceForecast, ForecastError>) -> Self {
        match result {
            Ok(forecast) => ForecastStatus::Available(forecast),
            Err(e) if e.is_prediction_unavailable() => ForecastStatus::Unavailable(e.to_string()),
            Err(e) => ForecastStatus::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistRow {
    pub ticker: String,
    pub name: String,
    pub exchange: Exchange,
    pub change: DailyChange,
    /// Latest session.
    pub latest: Bar,
    pub forecast: ForecastStatus,
}

impl WatchlistRow {
    pub fn build(
        history: &TickerHistory,
        forecast: ForecastStatus,
    ) -> Result<Self, DashboardError> {
        let change = DailyChange::from_series(&history.series)?;
        let latest = history
            .series
            .last()
            .cloned()
            .ok_or_else(|| DashboardError::NotEnoughBars {
                ticker: history.ticker().to_string(),
                required: 2,
                available: 0,
            })?;
        Ok(Self {
            ticker: history.info.ticker.clone(),
            name: history.info.short_name.clone(),
            exchange: history.info.exchange,
            change,
            latest,
            forecast,
        })
    }
}
