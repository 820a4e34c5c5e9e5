//! Per-ticker pipelines behind the watchlist and buy/sell views.
//!
//! The prediction service and both classifiers are injected, so the same
//! `Dashboard` runs against the live HTTP model or test doubles. Tickers are
//! processed in parallel with rayon and every ticker gets its own result:
//! one bad history file never hides the others.

use crate::error::DashboardError;
use crate::market::PriceForecast;
use crate::watchlist::{ForecastStatus, TickerHistory, WatchlistRow};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use stockcast_core::domain::PriceSeries;
use stockcast_core::features::{
    probability_pct, BuySellFeaturizer, Classifier, DecisionThreshold, FeatureVector,
    SignalDecision,
};
use stockcast_core::indicators::IndicatorFrame;
use stockcast_core::normalize::{NormalizedWindow, WindowNormalizer};
use stockcast_core::predict::Predictor;
use stockcast_core::{DashboardConfig, ForecastError};

/// Buy/sell view for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub ticker: String,
    pub name: String,
    pub features: FeatureVector,
    pub decision: SignalDecision,
}

pub struct Dashboard<P: Predictor, C: Classifier> {
    predictor: P,
    buy_model: C,
    sell_model: C,
    featurizer: BuySellFeaturizer,
    normalizer: WindowNormalizer,
    threshold: DecisionThreshold,
}

impl<P: Predictor, C: Classifier> Dashboard<P, C> {
    pub fn new(predictor: P, buy_model: C, sell_model: C, config: &DashboardConfig) -> Self {
        Self {
            predictor,
            buy_model,
            sell_model,
            featurizer: BuySellFeaturizer::new(config.indicators.clone()),
            normalizer: WindowNormalizer::new(config.window.clone()),
            threshold: config.decision.threshold,
        }
    }

    /// Normalized model input for `series`.
    ///
    /// Indicator columns in the window spec are served from an indicator
    /// frame; plain OHLCV windows read the series directly.
    pub fn window(&self, series: &PriceSeries) -> Result<NormalizedWindow, ForecastError> {
        let needs_indicators = self
            .normalizer
            .spec()
            .features
            .iter()
            .any(|f| f.is_indicator());
        if needs_indicators {
            let frame = IndicatorFrame::compute(series, self.featurizer.params())?;
            self.normalizer.normalize(&frame)
        } else {
            self.normalizer.normalize(series)
        }
    }

    /// All three horizons, compared against the latest open.
    pub fn forecast(&self, series: &PriceSeries) -> Result<PriceForecast, ForecastError> {
        let window = self.window(series)?;
        let reference_open = series
            .last()
            .map(|b| b.open)
            .ok_or(ForecastError::InsufficientHistory {
                required: 1,
                available: 0,
            })?;

        Ok(PriceForecast {
            reference_open,
            next_day: self.predictor.predict_next_day(&window)?,
            third_day_open: self.predictor.predict_third_day_open(&window)?,
            three_days: self.predictor.predict_three_consecutive_days(&window)?,
        })
    }

    pub fn watchlist_row(&self, history: &TickerHistory) -> Result<WatchlistRow, DashboardError> {
        let ticker = history.ticker();
        let status = ForecastStatus::from_result(self.forecast(&history.series));
        match &status {
            ForecastStatus::Unavailable(reason) => {
                tracing::warn!(ticker, %reason, "forecast unavailable, showing history only");
            }
            ForecastStatus::Failed(reason) => {
                tracing::warn!(ticker, %reason, "no forecast input, showing history only");
            }
            ForecastStatus::Available(_) => {}
        }
        let row = WatchlistRow::build(history, status)?;
        tracing::info!(
            ticker,
            last_close = row.change.last_close,
            change_pct = row.change.change_percent,
            forecast = row.forecast.forecast().is_some(),
            "watchlist row"
        );
        Ok(row)
    }

    pub fn signal(&self, history: &TickerHistory) -> Result<SignalRow, DashboardError> {
        let ticker = history.ticker();
        let features = self
            .featurizer
            .featurize(&history.series)
            .map_err(|e| DashboardError::forecast(ticker, e))?;

        let buy = probability_pct(&self.buy_model, &features);
        let sell = probability_pct(&self.sell_model, &features);
        let decision = SignalDecision::decide(buy, sell, self.threshold);

        tracing::info!(
            ticker,
            buy_pct = buy,
            sell_pct = sell,
            recommendation = %decision.recommendation,
            "buy/sell signal"
        );
        Ok(SignalRow {
            ticker: ticker.to_string(),
            name: history.info.short_name.clone(),
            features,
            decision,
        })
    }

    /// One watchlist row per ticker, in input order.
    pub fn watchlist(&self, histories: &[TickerHistory]) -> Vec<Result<WatchlistRow, DashboardError>> {
        histories
            .par_iter()
            .map(|h| self.watchlist_row(h))
            .collect()
    }

    /// One buy/sell row per ticker, in input order.
    pub fn signals(&self, histories: &[TickerHistory]) -> Vec<Result<SignalRow, DashboardError>> {
        histories.par_iter().map(|h| self.signal(h)).collect()
    }
}
