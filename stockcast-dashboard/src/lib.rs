//! Stockcast Dashboard: watchlist, portfolio and buy/sell views.
//!
//! This crate builds on `stockcast-core` to provide:
//! - Day-over-day changes and forecast comparisons against the latest open
//! - Watchlist rows that degrade gracefully when the model service is down
//! - Equal-weight portfolio summary
//! - Parallel per-ticker pipelines with injected predictor and classifiers

pub mod dashboard;
pub mod error;
pub mod market;
pub mod portfolio;
pub mod watchlist;

pub use dashboard::{Dashboard, SignalRow};
pub use error::DashboardError;
pub use market::{three_day_trend, DailyChange, PriceForecast, Trend};
pub use portfolio::{Holding, PortfolioSummary};
pub use watchlist::{ForecastStatus, TickerHistory, WatchlistRow};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn rows_are_send_sync() {
        assert_send::<WatchlistRow>();
        assert_sync::<WatchlistRow>();
        assert_send::<SignalRow>();
        assert_sync::<SignalRow>();
    }

    #[test]
    fn ticker_history_is_send_sync() {
        assert_send::<TickerHistory>();
        assert_sync::<TickerHistory>();
    }

    #[test]
    fn portfolio_summary_is_send_sync() {
        assert_send::<PortfolioSummary>();
        assert_sync::<PortfolioSummary>();
    }

    #[test]
    fn dashboard_error_is_send_sync() {
        assert_send::<DashboardError>();
        assert_sync::<DashboardError>();
    }

    #[test]
    fn http_dashboard_is_send_sync() {
        use stockcast_core::features::LinearClassifier;
        use stockcast_core::predict::HttpPredictor;
        assert_send::<Dashboard<HttpPredictor, LinearClassifier>>();
        assert_sync::<Dashboard<HttpPredictor, LinearClassifier>>();
    }
}
