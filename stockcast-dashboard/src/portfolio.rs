//! Portfolio summary over an equally weighted set of holdings.
//!
//! The invested amount is split evenly across tickers. Today's change is
//! the plain sum of each ticker's close-to-close change, and profit/loss is
//! taken to be that same figure; no share counts are tracked.

use crate::error::DashboardError;
use crate::market::{DailyChange, Trend};
use crate::watchlist::TickerHistory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub invested: f64,
    pub change: DailyChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_invested: f64,
    pub holdings: Vec<Holding>,
    pub total_change: f64,
    pub profit_loss: f64,
    pub market_value: f64,
}

impl PortfolioSummary {
    pub fn build(total_invested: f64, histories: &[TickerHistory]) -> Result<Self, DashboardError> {
        if histories.is_empty() {
            return Err(DashboardError::InvalidPortfolio(
                "portfolio has no tickers".into(),
            ));
        }
        if !total_invested.is_finite() || total_invested <= 0.0 {
            return Err(DashboardError::InvalidPortfolio(format!(
                "invested amount must be positive, got {total_invested}"
            )));
        }

        let per_ticker = total_invested / histories.len() as f64;
        let holdings = histories
            .iter()
            .map(|h| {
                Ok(Holding {
                    ticker: h.ticker().to_string(),
                    invested: per_ticker,
                    change: DailyChange::from_series(&h.series)?,
                })
            })
            .collect::<Result<Vec<_>, DashboardError>>()?;

        let total_change: f64 = holdings.iter().map(|h| h.change.change).sum();
        let profit_loss = total_change;

        tracing::info!(
            tickers = holdings.len(),
            total_invested,
            total_change,
            "built portfolio summary"
        );

        Ok(Self {
            total_invested,
            holdings,
            total_change,
            profit_loss,
            market_value: total_invested + profit_loss,
        })
    }

    pub fn trend(&self) -> Trend {
        Trend::from_diff(self.total_change)
    }
}
