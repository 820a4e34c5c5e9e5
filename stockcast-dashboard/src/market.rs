//! Day-over-day changes and forecast comparisons.
//!
//! Every forecast figure is compared against the latest session's open.
//! The 3-day forecast is additionally read as a path: day 0 against that
//! open, then each day against the one before it.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use stockcast_core::domain::PriceSeries;

/// Direction of a signed difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            Trend::Up
        } else if diff < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => f.write_str("up"),
            Trend::Down => f.write_str("down"),
            Trend::Flat => f.write_str("flat"),
        }
    }
}

/// Day 0 against `reference_open`, day i against day i-1.
pub fn three_day_trend(reference_open: f64, prices: &[f64; 3]) -> [Trend; 3] {
    [
        Trend::from_diff(prices[0] - reference_open),
        Trend::from_diff(prices[1] - prices[0]),
        Trend::from_diff(prices[2] - prices[1]),
    ]
}

/// Change between the last two closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyChange {
    pub last_close: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl DailyChange {
    pub fn from_series(series: &PriceSeries) -> Result<Self, DashboardError> {
        let bars = series.tail(2);
        if bars.len() < 2 {
            return Err(DashboardError::NotEnoughBars {
                ticker: series.symbol().to_string(),
                required: 2,
                available: bars.len(),
            });
        }
        let (previous_close, last_close) = (bars[0].close, bars[1].close);
        let change = last_close - previous_close;
        let change_percent = if previous_close == 0.0 {
            0.0
        } else {
            change / previous_close * 100.0
        };
        Ok(Self {
            last_close,
            previous_close,
            change,
            change_percent,
        })
    }

    pub fn trend(&self) -> Trend {
        Trend::from_diff(self.change)
    }
}

/// All three model horizons for one ticker, in price space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceForecast {
    /// Open of the latest session.
    pub reference_open: f64,
    pub next_day: f64,
    pub third_day_open: f64,
    pub three_days: [f64; 3],
}

impl PriceForecast {
    pub fn next_day_diff(&self) -> f64 {
        self.next_day - self.reference_open
    }

    pub fn third_day_diff(&self) -> f64 {
        self.third_day_open - self.reference_open
    }

    pub fn three_day_average(&self) -> f64 {
        self.three_days.iter().sum::<f64>() / 3.0
    }

    pub fn three_day_average_diff(&self) -> f64 {
        self.three_day_average() - self.reference_open
    }

    pub fn three_day_trend(&self) -> [Trend; 3] {
        three_day_trend(self.reference_open, &self.three_days)
    }
}
