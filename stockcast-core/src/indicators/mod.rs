//! Indicator engine: RSI, MACD and Bollinger Bands over a close-price column.
//!
//! Every indicator is a pure function of its input slice and returns a
//! series of the same length, with `f64::NAN` marking rows that do not yet
//! have enough history.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, Bollinger, BollingerBands};
pub use ema::ema;
pub use frame::IndicatorFrame;
pub use macd::{macd, Macd, MacdLines};
pub use rsi::{rsi, Rsi};
pub use sma::rolling_mean;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Windows and spans for the three indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_window: usize,
    pub macd_short: usize,
    pub macd_long: usize,
    pub macd_signal: usize,
    pub bb_window: usize,
    pub bb_k: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            macd_short: 12,
            macd_long: 26,
            macd_signal: 9,
            bb_window: 20,
            bb_k: 2.0,
        }
    }
}

impl IndicatorParams {
    /// Check every parameter by building the indicators.
    pub fn validate(&self) -> Result<()> {
        Rsi::new(self.rsi_window)?;
        Macd::new(self.macd_short, self.macd_long, self.macd_signal)?;
        Bollinger::new(self.bb_window, self.bb_k)?;
        Ok(())
    }

    /// Leading rows of an `IndicatorFrame` with at least one undefined column.
    ///
    /// MACD contributes nothing; RSI needs `rsi_window` deltas and Bollinger
    /// `bb_window` closes. With defaults this is 19.
    pub fn warmup(&self) -> usize {
        self.rsi_window.max(self.bb_window.saturating_sub(1))
    }

    /// Shortest series that leaves at least one complete row.
    pub fn min_history(&self) -> usize {
        self.warmup() + 1
    }
}

/// Build a daily series from close prices for testing.
///
/// open = prev close (or close for the first bar), high/low = max/min(open, close) ± 1.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::PriceSeries {
    use crate::domain::{Bar, PriceSeries};
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.0),
                close,
                volume: 1000,
            }
        })
        .collect();
    PriceSeries::new("TEST", bars).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
