//! Relative Strength Index (RSI).
//!
//! Average gain and average loss are simple rolling means of the
//! day-over-day gains/losses over `window` deltas.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: window (the first delta needs a previous close).
//! Edge cases: avg_loss == 0 → 100; flat window (no gains, no losses) → 50;
//! avg_gain == 0 → 0. Never NaN or infinite once defined.

use super::sma::rolling_mean;
use crate::error::{ForecastError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rsi {
    window: usize,
}

impl Rsi {
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "RSI window must be >= 1".into(),
            ));
        }
        Ok(Self { window })
    }

    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];

        for i in 1..n {
            let delta = closes[i] - closes[i - 1];
            if delta.is_nan() {
                continue;
            }
            gains[i] = delta.max(0.0);
            losses[i] = (-delta).max(0.0);
        }

        let avg_gain = rolling_mean(&gains, self.window);
        let avg_loss = rolling_mean(&losses, self.window);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else {
                    rsi_value(g, l)
                }
            })
            .collect()
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// RSI over `closes` with the given window.
pub fn rsi(closes: &[f64], window: usize) -> Result<Vec<f64>> {
    Ok(Rsi::new(window)?.compute(closes))
}
