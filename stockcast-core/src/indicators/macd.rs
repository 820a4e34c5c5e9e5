//! Moving Average Convergence Divergence (MACD).
//!
//! MACD = EMA(close, short) - EMA(close, long)
//! Signal = EMA(MACD, signal)
//! Both use the recursive EMA seeded at the first sample, so there is no
//! undefined region. Early values are low-confidence.

use super::ema::ema;
use crate::error::{ForecastError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    short: usize,
    long: usize,
    signal: usize,
}

/// MACD line and its signal line, each the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl Macd {
    pub fn new(short: usize, long: usize, signal: usize) -> Result<Self> {
        if short == 0 || long == 0 || signal == 0 {
            return Err(ForecastError::InvalidParameter(
                "MACD spans must be >= 1".into(),
            ));
        }
        if short >= long {
            return Err(ForecastError::InvalidParameter(format!(
                "MACD short span ({short}) must be less than long span ({long})"
            )));
        }
        Ok(Self {
            short,
            long,
            signal,
        })
    }

    pub fn compute(&self, closes: &[f64]) -> MacdLines {
        let fast = ema(closes, self.short);
        let slow = ema(closes, self.long);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema(&macd, self.signal);
        MacdLines { macd, signal }
    }
}

/// MACD and signal lines over `closes`.
pub fn macd(closes: &[f64], short: usize, long: usize, signal: usize) -> Result<MacdLines> {
    Ok(Macd::new(short, long, signal)?.compute(closes))
}
