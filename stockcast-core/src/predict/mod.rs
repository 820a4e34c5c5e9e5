//! Prediction client boundary.
//!
//! A `Predictor` sends a normalized window to the remote sequence model and
//! gets back predictions in [0, 1] space. The provided methods map them back
//! to price space with the window's own target range, so a prediction can
//! only ever be denormalized with the parameters of the window it came from.

pub mod http;

pub use http::{HttpPredictor, PredictorConfig, MAX_RETRIES};

use crate::error::{ForecastError, Result, UnavailableReason};
use crate::normalize::NormalizedWindow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three horizons the remote model serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionKind {
    NextDay,
    ThirdDayOpen,
    ThreeConsecutiveDays,
}

impl PredictionKind {
    pub const ALL: [PredictionKind; 3] = [
        PredictionKind::NextDay,
        PredictionKind::ThirdDayOpen,
        PredictionKind::ThreeConsecutiveDays,
    ];

    /// Endpoint path relative to the predictor base URL.
    pub fn path(&self) -> &'static str {
        match self {
            PredictionKind::NextDay => "predict-next-day",
            PredictionKind::ThirdDayOpen => "predict-3rd-day",
            PredictionKind::ThreeConsecutiveDays => "predict-3-consecutive-days",
        }
    }

    /// Number of price values this kind yields.
    pub fn expected_len(&self) -> usize {
        match self {
            PredictionKind::NextDay | PredictionKind::ThirdDayOpen => 1,
            PredictionKind::ThreeConsecutiveDays => 3,
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionKind::NextDay => f.write_str("next-day"),
            PredictionKind::ThirdDayOpen => f.write_str("3rd-day open"),
            PredictionKind::ThreeConsecutiveDays => f.write_str("3-consecutive-days"),
        }
    }
}

/// Remote inference for a normalized window.
pub trait Predictor: Send + Sync {
    /// Raw predictions in normalized space, flattened in response order.
    fn fetch_normalized(&self, kind: PredictionKind, window: &NormalizedWindow)
        -> Result<Vec<f64>>;

    /// Predictions in price space: the last `kind.expected_len()` values of
    /// the response, denormalized with the window's target range.
    fn predict(&self, kind: PredictionKind, window: &NormalizedWindow) -> Result<Vec<f64>> {
        let raw = self.fetch_normalized(kind, window)?;
        let n = kind.expected_len();
        if raw.len() < n {
            return Err(ForecastError::PredictionUnavailable {
                kind,
                reason: UnavailableReason::Malformed(format!(
                    "expected at least {n} predictions, got {}",
                    raw.len()
                )),
            });
        }
        let tail = &raw[raw.len() - n..];
        if tail.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::PredictionUnavailable {
                kind,
                reason: UnavailableReason::Malformed("non-finite prediction".into()),
            });
        }
        Ok(window.denormalize_all(tail))
    }

    fn predict_next_day(&self, window: &NormalizedWindow) -> Result<f64> {
        Ok(self.predict(PredictionKind::NextDay, window)?[0])
    }

    fn predict_third_day_open(&self, window: &NormalizedWindow) -> Result<f64> {
        Ok(self.predict(PredictionKind::ThirdDayOpen, window)?[0])
    }

    fn predict_three_consecutive_days(&self, window: &NormalizedWindow) -> Result<[f64; 3]> {
        let v = self.predict(PredictionKind::ThreeConsecutiveDays, window)?;
        Ok([v[0], v[1], v[2]])
    }
}
