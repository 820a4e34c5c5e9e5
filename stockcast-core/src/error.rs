//! Structured error types for the forecasting pipeline.
//!
//! Local computations (indicators, featurization, normalization) fail with a
//! precondition error and never retry. Only `PredictionUnavailable` is
//! expected during normal operation; callers degrade on it instead of
//! aborting.

use crate::domain::Feature;
use crate::predict::PredictionKind;
use thiserror::Error;

/// Why a remote prediction could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Connection refused, DNS failure, reset, etc.
    Network(String),
    /// The request exceeded the configured timeout.
    Timeout,
    /// The endpoint answered with a non-200 status.
    Status { code: u16, body: String },
    /// The response body was not the expected `{"predictions": [...]}` shape.
    Malformed(String),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status { code, body } => write!(f, "HTTP {code}: {body}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("insufficient history: need {required} rows, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("degenerate window: column '{feature}' has zero range (min == max)")]
    DegenerateWindow { feature: Feature },

    #[error("invalid feature order: target '{expected}' must be at index 0, found {found}")]
    InvalidFeatureOrder { expected: Feature, found: String },

    #[error("feature '{feature}' is not available from this source")]
    MissingFeature { feature: Feature },

    #[error("invalid price series: {0}")]
    InvalidSeries(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{kind} prediction unavailable: {reason}")]
    PredictionUnavailable {
        kind: PredictionKind,
        reason: UnavailableReason,
    },
}

impl ForecastError {
    /// True for the one failure kind the dashboard is expected to absorb.
    pub fn is_prediction_unavailable(&self) -> bool {
        matches!(self, Self::PredictionUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
