//! Classifier boundary for the buy and sell models.
//!
//! The dashboard injects one classifier for "buy" and one for "sell"; both
//! see the same six-element feature vector.

use super::FeatureVector;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A binary classifier over the buy/sell feature vector.
pub trait Classifier: Send + Sync {
    /// Probability of the positive class, in [0, 1].
    fn predict_probability(&self, features: &FeatureVector) -> f64;
}

/// Classifier output as a percentage, clamped to [0, 100].
pub fn probability_pct(classifier: &dyn Classifier, features: &FeatureVector) -> f64 {
    classifier.predict_probability(features).clamp(0.0, 1.0) * 100.0
}

/// Logistic regression: `sigmoid(bias + Σ weights[i] * x[i])`.
///
/// Stored as JSON so coefficients exported from a training notebook can be
/// loaded without a model runtime:
/// `{"weights": [w_close, w_rsi, w_macd, w_signal, w_bb_high, w_bb_low], "bias": b}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub weights: [f64; 6],
    pub bias: f64,
}

impl LinearClassifier {
    pub fn new(weights: [f64; 6], bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(content)
            .map_err(|e| ForecastError::InvalidParameter(format!("parse classifier JSON: {e}")))?;
        if !model.bias.is_finite() || model.weights.iter().any(|w| !w.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "classifier coefficients must be finite".into(),
            ));
        }
        Ok(model)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::InvalidParameter(format!("read classifier {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    fn logit(&self, features: &FeatureVector) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

impl Classifier for LinearClassifier {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        1.0 / (1.0 + (-self.logit(features)).exp())
    }
}
