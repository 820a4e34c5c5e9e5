//! Buy/sell featurization: today's indicator read as a fixed-width vector.
//!
//! The binary classifiers were trained on exactly six columns taken from the
//! last complete row of the indicator frame:
//! `[Close, RSI, MACD, MACD_signal, BB_high, BB_low]`.

pub mod classifier;
pub mod decision;

pub use classifier::{probability_pct, Classifier, LinearClassifier};
pub use decision::{DecisionThreshold, Recommendation, SignalDecision};

use crate::domain::{Feature, FeatureSource, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::indicators::{IndicatorFrame, IndicatorParams};
use serde::{Deserialize, Serialize};

/// Classifier input, in the fixed order of `FeatureVector::FEATURES`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; 6]);

impl FeatureVector {
    pub const FEATURES: [Feature; 6] = [
        Feature::Close,
        Feature::Rsi,
        Feature::Macd,
        Feature::MacdSignal,
        Feature::BbHigh,
        Feature::BbLow,
    ];

    pub fn values(&self) -> &[f64; 6] {
        &self.0
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        Self::FEATURES
            .iter()
            .position(|&f| f == feature)
            .map(|i| self.0[i])
    }
}

/// Builds the classifier input from a price series.
#[derive(Debug, Clone, Default)]
pub struct BuySellFeaturizer {
    params: IndicatorParams,
}

impl BuySellFeaturizer {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Indicator frame with the warm-up rows already dropped.
    pub fn prepare(&self, series: &PriceSeries) -> Result<IndicatorFrame> {
        let frame = IndicatorFrame::compute(series, &self.params)?.drop_warmup();
        if frame.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                required: self.params.min_history(),
                available: series.len(),
            });
        }
        Ok(frame)
    }

    /// Feature vector of the last complete row.
    pub fn featurize(&self, series: &PriceSeries) -> Result<FeatureVector> {
        let frame = self.prepare(series)?;
        let row = frame.len() - 1;

        let mut values = [0.0; 6];
        for (slot, feature) in values.iter_mut().zip(FeatureVector::FEATURES) {
            *slot = frame
                .value(feature, row)
                .ok_or(ForecastError::MissingFeature { feature })?;
        }

        tracing::debug!(symbol = series.symbol(), ?values, "featurized last row");
        Ok(FeatureVector(values))
    }

    /// Positive-class probability as a percentage in [0, 100].
    pub fn probability(&self, classifier: &dyn Classifier, series: &PriceSeries) -> Result<f64> {
        let features = self.featurize(series)?;
        Ok(probability_pct(classifier, &features))
    }
}
