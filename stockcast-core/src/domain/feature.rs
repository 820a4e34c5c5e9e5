//! Named columns the pipeline can read from a price series or indicator frame.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A column of a `PriceSeries` or `IndicatorFrame`.
///
/// Names follow the history files and the remote model's training columns
/// (`"Close"`, `"RSI"`, `"MACD_signal"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Open,
    High,
    Low,
    Close,
    Volume,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "MACD_signal")]
    MacdSignal,
    #[serde(rename = "BB_high")]
    BbHigh,
    #[serde(rename = "BB_low")]
    BbLow,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::Open,
        Feature::High,
        Feature::Low,
        Feature::Close,
        Feature::Volume,
        Feature::Rsi,
        Feature::Macd,
        Feature::MacdSignal,
        Feature::BbHigh,
        Feature::BbLow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Open => "Open",
            Feature::High => "High",
            Feature::Low => "Low",
            Feature::Close => "Close",
            Feature::Volume => "Volume",
            Feature::Rsi => "RSI",
            Feature::Macd => "MACD",
            Feature::MacdSignal => "MACD_signal",
            Feature::BbHigh => "BB_high",
            Feature::BbLow => "BB_low",
        }
    }

    /// Whether this column is derived by the indicator engine rather than
    /// read straight from a bar.
    pub fn is_indicator(&self) -> bool {
        matches!(
            self,
            Feature::Rsi | Feature::Macd | Feature::MacdSignal | Feature::BbHigh | Feature::BbLow
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown feature '{s}'"))
    }
}

/// Anything the window normalizer can pull a named column out of.
pub trait FeatureSource {
    /// Number of rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of `feature` at `row`, or `None` if the source has no such column.
    ///
    /// An indicator column in its warm-up region yields `Some(NAN)`.
    fn value(&self, feature: Feature, row: usize) -> Option<f64>;

    /// Whether this source can provide `feature` at all.
    fn has_feature(&self, feature: Feature) -> bool;
}
