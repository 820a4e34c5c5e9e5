//! Turning buy and sell probabilities into a single recommendation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage at or above which a classifier output counts as "yes".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionThreshold(pub f64);

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(50.0)
    }
}

impl DecisionThreshold {
    pub fn is_positive(&self, probability_pct: f64) -> bool {
        probability_pct >= self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => f.write_str("Buy"),
            Recommendation::Sell => f.write_str("Sell"),
            Recommendation::Hold => f.write_str("Hold"),
        }
    }
}

/// Buy/sell flags plus the overall call for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalDecision {
    pub buy_probability: f64,
    pub sell_probability: f64,
    pub buy: bool,
    pub sell: bool,
    pub recommendation: Recommendation,
}

impl SignalDecision {
    /// The stronger side wins and suppresses the other flag; a tie is Hold.
    ///
    /// Flags still go through the threshold, so a winning side below the
    /// threshold yields e.g. `recommendation = Buy` with `buy = false`.
    pub fn decide(buy_pct: f64, sell_pct: f64, threshold: DecisionThreshold) -> Self {
        let mut buy = threshold.is_positive(buy_pct);
        let mut sell = threshold.is_positive(sell_pct);

        let recommendation = if buy_pct > sell_pct {
            sell = false;
            Recommendation::Buy
        } else if buy_pct < sell_pct {
            buy = false;
            Recommendation::Sell
        } else {
            Recommendation::Hold
        };

        Self {
            buy_probability: buy_pct,
            sell_probability: sell_pct,
            buy,
            sell,
            recommendation,
        }
    }
}
