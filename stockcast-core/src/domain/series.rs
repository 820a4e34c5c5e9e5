//! PriceSeries: validated, date-ordered daily history for one instrument.

use super::bar::Bar;
use super::feature::{Feature, FeatureSource};
use crate::error::{ForecastError, Result};

/// Daily bars for one instrument, strictly increasing by date.
///
/// Every rolling indicator depends on the ordering, so construction always
/// sorts, whatever order the loader produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Sort `bars` ascending by date and validate them.
    ///
    /// Fails on duplicate dates and on non-finite or negative prices.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        bars.sort_by_key(|b| b.date);

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_valid() {
                return Err(ForecastError::InvalidSeries(format!(
                    "{symbol}: bar on {} has a non-finite or negative price",
                    bar.date
                )));
            }
            if i > 0 && bars[i - 1].date == bar.date {
                return Err(ForecastError::InvalidSeries(format!(
                    "{symbol}: duplicate date {}",
                    bar.date
                )));
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The last `n` bars (all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

pub(crate) fn bar_value(bar: &Bar, feature: Feature) -> Option<f64> {
    match feature {
        Feature::Open => Some(bar.open),
        Feature::High => Some(bar.high),
        Feature::Low => Some(bar.low),
        Feature::Close => Some(bar.close),
        Feature::Volume => Some(bar.volume as f64),
        _ => None,
    }
}

impl FeatureSource for PriceSeries {
    fn len(&self) -> usize {
        self.bars.len()
    }

    fn value(&self, feature: Feature, row: usize) -> Option<f64> {
        self.bars.get(row).and_then(|bar| bar_value(bar, feature))
    }

    fn has_feature(&self, feature: Feature) -> bool {
        !feature.is_indicator()
    }
}
