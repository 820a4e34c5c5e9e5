//! IndicatorFrame: a price series with RSI, MACD and Bollinger columns joined on.
//!
//! Computed fresh for every request. Leading rows hold NaN wherever an
//! indicator has not warmed up; `drop_warmup` removes them before the frame
//! is used for feature extraction.

use super::{Bollinger, IndicatorParams, Macd, Rsi};
use crate::domain::series::bar_value;
use crate::domain::{Bar, Feature, FeatureSource, PriceSeries};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    symbol: String,
    bars: Vec<Bar>,
    rsi: Vec<f64>,
    macd: Vec<f64>,
    macd_signal: Vec<f64>,
    bb_high: Vec<f64>,
    bb_low: Vec<f64>,
}

impl IndicatorFrame {
    /// Run every indicator over the series' closes and attach the results.
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Result<Self> {
        let closes = series.closes();

        let rsi = Rsi::new(params.rsi_window)?.compute(&closes);
        let macd = Macd::new(params.macd_short, params.macd_long, params.macd_signal)?
            .compute(&closes);
        let bands = Bollinger::new(params.bb_window, params.bb_k)?.compute(&closes);

        tracing::debug!(
            symbol = series.symbol(),
            rows = closes.len(),
            warmup = params.warmup(),
            "computed indicator frame"
        );

        Ok(Self {
            symbol: series.symbol().to_string(),
            bars: series.bars().to_vec(),
            rsi,
            macd: macd.macd,
            macd_signal: macd.signal,
            bb_high: bands.upper,
            bb_low: bands.lower,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Full column for an indicator feature; `None` for OHLCV features.
    pub fn column(&self, feature: Feature) -> Option<&[f64]> {
        match feature {
            Feature::Rsi => Some(&self.rsi),
            Feature::Macd => Some(&self.macd),
            Feature::MacdSignal => Some(&self.macd_signal),
            Feature::BbHigh => Some(&self.bb_high),
            Feature::BbLow => Some(&self.bb_low),
            _ => None,
        }
    }

    /// True when every derived column is defined at `row`.
    pub fn is_complete(&self, row: usize) -> bool {
        [
            &self.rsi,
            &self.macd,
            &self.macd_signal,
            &self.bb_high,
            &self.bb_low,
        ]
        .iter()
        .all(|col| col.get(row).is_some_and(|v| !v.is_nan()))
    }

    /// A frame holding only rows where every indicator is defined.
    ///
    /// Indicators are rolling, so once a row is complete every later row is
    /// too; this drops the leading warm-up block.
    pub fn drop_warmup(&self) -> IndicatorFrame {
        let first = (0..self.len())
            .find(|&row| self.is_complete(row))
            .unwrap_or(self.len());

        IndicatorFrame {
            symbol: self.symbol.clone(),
            bars: self.bars[first..].to_vec(),
            rsi: self.rsi[first..].to_vec(),
            macd: self.macd[first..].to_vec(),
            macd_signal: self.macd_signal[first..].to_vec(),
            bb_high: self.bb_high[first..].to_vec(),
            bb_low: self.bb_low[first..].to_vec(),
        }
    }
}

impl FeatureSource for IndicatorFrame {
    fn len(&self) -> usize {
        self.bars.len()
    }

    fn value(&self, feature: Feature, row: usize) -> Option<f64> {
        match self.column(feature) {
            Some(col) => col.get(row).copied(),
            None => self.bars.get(row).and_then(|bar| bar_value(bar, feature)),
        }
    }

    fn has_feature(&self, _feature: Feature) -> bool {
        true
    }
}
