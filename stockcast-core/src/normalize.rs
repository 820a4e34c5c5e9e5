//! Window normalization for the sequence model.
//!
//! Takes the last `window_size` rows of a series, restricted to an ordered
//! feature list, and min-max scales each column to [0, 1] using that window
//! alone. The scale is local to the window: overlapping windows can scale
//! differently, which is the convention the remote model was trained under.
//!
//! The first feature is the predicted quantity. Its range is the only one
//! used to map predictions back to price space, so the target must sit at
//! index 0.

use crate::domain::{Feature, FeatureSource};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Which columns to take, how many rows, and which column is predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    pub features: Vec<Feature>,
    pub window_size: usize,
    pub target: Feature,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            features: vec![Feature::Close, Feature::High, Feature::Low],
            window_size: 30,
            target: Feature::Close,
        }
    }
}

impl WindowSpec {
    /// Checks that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        match self.features.first() {
            Some(&first) if first == self.target => {}
            Some(first) => {
                return Err(ForecastError::InvalidFeatureOrder {
                    expected: self.target,
                    found: first.to_string(),
                })
            }
            None => {
                return Err(ForecastError::InvalidFeatureOrder {
                    expected: self.target,
                    found: "empty feature list".into(),
                })
            }
        }
        if self.window_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "window size must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Observed range of one column within one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-column ranges of the window they were computed from.
///
/// Only `WindowNormalizer` builds these, and only as part of a
/// `NormalizedWindow`, so they always travel with their own window.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationParams {
    features: Vec<Feature>,
    ranges: Vec<FeatureRange>,
}

impl NormalizationParams {
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn ranges(&self) -> &[FeatureRange] {
        &self.ranges
    }

    /// Range of the predicted column (index 0).
    pub fn target_range(&self) -> FeatureRange {
        self.ranges[0]
    }

    /// `(x - min) / (max - min)` for column `col`.
    pub fn normalize_value(&self, col: usize, x: f64) -> f64 {
        let r = self.ranges[col];
        (x - r.min) / r.span()
    }

    /// `v * (max - min) + min` using the target column's range.
    pub fn denormalize(&self, v: f64) -> f64 {
        let r = self.target_range();
        v * r.span() + r.min
    }
}

/// A (window_size × features) matrix scaled to [0, 1], with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWindow {
    matrix: Vec<Vec<f64>>,
    params: NormalizationParams,
}

impl NormalizedWindow {
    /// Rows are timesteps (oldest first), columns follow the feature list.
    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    pub fn params(&self) -> &NormalizationParams {
        &self.params
    }

    pub fn window_size(&self) -> usize {
        self.matrix.len()
    }

    pub fn num_features(&self) -> usize {
        self.params.features.len()
    }

    /// `[batch, timesteps, features]`.
    pub fn shape(&self) -> [usize; 3] {
        [1, self.window_size(), self.num_features()]
    }

    /// Rank-3 tensor (batch of one) in the nested layout the model endpoint expects.
    pub fn to_tensor(&self) -> Vec<Vec<Vec<f64>>> {
        vec![self.matrix.clone()]
    }

    pub fn denormalize(&self, v: f64) -> f64 {
        self.params.denormalize(v)
    }

    pub fn denormalize_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.denormalize(v)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WindowNormalizer {
    spec: WindowSpec,
}

impl WindowNormalizer {
    pub fn new(spec: WindowSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    /// Normalize the tail of `source`.
    ///
    /// Errors, in the order they are checked: `InvalidFeatureOrder`,
    /// `InsufficientHistory`, `MissingFeature`, `DegenerateWindow`.
    pub fn normalize(&self, source: &dyn FeatureSource) -> Result<NormalizedWindow> {
        let spec = &self.spec;
        spec.validate()?;

        let n = source.len();
        if n < spec.window_size {
            return Err(ForecastError::InsufficientHistory {
                required: spec.window_size,
                available: n,
            });
        }
        let start = n - spec.window_size;

        let mut columns = Vec::with_capacity(spec.features.len());
        for &feature in &spec.features {
            if !source.has_feature(feature) {
                return Err(ForecastError::MissingFeature { feature });
            }
            let mut column = Vec::with_capacity(spec.window_size);
            for row in start..n {
                let v = source
                    .value(feature, row)
                    .ok_or(ForecastError::MissingFeature { feature })?;
                column.push(v);
            }
            // Indicator warm-up inside the window means the source is too short.
            if let Some(last_undefined) = column.iter().rposition(|v| v.is_nan()) {
                return Err(ForecastError::InsufficientHistory {
                    required: spec.window_size,
                    available: spec.window_size - last_undefined - 1,
                });
            }
            columns.push(column);
        }

        let mut ranges = Vec::with_capacity(columns.len());
        for (column, &feature) in columns.iter().zip(&spec.features) {
            let min = column.iter().copied().fold(f64::INFINITY, f64::min);
            let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max == min {
                return Err(ForecastError::DegenerateWindow { feature });
            }
            ranges.push(FeatureRange { min, max });
        }

        let params = NormalizationParams {
            features: spec.features.clone(),
            ranges,
        };

        let matrix = (0..spec.window_size)
            .map(|t| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(col, values)| params.normalize_value(col, values[t]))
                    .collect()
            })
            .collect();

        tracing::debug!(
            rows = spec.window_size,
            features = spec.features.len(),
            target_min = params.target_range().min,
            target_max = params.target_range().max,
            "normalized window"
        );

        Ok(NormalizedWindow { matrix, params })
    }
}
