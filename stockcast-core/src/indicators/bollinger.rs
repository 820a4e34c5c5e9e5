//! Bollinger Bands: rolling mean +/- k population standard deviations.
//!
//! - Middle: mean(close, window)
//! - Upper: middle + k * stddev(close, window)
//! - Lower: middle - k * stddev(close, window)
//!
//! Uses population stddev (divide by N).
//! Lookback: window - 1.

use crate::error::{ForecastError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bollinger {
    window: usize,
    k: f64,
}

/// The three band series, each the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl Bollinger {
    pub fn new(window: usize, k: f64) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Bollinger window must be >= 1".into(),
            ));
        }
        if !k.is_finite() || k < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Bollinger multiplier must be finite and >= 0, got {k}"
            )));
        }
        Ok(Self { window, k })
    }

    pub fn compute(&self, closes: &[f64]) -> BollingerBands {
        let n = closes.len();
        let mut bands = BollingerBands {
            middle: vec![f64::NAN; n],
            upper: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
        };

        if n < self.window {
            return bands;
        }

        for i in (self.window - 1)..n {
            let window = &closes[(i + 1 - self.window)..=i];
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }

            let mean = window.iter().sum::<f64>() / self.window as f64;
            let variance = window
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.window as f64;
            let stddev = variance.sqrt();

            bands.middle[i] = mean;
            bands.upper[i] = mean + self.k * stddev;
            bands.lower[i] = mean - self.k * stddev;
        }

        bands
    }
}

pub fn bollinger(closes: &[f64], window: usize, k: f64) -> Result<BollingerBands> {
    Ok(Bollinger::new(window, k)?.compute(closes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_rolling_mean() {
        let bands = Bollinger::new(3, 2.0)
            .unwrap()
            .compute(&[10.0, 11.0, 12.0, 13.0, 14.0]);

        assert!(bands.middle[0].is_nan());
        assert!(bands.middle[1].is_nan());
        assert_approx(bands.middle[2], 11.0, DEFAULT_EPSILON);
        assert_approx(bands.middle[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_uses_population_stddev() {
        // window [10, 11, 12]: mean 11, population variance 2/3
        let bands = Bollinger::new(3, 2.0)
            .unwrap()
            .compute(&[10.0, 11.0, 12.0]);
        let sd = (2.0_f64 / 3.0).sqrt();
        assert_approx(bands.upper[2], 11.0 + 2.0 * sd, DEFAULT_EPSILON);
        assert_approx(bands.lower[2], 11.0 - 2.0 * sd, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bands = Bollinger::new(3, 2.0)
            .unwrap()
            .compute(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        for i in 2..5 {
            let half_width = bands.upper[i] - bands.middle[i];
            assert_approx(bands.middle[i] - bands.lower[i], half_width, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price_collapses_to_mean() {
        let bands = Bollinger::new(3, 2.0).unwrap().compute(&[100.0; 4]);
        assert_eq!(bands.upper[2], 100.0);
        assert_eq!(bands.lower[2], 100.0);
        assert_eq!(bands.middle[3], 100.0);
    }

    #[test]
    fn bollinger_first_window_minus_one_undefined() {
        let closes: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let bands = Bollinger::new(20, 2.0).unwrap().compute(&closes);
        assert!(bands.upper[..19].iter().all(|v| v.is_nan()));
        assert!(bands.upper[19..].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn bollinger_rejects_bad_params() {
        assert!(Bollinger::new(0, 2.0).is_err());
        assert!(Bollinger::new(20, -1.0).is_err());
        assert!(Bollinger::new(20, f64::NAN).is_err());
    }
}
