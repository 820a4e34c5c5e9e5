//! Simple rolling mean over a numeric series.
//!
//! mean[t] = average of values[t-window+1..=t]
//! Lookback: window - 1. A NaN anywhere in the window yields NaN.

/// Rolling mean of `values` over `window` samples.
///
/// Each window is summed from scratch so results do not depend on the
/// history of earlier windows.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = slice.iter().sum::<f64>() / window as f64;
    }

    result
}
