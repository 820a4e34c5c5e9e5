//! Exponential Moving Average (EMA), recursive form without bias correction.
//!
//! alpha = 2 / (span + 1)
//! EMA[0] = x[0]
//! EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
//! Lookback: 0. Early values lean heavily on the first sample.

/// EMA of `values` with the given span.
///
/// A NaN input taints that position and everything after it.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n == 0 || span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[0];
    if prev.is_nan() {
        return result;
    }
    result[0] = prev;

    for i in 1..n {
        if values[i].is_nan() {
            return result;
        }
        // Same as alpha*x + (1-alpha)*prev; exact on a constant input.
        let next = prev + alpha * (values[i] - prev);
        result[i] = next;
        prev = next;
    }

    result
}
