//! HTTP client for the remote sequence model.
//!
//! POSTs `{"X_inference_norm": [[[...]]]}` to `{base_url}/{kind.path()}` and
//! expects `200` with `{"predictions": <nested array>}`. Any other outcome,
//! including a timeout, becomes `PredictionUnavailable`.
//!
//! Retries are off by default. When enabled, only connection failures,
//! timeouts and 5xx responses are retried, with exponential backoff.

use super::{PredictionKind, Predictor};
use crate::error::{ForecastError, Result, UnavailableReason};
use crate::normalize::NormalizedWindow;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on `max_retries`.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".into(),
            timeout_secs: 10,
            max_retries: 0,
            retry_base_delay_ms: 500,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest {
    #[serde(rename = "X_inference_norm")]
    x_inference_norm: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    predictions: serde_json::Value,
}

/// Depth-first flatten of a nested numeric array.
fn flatten_predictions(value: &serde_json::Value, out: &mut Vec<f64>) -> std::result::Result<(), String> {
    match value {
        serde_json::Value::Number(n) => {
            let v = n
                .as_f64()
                .ok_or_else(|| format!("prediction {n} is not representable as f64"))?;
            out.push(v);
            Ok(())
        }
        serde_json::Value::Array(items) => items
            .iter()
            .try_for_each(|item| flatten_predictions(item, out)),
        other => Err(format!("unexpected value in predictions: {other}")),
    }
}

/// Blocking HTTP predictor.
pub struct HttpPredictor {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpPredictor {
    pub fn new(config: &PredictorConfig) -> Result<Self> {
        if config.max_retries > MAX_RETRIES {
            return Err(ForecastError::InvalidParameter(format!(
                "max_retries {} exceeds {MAX_RETRIES}",
                config.max_retries
            )));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ForecastError::InvalidParameter(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        })
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn endpoint(&self, kind: PredictionKind) -> String {
        format!("{}/{}", self.base_url, kind.path())
    }

    /// One attempt. `Err((reason, retryable))` on failure.
    fn attempt(
        &self,
        url: &str,
        payload: &InferenceRequest,
    ) -> std::result::Result<Vec<f64>, (UnavailableReason, bool)> {
        let resp = match self.client.post(url).json(payload).send() {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => return Err((UnavailableReason::Timeout, true)),
            Err(e) if e.is_connect() => {
                return Err((UnavailableReason::Network(e.to_string()), true))
            }
            Err(e) => return Err((UnavailableReason::Network(e.to_string()), false)),
        };

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().unwrap_or_default();
            return Err((
                UnavailableReason::Status {
                    code: status.as_u16(),
                    body,
                },
                status.is_server_error(),
            ));
        }

        let parsed: InferenceResponse = resp.json().map_err(|e| {
            if e.is_timeout() {
                (UnavailableReason::Timeout, true)
            } else {
                (UnavailableReason::Malformed(e.to_string()), false)
            }
        })?;

        let mut values = Vec::new();
        flatten_predictions(&parsed.predictions, &mut values)
            .map_err(|msg| (UnavailableReason::Malformed(msg), false))?;
        Ok(values)
    }
}

impl Predictor for HttpPredictor {
    fn fetch_normalized(
        &self,
        kind: PredictionKind,
        window: &NormalizedWindow,
    ) -> Result<Vec<f64>> {
        let url = self.endpoint(kind);
        let payload = InferenceRequest {
            x_inference_norm: window.to_tensor(),
        };

        let mut last_reason = UnavailableReason::Network("no attempt made".into());
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff_delay(attempt);
                tracing::warn!(%kind, attempt, ?delay, reason = %last_reason, "retrying prediction");
                std::thread::sleep(delay);
            }

            match self.attempt(&url, &payload) {
                Ok(values) => {
                    tracing::debug!(%kind, count = values.len(), "received predictions");
                    return Ok(values);
                }
                Err((reason, retryable)) => {
                    last_reason = reason;
                    if !retryable {
                        break;
                    }
                }
            }
        }

        tracing::warn!(%kind, %url, reason = %last_reason, "prediction unavailable");
        Err(ForecastError::PredictionUnavailable {
            kind,
            reason: last_reason,
        })
    }
}
