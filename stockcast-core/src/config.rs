//! Dashboard configuration loaded from TOML.
//!
//! ```toml
//! data_dir = "data"
//!
//! [predictor]
//! base_url = "http://127.0.0.1:8000/"
//! timeout_secs = 10
//!
//! [indicators]
//! rsi_window = 14
//!
//! [window]
//! features = ["Close", "High", "Low"]
//! window_size = 30
//! target = "Close"
//!
//! [decision]
//! threshold = 50.0
//!
//! [models]
//! buy = "models/buy.json"
//! sell = "models/sell.json"
//! ```
//!
//! Every section and field is optional and falls back to its default.

use crate::error::ForecastError;
use crate::features::DecisionThreshold;
use crate::indicators::IndicatorParams;
use crate::normalize::WindowSpec;
use crate::predict::{PredictorConfig, MAX_RETRIES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid [{section}] config: {source}")]
    Invalid {
        section: &'static str,
        #[source]
        source: ForecastError,
    },

    #[error("invalid [{section}] config: {message}")]
    OutOfRange {
        section: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub threshold: DecisionThreshold,
}

/// Paths to the buy and sell classifier coefficient files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub predictor: PredictorConfig,
    pub indicators: IndicatorParams,
    pub window: WindowSpec,
    pub decision: DecisionConfig,
    pub models: ModelPaths,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            predictor: PredictorConfig::default(),
            indicators: IndicatorParams::default(),
            window: WindowSpec::default(),
            decision: DecisionConfig::default(),
            models: ModelPaths::default(),
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators
            .validate()
            .map_err(|source| ConfigError::Invalid {
                section: "indicators",
                source,
            })?;
        self.window.validate().map_err(|source| ConfigError::Invalid {
            section: "window",
            source,
        })?;

        let threshold = self.decision.threshold.0;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::OutOfRange {
                section: "decision",
                message: format!("threshold {threshold} must be within 0..=100"),
            });
        }

        if self.predictor.base_url.trim().is_empty() {
            return Err(ConfigError::OutOfRange {
                section: "predictor",
                message: "base_url must not be empty".into(),
            });
        }
        if self.predictor.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                section: "predictor",
                message: "timeout_secs must be >= 1".into(),
            });
        }
        if self.predictor.max_retries > MAX_RETRIES {
            return Err(ConfigError::OutOfRange {
                section: "predictor",
                message: format!(
                    "max_retries {} must be at most {MAX_RETRIES}",
                    self.predictor.max_retries
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Feature;

    #[test]
    fn empty_toml_is_default() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.predictor.timeout_secs, 10);
        assert_eq!(config.window.window_size, 30);
        assert_eq!(config.decision.threshold, DecisionThreshold(50.0));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
data_dir = "/srv/market"

[predictor]
base_url = "http://model:9000"
max_retries = 2

[window]
window_size = 60

[decision]
threshold = 65.0
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/market"));
        assert_eq!(config.predictor.max_retries, 2);
        assert_eq!(config.predictor.timeout_secs, 10);
        assert_eq!(config.window.window_size, 60);
        assert_eq!(config.window.features[0], Feature::Close);
        assert_eq!(config.decision.threshold.0, 65.0);
        assert_eq!(config.indicators, IndicatorParams::default());
    }

    #[test]
    fn target_not_first_is_rejected() {
        let err = DashboardConfig::from_toml(
            r#"
[window]
features = ["High", "Close"]
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                section: "window",
                source: ForecastError::InvalidFeatureOrder { .. }
            }
        ));
    }

    #[test]
    fn bad_macd_spans_rejected() {
        let err = DashboardConfig::from_toml(
            r#"
[indicators]
macd_short = 26
macd_long = 12
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { section: "indicators", .. }));
    }

    #[test]
    fn threshold_out_of_range() {
        let err = DashboardConfig::from_toml("[decision]\nthreshold = 120.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { section: "decision", .. }));
    }

    #[test]
    fn max_retries_is_capped() {
        let err = DashboardConfig::from_toml("[predictor]\nmax_retries = 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { section: "predictor", .. }));
        assert!(DashboardConfig::from_toml("[predictor]\nmax_retries = 10\n").is_ok());
    }

    #[test]
    fn unknown_feature_is_parse_error() {
        let err = DashboardConfig::from_toml("[window]\nfeatures = [\"Close\", \"Foo\"]\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = DashboardConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(DashboardConfig::from_toml(&text).unwrap(), config);
    }
}
