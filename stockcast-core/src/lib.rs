//! Stockcast Core: indicators, featurization, window normalization and the
//! prediction client behind the stock dashboard.
//!
//! This crate contains the computation pipeline:
//! - Domain types (bars, price series, feature names)
//! - Indicator engine (RSI, MACD, Bollinger Bands)
//! - Buy/sell featurizer and the classifier boundary
//! - Per-window min-max normalization for the sequence model
//! - Blocking HTTP client for the remote prediction endpoints
//! - CSV history loading and TOML configuration

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod indicators;
pub mod normalize;
pub mod predict;

pub use config::{ConfigError, DashboardConfig};
pub use error::{ForecastError, Result, UnavailableReason};
