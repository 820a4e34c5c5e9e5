//! BDD tests for the dashboard views.
//!
//! These tests verify:
//! - Watchlist rows with a healthy and a failing prediction service
//! - Per-ticker failures that leave other tickers untouched
//! - Buy/sell recommendations from injected classifiers
//! - Portfolio totals
//! - Loading histories from a data directory

use chrono::NaiveDate;
use std::fs;
use stockcast_core::data::{Exchange, HistoryStore, TickerInfo};
use stockcast_core::domain::{Bar, PriceSeries};
use stockcast_core::features::{Classifier, FeatureVector, Recommendation};
use stockcast_core::normalize::NormalizedWindow;
use stockcast_core::predict::{PredictionKind, Predictor};
use stockcast_core::{DashboardConfig, ForecastError, UnavailableReason};
use stockcast_dashboard::{
    Dashboard, DashboardError, ForecastStatus, PortfolioSummary, TickerHistory, Trend,
};

// ──────────────────────────────────────────────
// Test doubles
// ──────────────────────────────────────────────

/// Answers every horizon with the same normalized value.
struct FlatModel(f64);

impl Predictor for FlatModel {
    fn fetch_normalized(
        &self,
        kind: PredictionKind,
        _: &NormalizedWindow,
    ) -> stockcast_core::Result<Vec<f64>> {
        Ok(vec![self.0; kind.expected_len()])
    }
}

struct ModelDown;

impl Predictor for ModelDown {
    fn fetch_normalized(
        &self,
        kind: PredictionKind,
        _: &NormalizedWindow,
    ) -> stockcast_core::Result<Vec<f64>> {
        Err(ForecastError::PredictionUnavailable {
            kind,
            reason: UnavailableReason::Status {
                code: 503,
                body: "warming up".into(),
            },
        })
    }
}

struct Fixed(f64);

impl Classifier for Fixed {
    fn predict_probability(&self, _: &FeatureVector) -> f64 {
        self.0
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn bars(n: usize) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + 5.0 * (i as f64 * 0.3).sin() + 0.2 * i as f64;
            Bar {
                date: base + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 20_000,
            }
        })
        .collect()
}

fn history(ticker: &str, n: usize) -> TickerHistory {
    TickerHistory::new(
        TickerInfo {
            ticker: ticker.into(),
            short_name: format!("{ticker} Corp"),
            exchange: Exchange::Hose,
        },
        PriceSeries::new(ticker, bars(n)).unwrap(),
    )
}

fn dashboard<P: Predictor>(predictor: P, buy: f64, sell: f64) -> Dashboard<P, Fixed> {
    Dashboard::new(predictor, Fixed(buy), Fixed(sell), &DashboardConfig::default())
}

// ──────────────────────────────────────────────
// Watchlist
// ──────────────────────────────────────────────

#[test]
fn bdd_scenario_watchlist_with_live_model() {
    // GIVEN two tickers with 60 sessions each and a model answering 0.5
    let histories = vec![history("ACB", 60), history("BID", 60)];
    let dash = dashboard(FlatModel(0.5), 0.5, 0.5);

    // WHEN the watchlist is built
    let rows = dash.watchlist(&histories);

    // THEN every row carries a forecast at the midpoint of the close window
    assert_eq!(rows.len(), 2);
    for (row, h) in rows.iter().zip(&histories) {
        let row = row.as_ref().unwrap();
        assert_eq!(row.ticker, h.ticker());
        assert_eq!(row.name, format!("{} Corp", h.ticker()));

        let closes = h.series.closes();
        let tail = &closes[closes.len() - 30..];
        let min = tail.iter().copied().fold(f64::INFINITY, f64::min);
        let max = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mid = min + 0.5 * (max - min);

        let forecast = row.forecast.forecast().unwrap();
        assert!((forecast.next_day - mid).abs() < 1e-9);
        assert!((forecast.third_day_open - mid).abs() < 1e-9);
        assert_eq!(forecast.three_day_trend()[1], Trend::Flat);
        assert_eq!(forecast.reference_open, h.series.last().unwrap().open);
    }
}

#[test]
fn bdd_scenario_watchlist_degrades_when_model_is_down() {
    // GIVEN a prediction service answering 503
    let histories = vec![history("CTG", 60)];
    let dash = dashboard(ModelDown, 0.5, 0.5);

    // WHEN the watchlist is built
    let rows = dash.watchlist(&histories);

    // THEN the row still shows history, with the forecast marked unavailable
    let row = rows[0].as_ref().unwrap();
    assert!(matches!(row.forecast, ForecastStatus::Unavailable(_)));
    let closes = histories[0].series.closes();
    let n = closes.len();
    assert!((row.change.change - (closes[n - 1] - closes[n - 2])).abs() < 1e-12);
    assert_eq!(row.latest, *histories[0].series.last().unwrap());
}

#[test]
fn bdd_scenario_short_history_keeps_its_row() {
    // GIVEN one ticker with too little history for a model window
    let histories = vec![history("VCB", 60), history("EIB", 10), history("MBB", 60)];
    let dash = dashboard(FlatModel(0.25), 0.5, 0.5);

    // WHEN the watchlist is built
    let rows = dash.watchlist(&histories);

    // THEN the short ticker keeps its history columns without a forecast
    assert!(rows[0].as_ref().unwrap().forecast.forecast().is_some());
    assert!(rows[2].as_ref().unwrap().forecast.forecast().is_some());
    let eib = rows[1].as_ref().unwrap();
    assert_eq!(eib.ticker, "EIB");
    assert_eq!(eib.latest, *histories[1].series.last().unwrap());
    match &eib.forecast {
        ForecastStatus::Failed(reason) => assert!(reason.contains("30"), "{reason}"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn bdd_scenario_flat_window_keeps_its_row() {
    // GIVEN a ticker whose price never moved for 40 sessions
    let base = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let flat: Vec<Bar> = (0..40)
        .map(|i| Bar {
            date: base + chrono::Duration::days(i),
            open: 25_000.0,
            high: 25_000.0,
            low: 25_000.0,
            close: 25_000.0,
            volume: 100,
        })
        .collect();
    let h = TickerHistory::new(
        TickerInfo {
            ticker: "PVS".into(),
            short_name: "PVS Corp".into(),
            exchange: Exchange::Hnx,
        },
        PriceSeries::new("PVS", flat).unwrap(),
    );

    // WHEN the watchlist is built
    let rows = dashboard(FlatModel(0.5), 0.5, 0.5).watchlist(&[h]);

    // THEN the row shows a zero change and no forecast
    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.change.change, 0.0);
    match &row.forecast {
        ForecastStatus::Failed(reason) => assert!(reason.contains("degenerate"), "{reason}"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn bdd_scenario_single_session_fails_only_its_ticker() {
    // GIVEN one ticker with a single session between two healthy ones
    let histories = vec![history("VCB", 60), history("EIB", 1), history("MBB", 60)];
    let dash = dashboard(FlatModel(0.25), 0.5, 0.5);

    // WHEN the watchlist is built
    let rows = dash.watchlist(&histories);

    // THEN only that ticker fails, and order is preserved
    assert!(rows[0].is_ok());
    assert!(rows[2].is_ok());
    let err = rows[1].as_ref().unwrap_err();
    assert_eq!(err.ticker(), Some("EIB"));
    assert!(matches!(
        err,
        DashboardError::NotEnoughBars {
            required: 2,
            available: 1,
            ..
        }
    ));
}

// ──────────────────────────────────────────────
// Buy / sell
// ──────────────────────────────────────────────

#[test]
fn bdd_scenario_stronger_buy_model_recommends_buy() {
    // GIVEN a buy model at 80% and a sell model at 60%
    let dash = dashboard(ModelDown, 0.8, 0.6);

    // WHEN signals are computed
    let rows = dash.signals(&[history("HPG", 40)]);

    // THEN the recommendation is Buy and the sell flag is cleared
    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.decision.recommendation, Recommendation::Buy);
    assert!(row.decision.buy);
    assert!(!row.decision.sell);
    assert!((row.decision.buy_probability - 80.0).abs() < 1e-9);
}

#[test]
fn bdd_scenario_equal_probabilities_hold() {
    let dash = dashboard(ModelDown, 0.4, 0.4);
    let rows = dash.signals(&[history("SSI", 40)]);
    assert_eq!(
        rows[0].as_ref().unwrap().decision.recommendation,
        Recommendation::Hold
    );
}

#[test]
fn bdd_scenario_signals_need_indicator_warmup() {
    // 19 sessions leave no complete indicator row.
    let dash = dashboard(ModelDown, 0.9, 0.1);
    let rows = dash.signals(&[history("FPT", 19), history("MWG", 20)]);
    assert!(matches!(
        rows[0].as_ref().unwrap_err(),
        DashboardError::Forecast {
            source: ForecastError::InsufficientHistory { .. },
            ..
        }
    ));
    assert!(rows[1].is_ok());
}

// ──────────────────────────────────────────────
// Portfolio
// ──────────────────────────────────────────────

#[test]
fn bdd_scenario_portfolio_summary() {
    // GIVEN 10,000,000 invested across three tickers
    let histories = vec![history("ACB", 30), history("BID", 31), history("CTG", 32)];

    // WHEN the summary is built
    let summary = PortfolioSummary::build(10_000_000.0, &histories).unwrap();

    // THEN money is split evenly and totals add up
    let expected_change: f64 = histories
        .iter()
        .map(|h| {
            let c = h.series.closes();
            c[c.len() - 1] - c[c.len() - 2]
        })
        .sum();
    assert_eq!(summary.holdings.len(), 3);
    for holding in &summary.holdings {
        assert!((holding.invested - 10_000_000.0 / 3.0).abs() < 1e-6);
    }
    assert!((summary.total_change - expected_change).abs() < 1e-9);
    assert_eq!(summary.profit_loss, summary.total_change);
    assert!((summary.market_value - (10_000_000.0 + expected_change)).abs() < 1e-6);
}

#[test]
fn bdd_scenario_empty_portfolio_is_rejected() {
    assert!(matches!(
        PortfolioSummary::build(1_000_000.0, &[]).unwrap_err(),
        DashboardError::InvalidPortfolio(_)
    ));
}

// ──────────────────────────────────────────────
// Loading
// ──────────────────────────────────────────────

#[test]
fn bdd_scenario_load_histories_from_data_dir() {
    // GIVEN a data directory with one HNX ticker
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ticker-overview.csv"),
        "ticker,shortName,exchange\nSHS,Saigon Hanoi Securities,HNX\n",
    )
    .unwrap();
    let hist = dir.path().join("stock-historical-data");
    fs::create_dir(&hist).unwrap();
    let mut csv = String::from("TradingDate,Open,High,Low,Close,Volume\n");
    for bar in bars(25) {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    fs::write(hist.join("SHS-HNXIndex-History.csv"), csv).unwrap();
    let store = HistoryStore::open(dir.path()).unwrap();

    // WHEN a known and an unknown ticker are loaded
    let loaded = TickerHistory::load_all(&store, &["SHS".to_string(), "XYZ".to_string()]);

    // THEN the known ticker loads and the unknown one reports its name
    let shs = loaded[0].as_ref().unwrap();
    assert_eq!(shs.series.len(), 25);
    assert_eq!(shs.info.exchange, Exchange::Hnx);
    assert_eq!(loaded[1].as_ref().unwrap_err().ticker(), Some("XYZ"));
}
