//! Property tests for dashboard arithmetic.

use chrono::NaiveDate;
use proptest::prelude::*;
use stockcast_core::data::{Exchange, TickerInfo};
use stockcast_core::domain::{Bar, PriceSeries};
use stockcast_dashboard::{three_day_trend, PortfolioSummary, TickerHistory, Trend};

fn arb_price() -> impl Strategy<Value = f64> {
    (1_000.0..150_000.0_f64).prop_map(|p| (p / 50.0).round() * 50.0)
}

fn two_day_history(ticker: String, previous: f64, last: f64) -> TickerHistory {
    let base = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let bars = [previous, last]
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
        })
        .collect();
    TickerHistory::new(
        TickerInfo {
            ticker: ticker.clone(),
            short_name: ticker.clone(),
            exchange: Exchange::Upcom,
        },
        PriceSeries::new(ticker, bars).unwrap(),
    )
}

proptest! {
    /// Market value is always invested plus the summed daily changes.
    #[test]
    fn market_value_identity(
        invested in 1_000_000.0..1_000_000_000.0_f64,
        closes in prop::collection::vec((arb_price(), arb_price()), 1..8),
    ) {
        let histories: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &(prev, last))| two_day_history(format!("T{i}"), prev, last))
            .collect();
        let summary = PortfolioSummary::build(invested, &histories).unwrap();

        let expected: f64 = closes.iter().map(|(p, l)| l - p).sum();
        prop_assert!((summary.total_change - expected).abs() < 1e-6);
        prop_assert!((summary.market_value - invested - expected).abs() < 1e-3);
        let split: f64 = summary.holdings.iter().map(|h| h.invested).sum();
        prop_assert!((split - invested).abs() < 1e-3);
    }

    /// Each step of the 3-day path compares with its predecessor.
    #[test]
    fn three_day_trend_follows_steps(open in arb_price(), days in prop::array::uniform3(arb_price())) {
        let trend = three_day_trend(open, &days);
        let prev = [open, days[0], days[1]];
        for i in 0..3 {
            let expected = if days[i] > prev[i] {
                Trend::Up
            } else if days[i] < prev[i] {
                Trend::Down
            } else {
                Trend::Flat
            };
            prop_assert_eq!(trend[i], expected);
        }
    }
}
