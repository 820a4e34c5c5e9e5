//! Stockcast CLI: indicator, forecast and dashboard commands.
//!
//! Commands:
//! - `indicators`: RSI, MACD and Bollinger Bands for the latest sessions
//! - `features`: the buy/sell classifier input for today
//! - `normalize`: the normalized model window and its target range
//! - `predict`: next-day, 3rd-day and 3-consecutive-day forecasts
//! - `watchlist`: latest session, daily change and forecast per ticker
//! - `signals`: buy/sell recommendation per ticker
//! - `portfolio`: equal-weight portfolio summary
//! - `config`: print the effective configuration as TOML

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use stockcast_core::data::HistoryStore;
use stockcast_core::domain::FeatureSource;
use stockcast_core::features::{BuySellFeaturizer, FeatureVector, LinearClassifier};
use stockcast_core::indicators::IndicatorFrame;
use stockcast_core::predict::HttpPredictor;
use stockcast_core::DashboardConfig;
use stockcast_dashboard::{
    Dashboard, DashboardError, ForecastStatus, PortfolioSummary, TickerHistory,
};

#[derive(Parser)]
#[command(
    name = "stockcast",
    about = "Stockcast CLI: technical indicators and price forecasts for listed stocks"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory override (ticker-overview.csv, stock-historical-data/).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show indicator values for the latest sessions of a ticker.
    Indicators {
        ticker: String,

        /// Number of trailing sessions to show.
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Show today's buy/sell feature vector.
    Features { ticker: String },
    /// Show the normalized model window.
    Normalize { ticker: String },
    /// Query the prediction service for all three horizons.
    Predict { ticker: String },
    /// Build watchlist rows (history plus forecast).
    Watchlist {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Buy/sell recommendation per ticker. Needs [models] in the config.
    Signals {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Equal-weight portfolio summary.
    Portfolio {
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Total invested money (VND).
        #[arg(long, default_value_t = 10_000_000.0)]
        invested: f64,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockcast=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Indicators { ticker, rows } => run_indicators(&config, &ticker, rows, cli.json),
        Commands::Features { ticker } => run_features(&config, &ticker, cli.json),
        Commands::Normalize { ticker } => run_normalize(&config, &ticker, cli.json),
        Commands::Predict { ticker } => run_predict(&config, &ticker, cli.json),
        Commands::Watchlist { tickers } => run_watchlist(&config, &tickers, cli.json),
        Commands::Signals { tickers } => run_signals(&config, &tickers, cli.json),
        Commands::Portfolio { tickers, invested } => {
            run_portfolio(&config, &tickers, invested, cli.json)
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn open_store(config: &DashboardConfig) -> Result<HistoryStore> {
    HistoryStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))
}

fn load_one(config: &DashboardConfig, ticker: &str) -> Result<TickerHistory> {
    Ok(TickerHistory::load(&open_store(config)?, ticker)?)
}

/// Loads every ticker; failures are reported and skipped.
fn load_many(config: &DashboardConfig, tickers: &[String]) -> Result<(Vec<TickerHistory>, usize)> {
    let store = open_store(config)?;
    let mut loaded = Vec::new();
    let mut failures = 0;
    for result in TickerHistory::load_all(&store, tickers) {
        match result {
            Ok(history) => loaded.push(history),
            Err(e) => {
                eprintln!("Error: {e}");
                failures += 1;
            }
        }
    }
    Ok((loaded, failures))
}

/// Buy and sell classifiers from `[models]`.
///
/// When `required` is false and no models are configured, both sides get a
/// neutral classifier (always 50%).
fn load_models(config: &DashboardConfig, required: bool) -> Result<(LinearClassifier, LinearClassifier)> {
    match (&config.models.buy, &config.models.sell) {
        (Some(buy), Some(sell)) => Ok((
            LinearClassifier::from_file(buy)
                .with_context(|| format!("loading buy model {}", buy.display()))?,
            LinearClassifier::from_file(sell)
                .with_context(|| format!("loading sell model {}", sell.display()))?,
        )),
        _ if required => bail!("both [models] buy and sell paths are required for this command"),
        _ => {
            let neutral = LinearClassifier::new([0.0; 6], 0.0);
            Ok((neutral.clone(), neutral))
        }
    }
}

fn build_dashboard(
    config: &DashboardConfig,
    models_required: bool,
) -> Result<Dashboard<HttpPredictor, LinearClassifier>> {
    let predictor = HttpPredictor::new(&config.predictor)?;
    let (buy, sell) = load_models(config, models_required)?;
    Ok(Dashboard::new(predictor, buy, sell, config))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints per-ticker errors; returns how many there were.
fn report_errors<T>(results: Vec<Result<T, DashboardError>>) -> (Vec<T>, usize) {
    let mut ok = Vec::new();
    let mut failures = 0;
    for result in results {
        match result {
            Ok(row) => ok.push(row),
            Err(e) => {
                eprintln!("Error: {e}");
                failures += 1;
            }
        }
    }
    (ok, failures)
}

fn exit_on_failures(failures: usize) {
    if failures > 0 {
        std::process::exit(1);
    }
}

fn run_indicators(config: &DashboardConfig, ticker: &str, rows: usize, json: bool) -> Result<()> {
    let history = load_one(config, ticker)?;
    let frame = IndicatorFrame::compute(&history.series, &config.indicators)?;
    let columns = FeatureVector::FEATURES;
    let start = frame.len().saturating_sub(rows);

    if json {
        let table: Vec<_> = (start..frame.len())
            .map(|row| {
                let mut entry = serde_json::Map::new();
                entry.insert(
                    "date".into(),
                    serde_json::json!(frame.bars()[row].date.to_string()),
                );
                for feature in columns {
                    let value = frame.value(feature, row).unwrap_or(f64::NAN);
                    let value = if value.is_nan() {
                        serde_json::Value::Null
                    } else {
                        serde_json::json!(value)
                    };
                    entry.insert(feature.name().into(), value);
                }
                serde_json::Value::Object(entry)
            })
            .collect();
        return print_json(&table);
    }

    print!("{:<12}", "Date");
    for feature in columns {
        print!(" {:>12}", feature.name());
    }
    println!();
    println!("{}", "-".repeat(12 + 13 * columns.len()));
    for row in start..frame.len() {
        print!("{:<12}", frame.bars()[row].date.to_string());
        for feature in columns {
            match frame.value(feature, row) {
                Some(v) if !v.is_nan() => print!(" {v:>12.2}"),
                _ => print!(" {:>12}", "-"),
            }
        }
        println!();
    }
    Ok(())
}

fn run_features(config: &DashboardConfig, ticker: &str, json: bool) -> Result<()> {
    let history = load_one(config, ticker)?;
    let vector = BuySellFeaturizer::new(config.indicators.clone()).featurize(&history.series)?;
    if json {
        return print_json(&vector);
    }
    println!("{} ({})", history.ticker(), history.info.short_name);
    for (feature, value) in FeatureVector::FEATURES
        .iter()
        .zip(vector.values())
    {
        println!("  {:<12} {value:>14.4}", feature.name());
    }
    Ok(())
}

fn run_normalize(config: &DashboardConfig, ticker: &str, json: bool) -> Result<()> {
    let history = load_one(config, ticker)?;
    let dashboard = build_dashboard(config, false)?;
    let window = dashboard.window(&history.series)?;
    if json {
        return print_json(&serde_json::json!({
            "features": window.params().features(),
            "ranges": window.params().ranges(),
            "X_inference_norm": window.to_tensor(),
        }));
    }
    let [batch, steps, width] = window.shape();
    let target = window.params().target_range();
    println!("{}: window shape [{batch}, {steps}, {width}]", history.ticker());
    println!("Target range: {:.2} .. {:.2}", target.min, target.max);
    for (feature, range) in window.params().features().iter().zip(window.params().ranges()) {
        println!("  {:<12} min {:>12.2}  max {:>12.2}", feature.name(), range.min, range.max);
    }
    Ok(())
}

fn run_predict(config: &DashboardConfig, ticker: &str, json: bool) -> Result<()> {
    let history = load_one(config, ticker)?;
    let dashboard = build_dashboard(config, false)?;
    let forecast = dashboard.forecast(&history.series)?;
    if json {
        return print_json(&forecast);
    }
    let trend = forecast.three_day_trend();
    println!("{} ({})", history.ticker(), history.info.short_name);
    println!("  Last open            {:>12.2}", forecast.reference_open);
    println!(
        "  Next day             {:>12.2}  {:+.2}",
        forecast.next_day,
        forecast.next_day_diff()
    );
    println!(
        "  3rd day open         {:>12.2}  {:+.2}",
        forecast.third_day_open,
        forecast.third_day_diff()
    );
    println!(
        "  Next 3 days          {} {:.2}  {} {:.2}  {} {:.2}",
        trend[0].arrow(),
        forecast.three_days[0],
        trend[1].arrow(),
        forecast.three_days[1],
        trend[2].arrow(),
        forecast.three_days[2]
    );
    println!(
        "  3-day average        {:>12.2}  {:+.2}",
        forecast.three_day_average(),
        forecast.three_day_average_diff()
    );
    Ok(())
}

fn run_watchlist(config: &DashboardConfig, tickers: &[String], json: bool) -> Result<()> {
    let (histories, load_failures) = load_many(config, tickers)?;
    let dashboard = build_dashboard(config, false)?;
    let (rows, failures) = report_errors(dashboard.watchlist(&histories));

    if json {
        print_json(&rows)?;
    } else {
        println!(
            "{:<6} {:<28} {:<6} {:>12} {:>10} {:>8} {:>12} {:>12} {:>12}",
            "Ticker", "Name", "Exch", "Last Close", "Change", "Chg %", "Next Day", "Day 3", "Avg 3 Days"
        );
        println!("{}", "-".repeat(114));
        for row in &rows {
            let (next, third, avg) = match &row.forecast {
                ForecastStatus::Available(f) => (
                    format!("{} {:.2}", row_arrow(f.next_day_diff()), f.next_day),
                    format!("{} {:.2}", row_arrow(f.third_day_diff()), f.third_day_open),
                    format!(
                        "{} {:.2}",
                        row_arrow(f.three_day_average_diff()),
                        f.three_day_average()
                    ),
                ),
                ForecastStatus::Unavailable(_) | ForecastStatus::Failed(_) => {
                    ("N/A".into(), "N/A".into(), "N/A".into())
                }
            };
            println!(
                "{:<6} {:<28} {:<6} {:>12.2} {:>+10.2} {:>+8.2} {:>12} {:>12} {:>12}",
                row.ticker,
                truncate(&row.name, 28),
                row.exchange.to_string(),
                row.change.last_close,
                row.change.change,
                row.change.change_percent,
                next,
                third,
                avg
            );
        }
    }

    exit_on_failures(load_failures + failures);
    Ok(())
}

fn run_signals(config: &DashboardConfig, tickers: &[String], json: bool) -> Result<()> {
    let (histories, load_failures) = load_many(config, tickers)?;
    let dashboard = build_dashboard(config, true)?;
    let (rows, failures) = report_errors(dashboard.signals(&histories));

    if json {
        print_json(&rows)?;
    } else {
        println!(
            "{:<6} {:>8} {:>8} {:<12} {:<12} {:<8}",
            "Ticker", "Buy %", "Sell %", "Buy", "Sell", "Call"
        );
        println!("{}", "-".repeat(60));
        for row in &rows {
            let d = &row.decision;
            println!(
                "{:<6} {:>8.1} {:>8.1} {:<12} {:<12} {:<8}",
                row.ticker,
                d.buy_probability,
                d.sell_probability,
                if d.buy { "✓ Buy" } else { "✗ Don't Buy" },
                if d.sell { "✓ Sell" } else { "✗ Don't Sell" },
                d.recommendation.to_string()
            );
        }
    }

    exit_on_failures(load_failures + failures);
    Ok(())
}

fn run_portfolio(
    config: &DashboardConfig,
    tickers: &[String],
    invested: f64,
    json: bool,
) -> Result<()> {
    let (histories, load_failures) = load_many(config, tickers)?;
    if load_failures > 0 {
        bail!("{load_failures} ticker(s) could not be loaded");
    }
    let summary = PortfolioSummary::build(invested, &histories)?;

    if json {
        return print_json(&summary);
    }

    println!("Portfolio Summary");
    println!(
        "  Today's change     {} {:>16.0} VND",
        summary.trend().arrow(),
        summary.total_change
    );
    println!("  Total profit/loss    {:>16.0} VND", summary.profit_loss);
    println!("  Market value         {:>16.0} VND", summary.market_value);
    println!("  Total cost           {:>16.0} VND", summary.total_invested);
    println!();
    println!(
        "{:<6} {:>16} {:>14} {:>12} {:>8}",
        "Ticker", "Invested", "Last Close", "Change", "Chg %"
    );
    println!("{}", "-".repeat(60));
    for h in &summary.holdings {
        println!(
            "{:<6} {:>16.0} {:>14.0} {:>+12.0} {:>+8.2}",
            h.ticker, h.invested, h.change.last_close, h.change.change, h.change.change_percent
        );
    }
    Ok(())
}

fn row_arrow(diff: f64) -> &'static str {
    stockcast_dashboard::Trend::from_diff(diff).arrow()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
