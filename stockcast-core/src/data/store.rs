//! On-disk history store and ticker overview.
//!
//! Layout under the data root:
//! - `ticker-overview.csv` with at least `ticker,shortName,exchange`
//! - `stock-historical-data/{TICKER}-{INDEX}-History.csv`
//!
//! where `INDEX` is the exchange's benchmark index name.

use super::csv_history::load_history_csv;
use super::provider::{DataError, HistoryProvider};
use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    Hose,
    Hnx,
    Upcom,
    Other,
}

impl Exchange {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HOSE" => Exchange::Hose,
            "HNX" => Exchange::Hnx,
            "UPCOM" => Exchange::Upcom,
            _ => Exchange::Other,
        }
    }

    /// Benchmark index name used in history file names.
    pub fn index_name(&self) -> &'static str {
        match self {
            Exchange::Hose => "VNINDEX",
            Exchange::Hnx => "HNXIndex",
            Exchange::Upcom => "UpcomIndex",
            Exchange::Other => "",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exchange::Hose => f.write_str("HOSE"),
            Exchange::Hnx => f.write_str("HNX"),
            Exchange::Upcom => f.write_str("UPCOM"),
            Exchange::Other => f.write_str("OTHER"),
        }
    }
}

/// One row of the ticker overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub ticker: String,
    pub short_name: String,
    pub exchange: Exchange,
}

#[derive(Debug, Deserialize)]
struct OverviewRecord {
    ticker: String,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
}

/// File-backed history keyed by ticker.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    root: PathBuf,
    tickers: BTreeMap<String, TickerInfo>,
}

impl HistoryStore {
    /// Open a store, reading `ticker-overview.csv` under `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DataError> {
        let root = root.into();
        let overview = root.join("ticker-overview.csv");
        let file = std::fs::File::open(&overview).map_err(|source| DataError::Io {
            path: overview.display().to_string(),
            source,
        })?;
        let tickers = read_overview(file)?
            .into_iter()
            .map(|info| (info.ticker.clone(), info))
            .collect();
        Ok(Self { root, tickers })
    }

    /// A store with an explicit ticker list (no overview file).
    pub fn with_tickers(root: impl Into<PathBuf>, infos: Vec<TickerInfo>) -> Self {
        Self {
            root: root.into(),
            tickers: infos
                .into_iter()
                .map(|info| (info.ticker.clone(), info))
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tickers(&self) -> impl Iterator<Item = &TickerInfo> {
        self.tickers.values()
    }

    pub fn info(&self, ticker: &str) -> Result<&TickerInfo, DataError> {
        self.tickers
            .get(ticker.trim())
            .ok_or_else(|| DataError::UnknownTicker {
                ticker: ticker.trim().to_string(),
            })
    }

    /// `{root}/stock-historical-data/{TICKER}-{INDEX}-History.csv`
    pub fn history_path(&self, info: &TickerInfo) -> PathBuf {
        self.root.join("stock-historical-data").join(format!(
            "{}-{}-History.csv",
            info.ticker,
            info.exchange.index_name()
        ))
    }
}

impl HistoryProvider for HistoryStore {
    fn history(&self, ticker: &str) -> Result<PriceSeries, DataError> {
        let info = self.info(ticker)?;
        load_history_csv(&self.history_path(info), &info.ticker)
    }
}

/// Parse `ticker,shortName,exchange` rows; other columns are ignored.
pub fn read_overview<R: std::io::Read>(reader: R) -> Result<Vec<TickerInfo>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut out = Vec::new();
    for record in rdr.deserialize::<OverviewRecord>() {
        let rec = record?;
        let ticker = rec.ticker.trim().to_string();
        out.push(TickerInfo {
            short_name: rec.short_name.unwrap_or_else(|| ticker.clone()),
            exchange: Exchange::parse(rec.exchange.as_deref().unwrap_or("")),
            ticker,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_index_names() {
        assert_eq!(Exchange::parse("HOSE").index_name(), "VNINDEX");
        assert_eq!(Exchange::parse("hnx").index_name(), "HNXIndex");
        assert_eq!(Exchange::parse("UPCOM").index_name(), "UpcomIndex");
        assert_eq!(Exchange::parse("NYSE").index_name(), "");
    }

    #[test]
    fn overview_parsing() {
        let csv = ",ticker,shortName,exchange,industry\n0,ACB,Asia Commercial Bank,HOSE,Banks\n1,SHB,,HNX,Banks\n";
        let infos = read_overview(csv.as_bytes()).unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].short_name, "Asia Commercial Bank");
        assert_eq!(infos[1].short_name, "SHB");
        assert_eq!(infos[1].exchange, Exchange::Hnx);
    }

    #[test]
    fn history_path_layout() {
        let store = HistoryStore::with_tickers(
            "/data",
            vec![TickerInfo {
                ticker: "ACB".into(),
                short_name: "ACB".into(),
                exchange: Exchange::Hose,
            }],
        );
        let info = store.info(" ACB ").unwrap();
        assert_eq!(
            store.history_path(info),
            PathBuf::from("/data/stock-historical-data/ACB-VNINDEX-History.csv")
        );
    }

    #[test]
    fn unknown_ticker() {
        let store = HistoryStore::with_tickers("/data", vec![]);
        assert!(matches!(
            store.history("XYZ").unwrap_err(),
            DataError::UnknownTicker { .. }
        ));
    }
}
