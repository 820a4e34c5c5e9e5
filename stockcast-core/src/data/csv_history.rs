//! CSV reader for daily history files.
//!
//! Expected header (extra columns are ignored):
//! `TradingDate,Open,High,Low,Close,Volume`
//!
//! `TradingDate` may carry a time suffix (`2024-01-02 00:00:00`); only the
//! date part is used. Volume is read as a float and rounded.

use super::provider::DataError;
use crate::domain::{Bar, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    #[serde(rename = "TradingDate")]
    trading_date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse history rows from any reader into a sorted `PriceSeries`.
pub fn read_history<R: Read>(reader: R, symbol: &str) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<HistoryRecord>().enumerate() {
        let rec = record?;
        let row = i + 1;
        let date = parse_date(&rec.trading_date).ok_or_else(|| DataError::BadRow {
            row,
            message: format!("unparseable TradingDate '{}'", rec.trading_date),
        })?;
        if !rec.volume.is_finite() || rec.volume < 0.0 {
            return Err(DataError::BadRow {
                row,
                message: format!("invalid volume {}", rec.volume),
            });
        }
        bars.push(Bar {
            date,
            open: rec.open,
            high: rec.high,
            low: rec.low,
            close: rec.close,
            volume: rec.volume.round() as u64,
        });
    }

    tracing::debug!(symbol, rows = bars.len(), "parsed history CSV");
    Ok(PriceSeries::new(symbol, bars)?)
}

/// Read a history CSV file into a sorted `PriceSeries`.
pub fn load_history_csv(path: &Path, symbol: &str) -> Result<PriceSeries, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_history(file, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_sorts_rows() {
        let csv = "\
,TradingDate,Open,High,Low,Close,Volume
0,2024-01-03,11.0,12.0,10.5,11.5,2000
1,2024-01-02,10.0,11.0,9.5,10.5,1500.0
";
        let series = read_history(csv.as_bytes(), "ACB").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.5, 11.5]);
        assert_eq!(series.bars()[1].volume, 2000);
    }

    #[test]
    fn accepts_datetime_suffix() {
        let csv = "TradingDate,Open,High,Low,Close,Volume\n2024-01-02 00:00:00,1,1,1,1,10\n";
        let series = read_history(csv.as_bytes(), "BID").unwrap();
        assert_eq!(
            series.bars()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn rejects_bad_date() {
        let csv = "TradingDate,Open,High,Low,Close,Volume\n02/01/2024,1,1,1,1,10\n";
        let err = read_history(csv.as_bytes(), "BID").unwrap_err();
        assert!(matches!(err, DataError::BadRow { row: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let csv = "TradingDate,Open,High,Low,Close,Volume\n2024-01-02,1,1,1,1,10\n2024-01-02,2,2,2,2,10\n";
        let err = read_history(csv.as_bytes(), "BID").unwrap_err();
        assert!(matches!(err, DataError::Series(_)));
    }

    #[test]
    fn missing_column_is_csv_error() {
        let csv = "TradingDate,Open,High,Low,Close\n2024-01-02,1,1,1,1\n";
        assert!(matches!(
            read_history(csv.as_bytes(), "BID").unwrap_err(),
            DataError::Csv(_)
        ));
    }
}
