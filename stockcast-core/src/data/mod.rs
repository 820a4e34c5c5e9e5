//! Daily history loading.

pub mod csv_history;
pub mod provider;
pub mod store;

pub use csv_history::{load_history_csv, read_history};
pub use provider::{DataError, HistoryProvider};
pub use store::{read_overview, Exchange, HistoryStore, TickerInfo};
