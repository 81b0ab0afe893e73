//! Domain and wire models for the stock-data backend.
//!
//! [`bar`] holds the validated time-series types, [`response`] the JSON
//! bodies returned by the backend endpoints.

pub mod bar;
pub mod response;
pub mod timestamp;

pub use bar::{Bar, PredictionPoint, Series};
pub use response::{SearchResponse, StockDataResponse, TickerMatch};

/// Parameters identifying one dataset on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub symbol: String,
    pub lookback_days: u32,
    pub interval: String,
}

impl FetchParams {
    /// Query string pairs for `/api/stock-data`.
    pub fn query(&self) -> [(&'static str, String); 3] {
        [
            ("ticker", self.symbol.clone()),
            ("lookback", self.lookback_days.to_string()),
            ("interval", self.interval.clone()),
        ]
    }
}
