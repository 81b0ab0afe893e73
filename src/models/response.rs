//! Response bodies of the stock-data and ticker-search endpoints.

use serde::Deserialize;

use super::bar::{Bar, PredictionPoint};

/// Body of `GET /api/stock-data`.
///
/// Error responses carry only `error`, so every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockDataResponse {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Bar>>,
    #[serde(default)]
    pub predictions: Option<Vec<PredictionPoint>>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StockDataResponse {
    /// Returns the server-reported error, if non-empty.
    pub fn reported_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Body of `GET /api/search-ticker`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<TickerMatch>,
}

/// A single ticker search suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerMatch {
    pub symbol: String,
    pub name: String,
}

impl TickerMatch {
    /// Label shown in the header once the suggestion is picked.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}
