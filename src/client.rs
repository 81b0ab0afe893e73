//! HTTP client for the stock-data backend.
//!
//! [`StockApi`] is the seam the rest of the crate depends on; [`HttpStockApi`]
//! is the `reqwest` implementation talking to `/api/stock-data` and
//! `/api/search-ticker`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::models::{FetchParams, SearchResponse, StockDataResponse, TickerMatch};
use crate::{DashError, Result};

/// Minimum trimmed query length the search endpoint is consulted for.
pub const MIN_SEARCH_LEN: usize = 2;

/// Backend operations needed by the dashboard.
#[async_trait]
pub trait StockApi: Send + Sync {
    /// Fetches the raw stock-data response for `params`.
    ///
    /// # Errors
    ///
    /// [`DashError::Fetch`] on transport failures and non-2xx statuses,
    /// [`DashError::Api`] when the body carries an `error` field, and
    /// [`DashError::DataIntegrity`] when a 2xx body cannot be decoded.
    async fn stock_data(&self, params: &FetchParams) -> Result<StockDataResponse>;

    /// Searches for tickers matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::Fetch`] if the request fails.
    async fn search(&self, query: &str) -> Result<Vec<TickerMatch>>;
}

/// [`StockApi`] backed by a `reqwest` client.
pub struct HttpStockApi {
    client: Client,
    base_url: String,
}

impl HttpStockApi {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::Fetch`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tickerdash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StockApi for HttpStockApi {
    async fn stock_data(&self, params: &FetchParams) -> Result<StockDataResponse> {
        let url = format!("{}/api/stock-data", self.base_url);
        debug!(symbol = %params.symbol, interval = %params.interval, "Requesting stock data");

        let response = self.client.get(&url).query(&params.query()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed = interpret_stock_response(status, &body)?;
        info!(
            symbol = %params.symbol,
            bars = parsed.data.as_ref().map_or(0, Vec::len),
            "Received stock data"
        );
        Ok(parsed)
    }

    async fn search(&self, query: &str) -> Result<Vec<TickerMatch>> {
        let url = format!("{}/api/search-ticker", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?;
        let body: SearchResponse = response.json().await?;
        debug!(query, results = body.results.len(), "Ticker search completed");
        Ok(body.results)
    }
}

/// Classifies a stock-data response.
///
/// A non-empty `error` field wins over the HTTP status, so a 404 carrying
/// `{"error": "No data found"}` surfaces as [`DashError::Api`] with the
/// server's message.
///
/// # Errors
///
/// See [`StockApi::stock_data`].
pub fn interpret_stock_response(status: StatusCode, body: &str) -> Result<StockDataResponse> {
    match serde_json::from_str::<StockDataResponse>(body) {
        Ok(parsed) => {
            if let Some(message) = parsed.reported_error() {
                return Err(DashError::Api(message.to_string()));
            }
            if !status.is_success() {
                return Err(DashError::Fetch(format!("backend returned HTTP {status}")));
            }
            if parsed.data.is_none() {
                return Err(DashError::DataIntegrity(
                    "response is missing the `data` array".to_string(),
                ));
            }
            Ok(parsed)
        }
        Err(_) if !status.is_success() => {
            Err(DashError::Fetch(format!("backend returned HTTP {status}")))
        }
        Err(e) => Err(DashError::DataIntegrity(format!(
            "malformed stock-data response: {e}"
        ))),
    }
}
