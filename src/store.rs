//! The time-series store: the currently loaded dataset for one view.

use tracing::{info, warn};

use crate::Result;
use crate::client::StockApi;
use crate::models::bar::validate_predictions;
use crate::models::{FetchParams, PredictionPoint, Series};

/// A validated series plus its predictions, tagged with the request that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub params: FetchParams,
    pub series: Series,
    pub predictions: Vec<PredictionPoint>,
    /// Backend-reported refresh stamp, passed through verbatim.
    pub last_updated: Option<String>,
}

/// Fetches and validates the dataset for `params`.
///
/// # Errors
///
/// Propagates [`StockApi::stock_data`] failures and returns
/// [`DashError::DataIntegrity`](crate::DashError::DataIntegrity) if the
/// bars are unordered or the predictions overlap them.
pub async fn fetch_dataset(api: &dyn StockApi, params: &FetchParams) -> Result<Dataset> {
    let response = api.stock_data(params).await?;

    if let Some(ticker) = response.ticker.as_deref()
        && !ticker.eq_ignore_ascii_case(&params.symbol)
    {
        warn!(requested = %params.symbol, returned = ticker, "Backend answered for a different ticker");
    }

    let series = Series::new(response.data.unwrap_or_default())?;
    let predictions = response.predictions.unwrap_or_default();
    validate_predictions(&series, &predictions)?;

    Ok(Dataset {
        params: params.clone(),
        series,
        predictions,
        last_updated: response.last_updated,
    })
}

/// Holds at most one dataset; every successful load replaces it wholesale.
#[derive(Debug, Default)]
pub struct TimeSeriesStore {
    current: Option<Dataset>,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches `params` and, on success, replaces the held dataset.
    ///
    /// On failure the previous dataset is left untouched.
    ///
    /// # Errors
    ///
    /// See [`fetch_dataset`].
    pub async fn load(&mut self, api: &dyn StockApi, params: &FetchParams) -> Result<&Dataset> {
        let dataset = fetch_dataset(api, params).await?;
        Ok(self.replace(dataset))
    }

    /// Replaces the held dataset.
    pub fn replace(&mut self, dataset: Dataset) -> &Dataset {
        info!(
            symbol = %dataset.params.symbol,
            bars = dataset.series.len(),
            predictions = dataset.predictions.len(),
            "Dataset replaced"
        );
        self.current.insert(dataset)
    }

    pub fn current(&self) -> Option<&Dataset> {
        self.current.as_ref()
    }
}
