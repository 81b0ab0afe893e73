//! Shared test utilities: a recording surface, a scripted backend and
//! dataset builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use tickerdash::client::StockApi;
use tickerdash::controller::{ViewController, ViewState};
use tickerdash::indicator::IndicatorConfig;
use tickerdash::models::{Bar, FetchParams, PredictionPoint, StockDataResponse, TickerMatch};
use tickerdash::surface::{
    Channel, LineChannel, LinePoint, PriceData, RenderMode, RenderSurface, VolumePoint,
};
use tickerdash::{DashError, Result};

/// Backend base URL for live tests, overridable like the app itself.
pub fn backend_url() -> String {
    std::env::var("TICKERDASH_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string())
}

/// Minute `n` of the test session.
pub fn t(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap() + Duration::minutes(n)
}

/// Bars one minute apart with the given closes; each opens at the previous
/// close.
pub fn bars(closes: &[f64]) -> Vec<Bar> {
    let mut open = closes.first().copied().unwrap_or_default();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let bar = Bar {
                timestamp: t(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000 * (i as u64 + 1),
            };
            open = close;
            bar
        })
        .collect()
}

/// Predictions continuing one minute after `after` bars.
pub fn predictions(after: usize, prices: &[f64]) -> Vec<PredictionPoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PredictionPoint {
            timestamp: t((after + i) as i64),
            price,
        })
        .collect()
}

/// A successful backend body.
pub fn response(symbol: &str, closes: &[f64], prediction_prices: &[f64]) -> StockDataResponse {
    StockDataResponse {
        ticker: Some(symbol.to_string()),
        data: Some(bars(closes)),
        predictions: Some(predictions(closes.len(), prediction_prices)),
        last_updated: Some("2024-03-01 10:00:00".to_string()),
        error: None,
    }
}

pub fn params(symbol: &str) -> FetchParams {
    FetchParams {
        symbol: symbol.to_string(),
        lookback_days: 7,
        interval: "5m".to_string(),
    }
}

pub fn controller(symbol: &str, ma_period: usize) -> ViewController {
    ViewController::new(
        ViewState {
            symbol: symbol.to_string(),
            lookback_days: 7,
            interval: "5m".to_string(),
            render_mode: RenderMode::Candle,
        },
        IndicatorConfig::with_ma_period(ma_period),
    )
}

/// What a [`ScriptedApi`] answers for one symbol.
#[derive(Clone)]
pub enum Reply {
    Data(StockDataResponse),
    /// Mapped to [`DashError::Fetch`].
    Fail(String),
}

/// In-memory [`StockApi`] answering from a per-symbol script.
#[derive(Default)]
pub struct ScriptedApi {
    replies: Mutex<HashMap<String, Reply>>,
    searches: Vec<TickerMatch>,
    requests: Mutex<Vec<FetchParams>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, symbol: &str, reply: Reply) -> Self {
        self.set(symbol, reply);
        self
    }

    pub fn with_search(mut self, results: Vec<TickerMatch>) -> Self {
        self.searches = results;
        self
    }

    /// Replaces the reply for `symbol`.
    pub fn set(&self, symbol: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert(symbol.to_string(), reply);
    }

    /// Every stock-data request seen so far.
    pub fn requests(&self) -> Vec<FetchParams> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockApi for ScriptedApi {
    async fn stock_data(&self, params: &FetchParams) -> Result<StockDataResponse> {
        self.requests.lock().unwrap().push(params.clone());
        let reply = self.replies.lock().unwrap().get(&params.symbol).cloned();
        match reply {
            Some(Reply::Data(body)) => Ok(body),
            Some(Reply::Fail(message)) => Err(DashError::Fetch(message)),
            None => Err(DashError::Api(format!(
                "No data found for ticker {}",
                params.symbol
            ))),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<TickerMatch>> {
        let needle = query.to_lowercase();
        Ok(self
            .searches
            .iter()
            .filter(|m| {
                m.symbol.to_lowercase().contains(&needle) || m.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Price(RenderMode),
    Volume,
    Line(LineChannel),
    Visible(Channel, bool),
}

/// [`RenderSurface`] that keeps the latest overlays and logs every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub price: Option<(RenderMode, PriceData)>,
    pub volume: Vec<VolumePoint>,
    pub lines: HashMap<LineChannel, Vec<LinePoint>>,
    pub visible: HashMap<Channel, bool>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, channel: LineChannel) -> &[LinePoint] {
        self.lines
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_visible(&self, channel: Channel) -> bool {
        self.visible.get(&channel).copied().unwrap_or(false)
    }

    /// Number of price pushes so far, one per full projection.
    pub fn projections(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Price(_)))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn set_price_data(&mut self, mode: RenderMode, data: PriceData) {
        self.calls.push(SurfaceCall::Price(mode));
        self.price = Some((mode, data));
    }

    fn set_volume_data(&mut self, points: Vec<VolumePoint>) {
        self.calls.push(SurfaceCall::Volume);
        self.volume = points;
    }

    fn set_line_data(&mut self, channel: LineChannel, points: Vec<LinePoint>) {
        self.calls.push(SurfaceCall::Line(channel));
        self.lines.insert(channel, points);
    }

    fn set_visible(&mut self, channel: Channel, visible: bool) {
        self.calls.push(SurfaceCall::Visible(channel, visible));
        self.visible.insert(channel, visible);
    }
}
