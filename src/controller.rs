//! View state controller.
//!
//! Owns the live [`ViewState`], the indicator settings and the
//! [`TimeSeriesStore`]. Parameter changes that need new data return a
//! [`FetchRequest`] for the caller to run; everything else re-projects the
//! loaded dataset onto the [`RenderSurface`] synchronously.
//!
//! Each issued request carries a [`RequestToken`]. Only the completion for the
//! most recently issued token is committed, so a slow response for an old
//! symbol can never overwrite a newer one.

use tracing::{debug, error, info};

use crate::indicator::{IndicatorConfig, MA_PERIOD_RANGE};
use crate::models::FetchParams;
use crate::projector::{Projection, apply_visibility};
use crate::store::{Dataset, TimeSeriesStore};
use crate::summary::{SummaryPanel, summarize};
use crate::surface::{RenderMode, RenderSurface};
use crate::{DashError, Result};

/// The single live selection of instrument, window and chart style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub symbol: String,
    pub lookback_days: u32,
    pub interval: String,
    pub render_mode: RenderMode,
}

impl ViewState {
    /// The backend request this view needs.
    pub fn fetch_params(&self) -> FetchParams {
        FetchParams {
            symbol: self.symbol.clone(),
            lookback_days: self.lookback_days,
            interval: self.interval.clone(),
        }
    }
}

/// Timeframe presets offered by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timeframe {
    D1,
    W1,
    M1,
    M3,
    Y1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::D1,
        Timeframe::W1,
        Timeframe::M1,
        Timeframe::M3,
        Timeframe::Y1,
    ];

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::D1 => "1D",
            Timeframe::W1 => "1W",
            Timeframe::M1 => "1M",
            Timeframe::M3 => "3M",
            Timeframe::Y1 => "1Y",
        }
    }

    /// Lookback window in days.
    pub fn lookback_days(&self) -> u32 {
        match self {
            Timeframe::D1 => 1,
            Timeframe::W1 => 7,
            Timeframe::M1 => 30,
            Timeframe::M3 => 90,
            Timeframe::Y1 => 365,
        }
    }

    /// Sampling interval understood by the backend.
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::D1 => "1m",
            Timeframe::W1 => "5m",
            Timeframe::M1 => "30m",
            Timeframe::M3 => "1h",
            Timeframe::Y1 => "1d",
        }
    }

    /// The preset matching a view's window, if any.
    pub fn matching(lookback_days: u32, interval: &str) -> Option<Timeframe> {
        Self::ALL
            .into_iter()
            .find(|tf| tf.lookback_days() == lookback_days && tf.interval() == interval)
    }
}

/// Monotonically increasing identifier of an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// A fetch the caller must run and report back via
/// [`ViewController::complete_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub params: FetchParams,
}

/// Load lifecycle of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// The last load failed; any earlier dataset is still displayed.
    Error(String),
}

impl LoadState {
    /// Returns a display string for the state.
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Idle => "Idle",
            LoadState::Loading => "Loading...",
            LoadState::Ready => "Ready",
            LoadState::Error(_) => "Error",
        }
    }
}

/// What [`ViewController::complete_load`] did with a completion.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The dataset was stored and projected.
    Applied,
    /// A newer request was issued since; the completion was dropped.
    Stale,
    /// The load failed; previous data stays on screen.
    Failed(DashError),
}

/// Application state behind the chart: view, indicators and data.
pub struct ViewController {
    view: ViewState,
    indicators: IndicatorConfig,
    store: TimeSeriesStore,
    state: LoadState,
    issued: u64,
}

impl ViewController {
    pub fn new(view: ViewState, indicators: IndicatorConfig) -> Self {
        Self {
            view,
            indicators,
            store: TimeSeriesStore::new(),
            state: LoadState::Idle,
            issued: 0,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn indicators(&self) -> &IndicatorConfig {
        &self.indicators
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.store.current()
    }

    /// Latest-value summary of the loaded dataset.
    pub fn summary(&self) -> Option<SummaryPanel> {
        self.dataset().and_then(summarize)
    }

    /// Issues the initial load for the current view.
    pub fn start(&mut self) -> FetchRequest {
        self.issue()
    }

    /// Reloads the current view.
    pub fn refresh(&mut self) -> FetchRequest {
        self.issue()
    }

    /// Switches instrument and reloads.
    pub fn select_symbol(&mut self, symbol: &str) -> FetchRequest {
        self.view.symbol = symbol.trim().to_uppercase();
        self.issue()
    }

    /// Switches lookback window and sampling interval and reloads.
    pub fn select_timeframe(&mut self, lookback_days: u32, interval: &str) -> FetchRequest {
        self.view.lookback_days = lookback_days;
        self.view.interval = interval.to_string();
        self.issue()
    }

    fn issue(&mut self) -> FetchRequest {
        self.issued += 1;
        self.state = LoadState::Loading;
        let request = FetchRequest {
            token: RequestToken(self.issued),
            params: self.view.fetch_params(),
        };
        info!(
            token = self.issued,
            symbol = %request.params.symbol,
            lookback = request.params.lookback_days,
            interval = %request.params.interval,
            "Issuing load"
        );
        request
    }

    /// Commits the result of a fetch.
    ///
    /// Completions for anything but the most recently issued token are
    /// discarded, whether they succeeded or failed. A failure moves the
    /// controller to [`LoadState::Error`] but keeps the previous dataset and
    /// overlays.
    pub fn complete_load<S: RenderSurface + ?Sized>(
        &mut self,
        token: RequestToken,
        result: Result<Dataset>,
        surface: &mut S,
    ) -> LoadOutcome {
        if token != RequestToken(self.issued) {
            debug!(
                token = token.0,
                latest = self.issued,
                "Discarding superseded load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(dataset) => {
                self.store.replace(dataset);
                self.state = LoadState::Ready;
                self.reproject(surface);
                LoadOutcome::Applied
            }
            Err(err) => {
                error!(symbol = %self.view.symbol, "Load failed: {err}");
                self.state = LoadState::Error(err.to_string());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Changes how the price overlay is drawn. Never reloads.
    pub fn set_render_mode<S: RenderSurface + ?Sized>(&mut self, mode: RenderMode, surface: &mut S) {
        self.view.render_mode = mode;
        self.reproject(surface);
    }

    /// Enables or disables the moving average and sets its period.
    ///
    /// The period is clamped to [`MA_PERIOD_RANGE`].
    pub fn set_moving_average<S: RenderSurface + ?Sized>(
        &mut self,
        enabled: bool,
        period: usize,
        surface: &mut S,
    ) {
        self.indicators.moving_average.enabled = enabled;
        self.indicators.moving_average.period =
            period.clamp(*MA_PERIOD_RANGE.start(), *MA_PERIOD_RANGE.end());
        self.reproject(surface);
    }

    pub fn toggle_moving_average<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        let ma = self.indicators.moving_average;
        self.set_moving_average(!ma.enabled, ma.period, surface);
    }

    /// Moves the moving-average period by `delta`, keeping its enabled state.
    pub fn adjust_ma_period<S: RenderSurface + ?Sized>(&mut self, delta: isize, surface: &mut S) {
        let ma = self.indicators.moving_average;
        self.set_moving_average(ma.enabled, ma.period.saturating_add_signed(delta), surface);
    }

    pub fn set_prediction_visible<S: RenderSurface + ?Sized>(&mut self, visible: bool, surface: &mut S) {
        self.indicators.show_prediction = visible;
        self.reproject(surface);
    }

    pub fn set_volume_visible<S: RenderSurface + ?Sized>(&mut self, visible: bool, surface: &mut S) {
        self.indicators.show_volume = visible;
        self.reproject(surface);
    }

    /// Recomputes every overlay from the held dataset and replaces them in
    /// one pass. Without data only visibility is updated.
    fn reproject<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        match self.store.current() {
            Some(dataset) => {
                Projection::new(dataset, self.view.render_mode, &self.indicators).apply(surface);
            }
            None => {
                apply_visibility(surface, &self.indicators, self.indicators.moving_average.enabled);
            }
        }
    }
}
