use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;

use tickerdash::DashError;
use tickerdash::client::{HttpStockApi, StockApi};
use tickerdash::config::fetch_config;
use tickerdash::controller::{ViewController, ViewState};
use tickerdash::indicator::{IndicatorConfig, MA_PERIOD_RANGE};
use tickerdash::surface::RenderMode;
use tickerdash::tui::{self, App, restore_terminal, setup_terminal};

#[tokio::main]
async fn main() -> Result<(), DashError> {
    let app_config = fetch_config()?;
    init_logging(&app_config.log_file)?;
    info!(api = %app_config.api.base_url, ticker = %app_config.view.ticker, "Starting tickerdash");

    let api: Arc<dyn StockApi> = Arc::new(HttpStockApi::new(&app_config.api.base_url)?);

    let defaults = app_config.view;
    let ma_period = defaults
        .ma_period
        .clamp(*MA_PERIOD_RANGE.start(), *MA_PERIOD_RANGE.end());
    let controller = ViewController::new(
        ViewState {
            symbol: defaults.ticker,
            lookback_days: defaults.lookback_days,
            interval: defaults.interval,
            render_mode: RenderMode::default(),
        },
        IndicatorConfig::with_ma_period(ma_period),
    );
    let mut app = App::new(controller);

    let mut terminal = setup_terminal()?;
    let result = tui::run(&mut terminal, &mut app, api).await;
    restore_terminal(&mut terminal)?;
    result
}

/// Sends `tracing` output to `path`; the terminal belongs to the dashboard.
fn init_logging(path: &Path) -> Result<(), DashError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| DashError::Io(format!("failed to open log file {}: {e}", path.display())))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
