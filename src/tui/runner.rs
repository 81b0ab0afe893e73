//! Main loop and background task dispatch.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::StockApi;
use crate::controller::FetchRequest;
use crate::store::fetch_dataset;
use crate::tasks::{Debouncer, LatestTask, SEARCH_DEBOUNCE};
use crate::{DashError, Result};

use super::app::App;
use super::event::{Action, Message, spawn_event_reader, spawn_tick_timer, update};
use super::terminal::Tui;
use super::ui::render;

/// Redraw cadence when nothing else happens.
const TICK_MS: u64 = 250;

/// Runs [`Action`]s as background tasks that answer with [`Message`]s.
///
/// At most one fetch and one search are live; a new one aborts its
/// predecessor.
pub struct TaskRunner {
    api: Arc<dyn StockApi>,
    tx: mpsc::UnboundedSender<Message>,
    fetch: LatestTask,
    search: Debouncer,
}

impl TaskRunner {
    pub fn new(api: Arc<dyn StockApi>, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            api,
            tx,
            fetch: LatestTask::new(),
            search: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Fetch(request) => self.spawn_fetch(request),
            Action::Search { query, immediate } => self.spawn_search(query, immediate),
            Action::CancelSearch => self.search.cancel(),
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.fetch.spawn(async move {
            let FetchRequest { token, params } = request;
            let result = fetch_dataset(api.as_ref(), &params).await;
            let _ = tx.send(Message::DataLoaded { token, result });
        });
    }

    fn spawn_search(&mut self, query: String, immediate: bool) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let job = async move {
            match api.search(&query).await {
                Ok(results) => {
                    debug!(query = %query, matches = results.len(), "Search complete");
                    let _ = tx.send(Message::SearchResults { query, results });
                }
                Err(err) => warn!(query = %query, "Ticker search failed: {err}"),
            }
        };

        if immediate {
            self.search.call_now(job);
        } else {
            self.search.call(job);
        }
    }
}

/// Drives the dashboard until the user quits.
///
/// Issues the initial load, then alternates between drawing and applying
/// messages from the terminal, the tick timer and finished tasks.
///
/// # Errors
///
/// Returns [`DashError::Io`] if drawing fails. Load and search failures are
/// shown in the UI instead.
pub async fn run(terminal: &mut Tui, app: &mut App, api: Arc<dyn StockApi>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), TICK_MS);

    let mut tasks = TaskRunner::new(api, tx);
    tasks.dispatch(Action::Fetch(app.controller.start()));

    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| DashError::Io(format!("failed to draw: {e}")))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        if let Some(action) = update(app, message) {
            tasks.dispatch(action);
        }
        // Apply whatever queued up meanwhile before the next draw.
        while let Ok(message) = rx.try_recv() {
            if let Some(action) = update(app, message) {
                tasks.dispatch(action);
            }
        }
    }

    info!("Dashboard closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ViewController, ViewState};
    use crate::indicator::IndicatorConfig;
    use crate::models::{FetchParams, StockDataResponse, TickerMatch};
    use crate::surface::RenderMode;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers after a per-symbol delay with an empty dataset.
    struct DelayedApi;

    #[async_trait]
    impl StockApi for DelayedApi {
        async fn stock_data(&self, params: &FetchParams) -> Result<StockDataResponse> {
            let delay = if params.symbol == "SLOW" { 500 } else { 50 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(StockDataResponse {
                ticker: Some(params.symbol.clone()),
                data: Some(Vec::new()),
                ..Default::default()
            })
        }

        async fn search(&self, query: &str) -> Result<Vec<TickerMatch>> {
            if query == "boom" {
                return Err(DashError::Fetch("connection refused".to_string()));
            }
            Ok(vec![TickerMatch {
                symbol: query.to_uppercase(),
                name: "Match".to_string(),
            }])
        }
    }

    fn controller() -> ViewController {
        ViewController::new(
            ViewState {
                symbol: "SLOW".to_string(),
                lookback_days: 7,
                interval: "5m".to_string(),
                render_mode: RenderMode::Candle,
            },
            IndicatorConfig::with_ma_period(20),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_never_reports() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskRunner::new(Arc::new(DelayedApi), tx);
        let mut controller = controller();

        tasks.dispatch(Action::Fetch(controller.start()));
        let fast = controller.select_symbol("FAST");
        let fast_token = fast.token;
        tasks.dispatch(Action::Fetch(fast));

        tokio::time::sleep(Duration::from_secs(1)).await;
        match rx.try_recv() {
            Ok(Message::DataLoaded { token, result }) => {
                assert_eq!(token, fast_token);
                assert_eq!(result.unwrap().params.symbol, "FAST");
            }
            other => panic!("expected the FAST load, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn search_is_debounced() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskRunner::new(Arc::new(DelayedApi), tx);

        for query in ["re", "rel"] {
            tasks.dispatch(Action::Search {
                query: query.to_string(),
                immediate: false,
            });
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        match rx.try_recv() {
            Ok(Message::SearchResults { query, results }) => {
                assert_eq!(query, "rel");
                assert_eq!(results[0].symbol, "REL");
            }
            other => panic!("expected search results, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_search_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskRunner::new(Arc::new(DelayedApi), tx);
        tasks.dispatch(Action::Search {
            query: "infy".to_string(),
            immediate: false,
        });
        tasks.dispatch(Action::CancelSearch);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_search_is_swallowed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskRunner::new(Arc::new(DelayedApi), tx);
        tasks.dispatch(Action::Search {
            query: "boom".to_string(),
            immediate: true,
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
