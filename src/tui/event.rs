//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::Result;
use crate::client::MIN_SEARCH_LEN;
use crate::controller::{FetchRequest, LoadOutcome, RequestToken, Timeframe};
use crate::models::TickerMatch;
use crate::store::Dataset;
use crate::surface::RenderMode;

use super::app::{App, Mode};

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// A fetch finished, successfully or not.
    DataLoaded {
        token: RequestToken,
        result: Result<Dataset>,
    },
    /// Suggestions for `query` arrived.
    SearchResults {
        query: String,
        results: Vec<TickerMatch>,
    },
}

/// Actions that require external handling (spawning background work).
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Run a fetch and report back with [`Message::DataLoaded`].
    Fetch(FetchRequest),
    /// Look up tickers; `immediate` skips the debounce window.
    Search { query: String, immediate: bool },
    /// Drop any pending search.
    CancelSearch,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::DataLoaded { token, result } => {
            match app.controller.complete_load(token, result, &mut app.chart) {
                LoadOutcome::Applied | LoadOutcome::Stale => {}
                LoadOutcome::Failed(err) => app.show_error(err.to_string()),
            }
            None
        }
        Message::SearchResults { query, results } => {
            app.apply_search_results(&query, results);
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) | Event::Tick => None,
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    // Global keys (work in any mode)
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    // The error popup swallows everything until dismissed.
    if app.error_popup.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_error();
        }
        return None;
    }

    // Mode-specific handling
    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Search => handle_search_mode(app, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('/') | KeyCode::Char('s') => {
            app.mode = Mode::Search;
            None
        }
        KeyCode::Char('r') => Some(Action::Fetch(app.controller.refresh())),

        // Timeframe shortcuts
        KeyCode::Char(c @ '1'..='5') => {
            let tf = Timeframe::ALL[c as usize - '1' as usize];
            Some(Action::Fetch(
                app.controller
                    .select_timeframe(tf.lookback_days(), tf.interval()),
            ))
        }

        // Chart type
        KeyCode::Char('c') => {
            app.controller
                .set_render_mode(RenderMode::Candle, &mut app.chart);
            None
        }
        KeyCode::Char('l') => {
            app.controller
                .set_render_mode(RenderMode::Line, &mut app.chart);
            None
        }
        KeyCode::Char('b') => {
            app.controller.set_render_mode(RenderMode::Bar, &mut app.chart);
            None
        }

        // Indicators
        KeyCode::Char('m') => {
            app.controller.toggle_moving_average(&mut app.chart);
            None
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.controller.adjust_ma_period(1, &mut app.chart);
            None
        }
        KeyCode::Char('-') => {
            app.controller.adjust_ma_period(-1, &mut app.chart);
            None
        }
        KeyCode::Char('p') => {
            let shown = app.controller.indicators().show_prediction;
            app.controller
                .set_prediction_visible(!shown, &mut app.chart);
            None
        }
        KeyCode::Char('v') => {
            let shown = app.controller.indicators().show_volume;
            app.controller.set_volume_visible(!shown, &mut app.chart);
            None
        }

        _ => None,
    }
}

/// Handles keys in search mode (text input plus suggestion list).
fn handle_search_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            app.clear_suggestions();
            Some(Action::CancelSearch)
        }
        KeyCode::Enter => submit_search(app),
        KeyCode::Up => {
            app.previous_suggestion();
            None
        }
        KeyCode::Down => {
            app.next_suggestion();
            None
        }
        KeyCode::Char(c) => {
            app.search.insert(c);
            search_changed(app)
        }
        KeyCode::Backspace => {
            app.search.backspace();
            search_changed(app)
        }
        KeyCode::Delete => {
            app.search.delete();
            search_changed(app)
        }
        KeyCode::Left => {
            app.search.move_left();
            None
        }
        KeyCode::Right => {
            app.search.move_right();
            None
        }
        KeyCode::Home => {
            app.search.move_home();
            None
        }
        KeyCode::End => {
            app.search.move_end();
            None
        }
        _ => None,
    }
}

/// Returns the trimmed query if it is long enough to send.
fn searchable_query(app: &App) -> Option<String> {
    let query = app.search.as_str().trim();
    (query.chars().count() >= MIN_SEARCH_LEN).then(|| query.to_string())
}

/// Debounces a search for the edited field, or cancels one if too short.
fn search_changed(app: &mut App) -> Option<Action> {
    app.clear_suggestions();
    match searchable_query(app) {
        Some(query) => Some(Action::Search {
            query,
            immediate: false,
        }),
        None => Some(Action::CancelSearch),
    }
}

/// Enter in search mode.
///
/// Loads the highlighted suggestion; with no search completed yet it
/// searches right away; after an empty result it loads the typed text as a
/// symbol.
fn submit_search(app: &mut App) -> Option<Action> {
    let Some(has_matches) = app.suggestions.as_ref().map(|results| !results.is_empty()) else {
        return searchable_query(app).map(|query| Action::Search {
            query,
            immediate: true,
        });
    };

    if has_matches {
        let picked = app.selected_suggestion()?.clone();
        app.display_names
            .insert(picked.symbol.clone(), picked.display_name());
        app.search.set(&picked.symbol);
        return Some(load_symbol(app, &picked.symbol));
    }

    let typed = app.search.as_str().trim().to_string();
    if typed.is_empty() {
        return None;
    }
    Some(load_symbol(app, &typed))
}

fn load_symbol(app: &mut App, symbol: &str) -> Action {
    app.mode = Mode::Normal;
    app.clear_suggestions();
    Action::Fetch(app.controller.select_symbol(symbol))
}
