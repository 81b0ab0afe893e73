//! Application state for the TUI.

use std::collections::HashMap;

use crate::controller::{Timeframe, ViewController};
use crate::models::TickerMatch;

use super::input::text_input::TextInput;
use super::panels::chart::ChartSurface;

/// Central application state container.
pub struct App {
    // -- Data --
    /// View, indicators and the loaded dataset.
    pub controller: ViewController,
    /// Overlays last pushed by the controller.
    pub chart: ChartSurface,

    // -- Search State --
    /// Text in the ticker search field.
    pub search: TextInput,
    /// Results of the last search matching the field, or `None` when no
    /// search has completed for the current text.
    pub suggestions: Option<Vec<TickerMatch>>,
    /// Highlighted entry in `suggestions`.
    pub suggestion_index: usize,

    // -- UI State --
    /// Current input mode.
    pub mode: Mode,
    /// `Name (SYMBOL)` of search picks, keyed by symbol.
    pub display_names: HashMap<String, String>,
    /// Blocking error message; keys only dismiss it while set.
    pub error_popup: Option<String>,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: ViewController) -> Self {
        Self {
            controller,
            chart: ChartSurface::new(),
            search: TextInput::new(),
            suggestions: None,
            suggestion_index: 0,
            mode: Mode::Normal,
            display_names: HashMap::new(),
            error_popup: None,
            should_quit: false,
        }
    }

    /// Heading for the chart: the symbol of the loaded data, or the
    /// requested one before anything has loaded, shown by its display name
    /// when it was picked from search.
    pub fn title(&self) -> String {
        let symbol = match self.controller.dataset() {
            Some(dataset) => &dataset.params.symbol,
            None => &self.controller.view().symbol,
        };
        self.display_names
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| symbol.clone())
    }

    /// The preset matching the current window, if any.
    pub fn timeframe(&self) -> Option<Timeframe> {
        let view = self.controller.view();
        Timeframe::matching(view.lookback_days, &view.interval)
    }

    /// Opens the blocking error popup.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_popup = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error_popup = None;
    }

    /// Stores search results unless the field has changed since `query`
    /// was issued.
    pub fn apply_search_results(&mut self, query: &str, results: Vec<TickerMatch>) {
        if self.search.as_str().trim() != query {
            return;
        }
        self.suggestions = Some(results);
        self.suggestion_index = 0;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions = None;
        self.suggestion_index = 0;
    }

    /// The highlighted suggestion.
    pub fn selected_suggestion(&self) -> Option<&TickerMatch> {
        self.suggestions
            .as_ref()
            .and_then(|s| s.get(self.suggestion_index))
    }

    pub fn next_suggestion(&mut self) {
        let len = self.suggestions.as_ref().map_or(0, Vec::len);
        if self.suggestion_index + 1 < len {
            self.suggestion_index += 1;
        }
    }

    pub fn previous_suggestion(&mut self) {
        self.suggestion_index = self.suggestion_index.saturating_sub(1);
    }
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the search field.
    Search,
}
