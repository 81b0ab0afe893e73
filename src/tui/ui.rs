//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::app::App;
use super::components::{header, popup, search_bar, status_bar};
use super::panels::{chart, summary};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Ticker header
            Constraint::Length(3), // Search field
            Constraint::Min(10),   // Chart + summary
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    header::render(frame, main_layout[0], app);
    search_bar::render(frame, main_layout[1], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(30)])
        .split(main_layout[2]);

    chart::render(frame, content[0], app);
    summary::render(frame, content[1], app);

    status_bar::render(frame, main_layout[3], app);

    // Overlays last so they draw on top.
    search_bar::render_suggestions(frame, main_layout[1], app);
    if let Some(message) = &app.error_popup {
        popup::render(frame, message);
    }
}
