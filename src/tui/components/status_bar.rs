//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::controller::{LoadState, Timeframe};
use crate::tui::app::{App, Mode};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.controller.state();
    let status_color = match state {
        LoadState::Ready => Color::Green,
        LoadState::Loading => Color::Yellow,
        LoadState::Error(_) => Color::Red,
        LoadState::Idle => Color::Gray,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
    ];

    for (i, tf) in Timeframe::ALL.iter().enumerate() {
        let style = if app.timeframe() == Some(*tf) {
            Style::default().bg(Color::Cyan).fg(Color::Black)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {}:{} ", i + 1, tf.label()), style));
    }
    spans.push(Span::raw("│"));

    let help = match app.mode {
        Mode::Normal => {
            " / search  c/l/b type  m MA  +/- period  p pred  v vol  r refresh  q quit "
        }
        Mode::Search => " type to search  ↑/↓ pick  Enter load  Esc cancel ",
    };
    spans.push(Span::styled(help, Style::default().fg(Color::Gray)));

    let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(para, area);
}
