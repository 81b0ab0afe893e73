//! Ticker search field and its suggestion list.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::app::{App, Mode};

/// Most suggestions shown at once.
const MAX_SUGGESTIONS: usize = 8;

/// Renders the search field.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let active = app.mode == Mode::Search;
    let border_style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = if app.search.is_empty() && !active {
        Span::styled("press / to search tickers", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.search.as_str().to_string())
    };
    frame.render_widget(Paragraph::new(Line::from(content)), inner);

    if active {
        frame.set_cursor_position(Position::new(
            inner.x.saturating_add(app.search.cursor_column()),
            inner.y,
        ));
    }
}

/// Renders the suggestion dropdown below `anchor`, over the rest of the UI.
pub fn render_suggestions(frame: &mut Frame, anchor: Rect, app: &App) {
    if app.mode != Mode::Search {
        return;
    }
    let Some(suggestions) = &app.suggestions else {
        return;
    };

    let lines: Vec<Line> = if suggestions.is_empty() {
        vec![Line::from(Span::styled(
            "No results found",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        let skip = (app.suggestion_index + 1).saturating_sub(MAX_SUGGESTIONS);
        suggestions
            .iter()
            .enumerate()
            .skip(skip)
            .take(MAX_SUGGESTIONS)
            .map(|(i, m)| {
                let style = if i == app.suggestion_index {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!(" {:<14}", m.symbol), style),
                    Span::styled(format!(" {} ", m.name), style),
                ])
            })
            .collect()
    };

    let area = frame.area();
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(anchor.bottom()));
    let dropdown = Rect::new(anchor.x, anchor.bottom(), anchor.width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Clear, dropdown);
    frame.render_widget(Paragraph::new(lines).block(block), dropdown);
}
