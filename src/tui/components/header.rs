//! Ticker header: name, last close, change and refresh stamp.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::App;

/// Renders the ticker header.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.title()),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match app.controller.summary() {
        Some(summary) => {
            let change_color = match summary.rising {
                Some(true) => Color::Green,
                Some(false) => Color::Red,
                None => Color::White,
            };
            let arrow = match summary.rising {
                Some(true) => "▲",
                Some(false) => "▼",
                None => " ",
            };

            spans.push(Span::styled(arrow, Style::default().fg(change_color)));
            spans.push(Span::styled(
                format!(" {} ", summary.close),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            if let (Some(change), Some(pct)) = (&summary.price_change, &summary.percent_change) {
                spans.push(Span::styled(
                    format!("{change} ({pct}) "),
                    Style::default().fg(change_color),
                ));
            }
        }
        None => spans.push(Span::styled(" -- ", Style::default().fg(Color::DarkGray))),
    }

    if let Some(updated) = app
        .controller
        .dataset()
        .and_then(|d| d.last_updated.as_deref())
    {
        spans.push(Span::styled(
            format!(" Updated {updated}"),
            Style::default().fg(Color::Gray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
