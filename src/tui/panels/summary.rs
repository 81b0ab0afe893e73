//! Summary panel: latest values and the active indicator settings.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::App;

/// Renders the summary panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Summary ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(summary) = app.controller.summary() else {
        let para = Paragraph::new("No data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, inner);
        return;
    };

    let change_color = match summary.rising {
        Some(true) => Color::Green,
        Some(false) => Color::Red,
        None => Color::White,
    };
    let dash = || "--".to_string();
    let indicators = app.controller.indicators();
    let ma = indicators.moving_average;

    let row = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!("{label:<11}"), Style::default().fg(Color::Gray)),
            Span::styled(format!("{value:>14}"), Style::default().fg(color)),
        ])
    };

    let lines = vec![
        row("Open", summary.open, Color::White),
        row("High", summary.high, Color::White),
        row("Low", summary.low, Color::White),
        row("Close", summary.close, Color::White),
        row("Volume", summary.volume, Color::White),
        row(
            "Change",
            summary.price_change.unwrap_or_else(dash),
            change_color,
        ),
        row(
            "Change %",
            summary.percent_change.unwrap_or_else(dash),
            change_color,
        ),
        row(
            "Predicted",
            summary.predicted_price.unwrap_or_else(dash),
            Color::Magenta,
        ),
        Line::raw(""),
        row(
            "MA period",
            if ma.enabled {
                ma.period.to_string()
            } else {
                format!("off ({})", ma.period)
            },
            Color::Yellow,
        ),
        row(
            "Prediction",
            on_off(indicators.show_prediction).to_string(),
            Color::Magenta,
        ),
        row(
            "Volume bars",
            on_off(indicators.show_volume).to_string(),
            Color::Gray,
        ),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
