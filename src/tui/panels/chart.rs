//! Chart panel: the terminal [`RenderSurface`] and its grid renderer.
//!
//! All overlays share one time axis. Columns are the distinct timestamps of
//! the visible overlays, oldest on the left; when there are more than fit,
//! the newest are kept.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::surface::{
    Channel, LineChannel, LinePoint, OhlcPoint, PriceData, RenderMode, RenderSurface,
    VolumePoint, VolumeTone,
};
use crate::tui::app::App;

/// Width of the price axis: `{:>10.2} │`.
const GUTTER: usize = 12;
/// Rows given to the volume histogram when it is shown.
const VOLUME_ROWS: usize = 4;
/// Smallest plot height that still leaves room for volume.
const MIN_ROWS_WITH_VOLUME: usize = 12;

const UP: Color = Color::Green;
const DOWN: Color = Color::Red;
const MA_COLOR: Color = Color::Yellow;
const PREDICTION_COLOR: Color = Color::Magenta;
const LINE_COLOR: Color = Color::Cyan;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Visibility {
    price: bool,
    volume: bool,
    moving_average: bool,
    prediction: bool,
}

/// Terminal chart holding the four overlays pushed by the controller.
#[derive(Clone, Debug)]
pub struct ChartSurface {
    mode: RenderMode,
    price: PriceData,
    volume: Vec<VolumePoint>,
    moving_average: Vec<LinePoint>,
    prediction: Vec<LinePoint>,
    visible: Visibility,
}

impl Default for ChartSurface {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            price: PriceData::Ohlc(Vec::new()),
            volume: Vec::new(),
            moving_average: Vec::new(),
            prediction: Vec::new(),
            visible: Visibility {
                price: true,
                volume: true,
                moving_average: true,
                prediction: true,
            },
        }
    }
}

impl RenderSurface for ChartSurface {
    fn set_price_data(&mut self, mode: RenderMode, data: PriceData) {
        self.mode = mode;
        self.price = data;
    }

    fn set_volume_data(&mut self, points: Vec<VolumePoint>) {
        self.volume = points;
    }

    fn set_line_data(&mut self, channel: LineChannel, points: Vec<LinePoint>) {
        match channel {
            LineChannel::MovingAverage => self.moving_average = points,
            LineChannel::Prediction => self.prediction = points,
        }
    }

    fn set_visible(&mut self, channel: Channel, visible: bool) {
        match channel {
            Channel::Price => self.visible.price = visible,
            Channel::Volume => self.visible.volume = visible,
            Channel::Line(LineChannel::MovingAverage) => self.visible.moving_average = visible,
            Channel::Line(LineChannel::Prediction) => self.visible.prediction = visible,
        }
    }
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn price(&self) -> &PriceData {
        &self.price
    }

    pub fn volume(&self) -> &[VolumePoint] {
        &self.volume
    }

    pub fn line(&self, channel: LineChannel) -> &[LinePoint] {
        match channel {
            LineChannel::MovingAverage => &self.moving_average,
            LineChannel::Prediction => &self.prediction,
        }
    }

    pub fn is_visible(&self, channel: Channel) -> bool {
        match channel {
            Channel::Price => self.visible.price,
            Channel::Volume => self.visible.volume,
            Channel::Line(LineChannel::MovingAverage) => self.visible.moving_average,
            Channel::Line(LineChannel::Prediction) => self.visible.prediction,
        }
    }

    /// Whether there is anything to plot.
    pub fn has_data(&self) -> bool {
        !self.price.is_empty() || (self.visible.prediction && !self.prediction.is_empty())
    }

    /// Distinct timestamps of the visible overlays, newest `limit` only.
    fn time_axis(&self, limit: usize) -> Vec<DateTime<Utc>> {
        let mut times: Vec<DateTime<Utc>> = match &self.price {
            PriceData::Ohlc(points) => points.iter().map(|p| p.time).collect(),
            PriceData::Close(points) => points.iter().map(|p| p.time).collect(),
        };
        if self.visible.prediction {
            times.extend(self.prediction.iter().map(|p| p.time));
        }
        if self.visible.moving_average {
            times.extend(self.moving_average.iter().map(|p| p.time));
        }
        times.sort_unstable();
        times.dedup();
        let skip = times.len().saturating_sub(limit);
        times.split_off(skip)
    }

    /// Lowest and highest value drawn in the window starting at `from`.
    fn value_range(&self, from: DateTime<Utc>) -> Option<(f64, f64)> {
        let mut values: Vec<f64> = Vec::new();
        if self.visible.price {
            match &self.price {
                PriceData::Ohlc(points) => {
                    for p in points.iter().filter(|p| p.time >= from) {
                        values.push(p.low);
                        values.push(p.high);
                    }
                }
                PriceData::Close(points) => {
                    values.extend(points.iter().filter(|p| p.time >= from).map(|p| p.value));
                }
            }
        }
        for (shown, line) in [
            (self.visible.moving_average, &self.moving_average),
            (self.visible.prediction, &self.prediction),
        ] {
            if shown {
                values.extend(line.iter().filter(|p| p.time >= from).map(|p| p.value));
            }
        }

        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;
        if max - min < f64::EPSILON {
            let pad = (max.abs() * 0.005).max(0.01);
            Some((min - pad, max + pad))
        } else {
            Some((min, max))
        }
    }

    /// Renders the overlays into `width` x `height` terminal cells.
    pub fn lines(&self, width: u16, height: u16) -> Vec<Line<'static>> {
        let plot_width = (width as usize).saturating_sub(GUTTER);
        let height = height as usize;
        if plot_width == 0 || height < 3 {
            return Vec::new();
        }

        let times = self.time_axis(plot_width);
        let Some(&first) = times.first() else {
            return Vec::new();
        };
        let column = |t: DateTime<Utc>| times.binary_search(&t).ok();

        let volume_rows = if self.visible.volume && height >= MIN_ROWS_WITH_VOLUME {
            VOLUME_ROWS
        } else {
            0
        };
        let price_rows = height - 1 - volume_rows;

        let mut lines = Vec::with_capacity(height);

        if let Some((min, max)) = self.value_range(first) {
            let scale = Scale {
                min,
                max,
                rows: price_rows,
            };
            let mut grid = Grid::new(times.len(), price_rows);

            if self.visible.price {
                match &self.price {
                    PriceData::Ohlc(points) => {
                        for p in points {
                            if let Some(col) = column(p.time) {
                                draw_ohlc(&mut grid, &scale, col, p, self.mode);
                            }
                        }
                    }
                    PriceData::Close(points) => {
                        draw_close_line(&mut grid, &scale, points, &column);
                    }
                }
            }
            if self.visible.moving_average {
                for p in &self.moving_average {
                    if let Some(col) = column(p.time) {
                        grid.put(col, scale.row(p.value), '·', MA_COLOR);
                    }
                }
            }
            if self.visible.prediction {
                for p in &self.prediction {
                    if let Some(col) = column(p.time) {
                        grid.put(col, scale.row(p.value), '•', PREDICTION_COLOR);
                    }
                }
            }

            for row in 0..price_rows {
                let mut spans = vec![Span::raw(format!("{:>10.2} │", scale.level(row)))];
                spans.extend(grid.row_spans(row));
                lines.push(Line::from(spans));
            }
        } else {
            lines.extend((0..price_rows).map(|_| Line::from(" ".repeat(GUTTER))));
        }

        if volume_rows > 0 {
            let max_volume = self
                .volume
                .iter()
                .filter(|v| column(v.time).is_some())
                .map(|v| v.volume)
                .max()
                .unwrap_or(0);
            let mut grid = Grid::new(times.len(), volume_rows);
            if max_volume > 0 {
                for v in &self.volume {
                    if let Some(col) = column(v.time) {
                        let filled = ((v.volume as f64 / max_volume as f64) * volume_rows as f64)
                            .ceil() as usize;
                        let color = match v.tone {
                            VolumeTone::Up => UP,
                            VolumeTone::Down => DOWN,
                        };
                        for row in volume_rows.saturating_sub(filled)..volume_rows {
                            grid.put(col, row, '█', color);
                        }
                    }
                }
            }
            for row in 0..volume_rows {
                let label = if row == 0 {
                    compact_volume(max_volume)
                } else {
                    String::new()
                };
                let mut spans = vec![Span::styled(
                    format!("{label:>10} │"),
                    Style::default().fg(Color::DarkGray),
                )];
                spans.extend(grid.row_spans(row));
                lines.push(Line::from(spans));
            }
        }

        lines.push(time_axis_line(&times, plot_width));
        lines
    }
}

/// Maps values onto price rows; row 0 is the top.
struct Scale {
    min: f64,
    max: f64,
    rows: usize,
}

impl Scale {
    fn row(&self, value: f64) -> usize {
        if self.rows <= 1 {
            return 0;
        }
        let last = (self.rows - 1) as f64;
        let frac = (self.max - value) / (self.max - self.min);
        (frac * last).round().clamp(0.0, last) as usize
    }

    fn level(&self, row: usize) -> f64 {
        if self.rows <= 1 {
            return self.max;
        }
        self.max - (self.max - self.min) * row as f64 / (self.rows - 1) as f64
    }
}

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

struct Grid {
    width: usize,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            cells: vec![BLANK; width * height],
        }
    }

    fn put(&mut self, col: usize, row: usize, glyph: char, color: Color) {
        if let Some(cell) = self.cells.get_mut(row * self.width + col) {
            *cell = Cell { glyph, color };
        }
    }

    fn row_spans(&self, row: usize) -> Vec<Span<'static>> {
        let start = row * self.width;
        self.cells[start..start + self.width]
            .iter()
            .map(|c| Span::styled(c.glyph.to_string(), Style::default().fg(c.color)))
            .collect()
    }
}

fn draw_ohlc(grid: &mut Grid, scale: &Scale, col: usize, p: &OhlcPoint, mode: RenderMode) {
    let color = if p.close > p.open { UP } else { DOWN };
    let high = scale.row(p.high);
    let low = scale.row(p.low);

    match mode {
        RenderMode::Bar => {
            for row in high..=low {
                grid.put(col, row, '│', color);
            }
            let open = scale.row(p.open);
            let close = scale.row(p.close);
            if open == close {
                grid.put(col, open, '┼', color);
            } else {
                grid.put(col, open, '┤', color);
                grid.put(col, close, '├', color);
            }
        }
        RenderMode::Candle | RenderMode::Line => {
            let body_top = scale.row(p.open.max(p.close));
            let body_bottom = scale.row(p.open.min(p.close));
            for row in high..=low {
                let glyph = if (body_top..=body_bottom).contains(&row) {
                    '█'
                } else {
                    '│'
                };
                grid.put(col, row, glyph, color);
            }
        }
    }
}

fn draw_close_line(
    grid: &mut Grid,
    scale: &Scale,
    points: &[LinePoint],
    column: &impl Fn(DateTime<Utc>) -> Option<usize>,
) {
    let mut previous: Option<usize> = None;
    for p in points {
        let Some(col) = column(p.time) else {
            continue;
        };
        let row = scale.row(p.value);
        if let Some(prev) = previous {
            for r in prev.min(row)..=prev.max(row) {
                grid.put(col, r, '│', LINE_COLOR);
            }
        }
        grid.put(col, row, '─', LINE_COLOR);
        previous = Some(row);
    }
}

fn compact_volume(volume: u64) -> String {
    let v = volume as f64;
    if v >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        volume.to_string()
    }
}

fn time_axis_line(times: &[DateTime<Utc>], plot_width: usize) -> Line<'static> {
    let fmt = |t: &DateTime<Utc>| t.format("%m-%d %H:%M").to_string();
    let first = times.first().map(fmt).unwrap_or_default();
    let last = times.last().map(fmt).unwrap_or_default();

    let text = if times.len() > 1 && plot_width >= first.len() + last.len() + 1 {
        let gap = plot_width - first.len() - last.len();
        format!("{}{first}{}{last}", " ".repeat(GUTTER), " ".repeat(gap))
    } else {
        format!("{}{first}", " ".repeat(GUTTER))
    };
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// Renders the chart panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.controller.view();
    let ma = app.controller.indicators().moving_average;
    let window = match app.timeframe() {
        Some(tf) => tf.label().to_string(),
        None => format!("{}d/{}", view.lookback_days, view.interval),
    };
    let mut title = format!(" Chart [{}] {} ", view.render_mode.label(), window);
    if ma.enabled {
        title.push_str(&format!("MA({}) ", ma.period));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.chart.has_data() {
        let para = Paragraph::new("No data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, inner);
        return;
    }

    let para = Paragraph::new(app.chart.lines(inner.width, inner.height));
    frame.render_widget(para, inner);
}
