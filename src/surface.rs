//! The rendering-surface contract.
//!
//! A surface accepts four independent overlays sharing one time axis:
//! price, volume, the moving-average line and the prediction line. Each can
//! be replaced or hidden without touching the others.

use chrono::{DateTime, Utc};

/// One point of a line overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// One OHLC point for candle or bar rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcPoint {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Color class of a volume column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTone {
    Up,
    Down,
}

/// One volume histogram column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumePoint {
    pub time: DateTime<Utc>,
    pub volume: u64,
    pub tone: VolumeTone,
}

/// How the price overlay is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Candle,
    Line,
    Bar,
}

impl RenderMode {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            RenderMode::Candle => "Candle",
            RenderMode::Line => "Line",
            RenderMode::Bar => "Bar",
        }
    }
}

/// Price overlay data in the shape the active [`RenderMode`] needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceData {
    /// Full OHLC per bar (candle and bar modes).
    Ohlc(Vec<OhlcPoint>),
    /// Close only (line mode).
    Close(Vec<LinePoint>),
}

impl PriceData {
    pub fn len(&self) -> usize {
        match self {
            PriceData::Ohlc(points) => points.len(),
            PriceData::Close(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Line overlays addressable by [`RenderSurface::set_line_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineChannel {
    MovingAverage,
    Prediction,
}

/// Every overlay, for visibility toggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Price,
    Volume,
    Line(LineChannel),
}

/// Capabilities the dashboard needs from a chart backend.
pub trait RenderSurface {
    /// Replaces the price overlay; `mode` tells the surface how to draw it.
    fn set_price_data(&mut self, mode: RenderMode, data: PriceData);

    fn set_volume_data(&mut self, points: Vec<VolumePoint>);

    fn set_line_data(&mut self, channel: LineChannel, points: Vec<LinePoint>);

    fn set_visible(&mut self, channel: Channel, visible: bool);
}
